use alloc::string::String;

use super::{Scanner, is_flow_indicator};
use crate::{
    source::ByteSource,
    token::{ScalarStyle, TokenKind},
};

impl<S: ByteSource> Scanner<S> {
    /// Scans a plain scalar. Inside a flow collection it ends at flow
    /// indicators; in block context it ends when indentation drops or a
    /// continuation line starts a block entry.
    pub(super) fn fetch_plain_scalar(&mut self) {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let in_flow = self.state.in_flow();
        let start = self.mark();
        let mut end = start;
        let min_indent = self.block_indent + 1;

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks = false;

        loop {
            if self.pos.column() == 0 && self.at_document_indicator() {
                break;
            }
            if self.peek() == Some(b'#') {
                break;
            }
            if leading_blanks && !in_flow && self.peek() == Some(b'-') && self.is_blankz_at(1) {
                break;
            }

            while !self.is_blankz_at(0) {
                let Some(byte) = self.peek() else {
                    break;
                };
                if byte == b':' {
                    let ends = self.is_blankz_at(1)
                        || (in_flow && self.peek_at(1).is_some_and(is_flow_indicator));
                    if ends {
                        break;
                    }
                }
                if in_flow && is_flow_indicator(byte) {
                    break;
                }

                if leading_blanks {
                    if leading_break.starts_with('\n') {
                        if trailing_breaks.is_empty() {
                            value.push(' ');
                        } else {
                            value.push_str(&trailing_breaks);
                        }
                    } else {
                        value.push_str(&leading_break);
                        value.push_str(&trailing_breaks);
                    }
                    leading_break.clear();
                    trailing_breaks.clear();
                    leading_blanks = false;
                } else if !whitespaces.is_empty() {
                    value.push_str(&whitespaces);
                    whitespaces.clear();
                }

                self.read_char(&mut value);
                end = self.mark();
            }

            if !(self.is_blank_at(0) || self.is_break_at(0)) {
                break;
            }

            while self.is_blank_at(0) || self.is_break_at(0) {
                if self.is_blank_at(0) {
                    if leading_blanks {
                        self.skip_indentation_blank();
                    } else {
                        self.read_char(&mut whitespaces);
                    }
                } else if leading_blanks {
                    self.read_break(&mut trailing_breaks);
                } else {
                    whitespaces.clear();
                    self.read_break(&mut leading_break);
                    leading_blanks = true;
                }
            }

            if !in_flow && i64::from(self.pos.column()) < min_indent {
                break;
            }
        }

        if end == start {
            // Nothing matched; keep the stream moving.
            self.fetch_invalid_char("unexpected character");
            return;
        }
        if leading_blanks {
            self.simple_key_allowed = true;
        }
        self.push_token(
            TokenKind::Scalar {
                value,
                style: ScalarStyle::Plain,
            },
            start,
            end,
        );
    }
}
