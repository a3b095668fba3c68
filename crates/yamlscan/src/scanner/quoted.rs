use alloc::{format, string::String};

use super::Scanner;
use crate::{
    escape_buffer::{EscapeError, HexEscapeBuffer},
    position::Mark,
    source::ByteSource,
    token::{ScalarStyle, TokenKind},
};

/// Outcome of one backslash escape.
enum Escape {
    Done,
    /// Cut short by the closing quote, a line break or end of input.
    Truncated,
}

impl<S: ByteSource> Scanner<S> {
    pub(super) fn fetch_flow_scalar(&mut self, style: ScalarStyle) {
        self.save_simple_key();
        self.simple_key_allowed = false;
        self.scan_flow_scalar(style);
    }

    fn scan_flow_scalar(&mut self, style: ScalarStyle) {
        let single = style == ScalarStyle::SingleQuoted;
        let quote = if single { b'\'' } else { b'"' };
        let start = self.mark();
        self.skip_ascii(1);

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut truncated = false;

        loop {
            if self.pos.column() == 0 && self.at_document_indicator() {
                let here = self.mark();
                self.warn("document indicator inside a quoted scalar", start, here);
                self.push_token(TokenKind::Invalid, start, here);
                return;
            }
            if self.peek().is_none() {
                let here = self.mark();
                self.warn("quoted scalar is missing its closing quote", start, here);
                self.push_token(TokenKind::Invalid, start, here);
                return;
            }

            let mut leading_blanks = false;
            while !self.is_blankz_at(0) {
                let Some(byte) = self.peek() else {
                    break;
                };
                if single && byte == b'\'' && self.peek_at(1) == Some(b'\'') {
                    value.push('\'');
                    self.skip_ascii(2);
                } else if byte == quote {
                    break;
                } else if !single && byte == b'\\' && self.is_break_at(1) {
                    self.skip_ascii(1);
                    self.skip_break();
                    leading_blanks = true;
                    break;
                } else if !single && byte == b'\\' {
                    if let Escape::Truncated = self.scan_escape(&mut value) {
                        truncated = true;
                    }
                } else {
                    self.read_char(&mut value);
                }
            }

            if self.peek() == Some(quote) {
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
            } else {
                value.push_str(&whitespaces);
                whitespaces.clear();
            }
        }

        self.skip_ascii(1);
        let end = self.mark();
        let kind = if truncated {
            TokenKind::Invalid
        } else {
            TokenKind::Scalar { value, style }
        };
        self.push_token(kind, start, end);
    }

    /// Scans one escape starting at the backslash and appends its value.
    ///
    /// Malformed escapes keep their literal text in `value` and raise a
    /// warning.
    fn scan_escape(&mut self, value: &mut String) -> Escape {
        let start = self.mark();
        self.skip_ascii(1);
        let Some(code) = self.peek() else {
            value.push('\\');
            let here = self.mark();
            self.warn("escape sequence cut off by the end of input", start, here);
            return Escape::Truncated;
        };

        let simple = match code {
            b'0' => Some('\0'),
            b'a' => Some('\x07'),
            b'b' => Some('\x08'),
            b't' | b'\t' => Some('\t'),
            b'n' => Some('\n'),
            b'v' => Some('\x0B'),
            b'f' => Some('\x0C'),
            b'r' => Some('\r'),
            b'e' => Some('\x1B'),
            b' ' => Some(' '),
            b'"' => Some('"'),
            b'/' => Some('/'),
            b'\\' => Some('\\'),
            b'N' => Some('\u{85}'),
            b'_' => Some('\u{A0}'),
            b'L' => Some('\u{2028}'),
            b'P' => Some('\u{2029}'),
            _ => None,
        };
        if let Some(ch) = simple {
            value.push(ch);
            self.skip_ascii(1);
            return Escape::Done;
        }

        let (width, name) = match code {
            b'x' => (2, "hex"),
            b'u' => (4, "unicode"),
            b'U' => (8, "long unicode"),
            _ => {
                let mut literal = String::from("\\");
                self.read_char(&mut literal);
                let here = self.mark();
                self.warn(format!("unknown escape sequence '{literal}'"), start, here);
                value.push_str(&literal);
                return Escape::Done;
            }
        };
        self.skip_ascii(1);

        let mut digits = HexEscapeBuffer::new(width);
        let mut literal = String::from("\\");
        literal.push(char::from(code));
        loop {
            let Some(byte) = self.peek() else {
                return self.incomplete_escape(value, &literal, name, digits.width(), start);
            };
            let result = digits.feed(byte);
            if !matches!(result, Err(EscapeError::InvalidDigit(_))) {
                literal.push(char::from(byte));
                self.skip_ascii(1);
            }
            match result {
                Ok(None) => {}
                Ok(Some(ch)) => {
                    value.push(ch);
                    return Escape::Done;
                }
                Err(EscapeError::InvalidDigit(_)) => {
                    return self.incomplete_escape(value, &literal, name, digits.width(), start);
                }
                Err(err @ EscapeError::InvalidCodepoint(_)) => {
                    let here = self.mark();
                    self.warn(format!("invalid {name} escape '{literal}': {err}"), start, here);
                    value.push_str(&literal);
                    return Escape::Done;
                }
            }
        }
    }

    fn incomplete_escape(
        &mut self,
        value: &mut String,
        literal: &str,
        name: &str,
        width: u8,
        start: Mark,
    ) -> Escape {
        value.push_str(literal);
        let here = self.mark();
        let expected = format!("expected {width} hexadecimal digits");
        let cut_off = matches!(self.peek(), None | Some(b'"')) || self.is_break_at(0);
        if cut_off {
            let message = format!("incomplete {name} escape '{literal}': {expected}");
            self.warn(message, start, here);
            Escape::Truncated
        } else {
            let found = self.peek().filter(u8::is_ascii).map_or('?', char::from);
            let message = format!("invalid {name} escape '{literal}': {expected}, found '{found}'");
            self.warn(message, start, here);
            Escape::Done
        }
    }
}
