use alloc::string::String;

use super::Scanner;
use crate::{
    position::Mark,
    source::ByteSource,
    token::{ScalarStyle, TokenKind},
};

/// What happens to the line breaks at the end of a block scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomping {
    /// `-`: drop them all.
    Strip,
    /// Default: keep the first one.
    Clip,
    /// `+`: keep them all.
    Keep,
}

impl<S: ByteSource> Scanner<S> {
    pub(super) fn fetch_block_scalar(&mut self, style: ScalarStyle) {
        if self.state.in_flow() {
            self.fetch_invalid_char("block scalars are not allowed inside flow collections");
            return;
        }
        self.remove_simple_key();
        self.simple_key_allowed = true;
        self.scan_block_scalar(style);
    }

    fn scan_block_scalar(&mut self, style: ScalarStyle) {
        let start = self.mark();
        self.skip_ascii(1);

        let mut chomping = Chomping::Clip;
        let mut increment = 0u32;
        let mut chomping_seen = false;
        let mut hint_seen = false;
        loop {
            match self.peek() {
                Some(sign @ (b'+' | b'-')) if !chomping_seen => {
                    chomping = if sign == b'+' {
                        Chomping::Keep
                    } else {
                        Chomping::Strip
                    };
                    chomping_seen = true;
                    self.skip_ascii(1);
                }
                Some(digit @ b'0'..=b'9') if !hint_seen => {
                    hint_seen = true;
                    if digit == b'0' {
                        let here = self.mark();
                        self.warn(
                            "block scalar indentation indicator must be between 1 and 9",
                            here,
                            here.offset(1, 1),
                        );
                    } else {
                        increment = u32::from(digit - b'0');
                    }
                    self.skip_ascii(1);
                }
                _ => break,
            }
        }

        self.skip_blanks();
        let comment = if self.peek() == Some(b'#') {
            Some(self.scan_comment(true))
        } else {
            None
        };
        if !self.is_breakz_at(0) {
            self.invalid_from(
                start,
                "expected a comment or a line break after the block scalar header",
            );
            return;
        }
        self.skip_break();

        let mut end = self.mark();
        let mut indent = if increment == 0 {
            0
        } else {
            self.block_indent.max(0) + i64::from(increment)
        };
        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();

        let mut stopped =
            self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, &mut end);

        let mut leading_blank = false;
        while !stopped && i64::from(self.pos.column()) == indent && self.peek().is_some() {
            let trailing_blank = self.is_blank_at(0);
            if style == ScalarStyle::Folded
                && leading_break.starts_with('\n')
                && !leading_blank
                && !trailing_blank
            {
                if trailing_breaks.is_empty() {
                    value.push(' ');
                }
                leading_break.clear();
            } else {
                value.push_str(&leading_break);
                leading_break.clear();
            }
            value.push_str(&trailing_breaks);
            trailing_breaks.clear();

            leading_blank = self.is_blank_at(0);
            while !self.is_breakz_at(0) {
                self.read_char(&mut value);
            }
            end = self.mark();
            if self.peek().is_none() {
                break;
            }
            self.read_break(&mut leading_break);
            stopped = self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, &mut end);
        }

        if chomping != Chomping::Strip {
            value.push_str(&leading_break);
        }
        if chomping == Chomping::Keep {
            value.push_str(&trailing_breaks);
        }

        self.push_token(TokenKind::Scalar { value, style }, start, end);
        if let Some(comment) = comment {
            self.queue_token(comment);
        }
    }

    /// Consumes indentation and empty lines, and settles the content
    /// indentation if it is still unknown.
    ///
    /// Returns `true` when a tab in the indentation ended the scalar. The
    /// tab run is consumed by then, so the line it starts cannot be content.
    fn scan_block_scalar_breaks(
        &mut self,
        indent: &mut i64,
        breaks: &mut String,
        end: &mut Mark,
    ) -> bool {
        let mut max_indent = 0i64;
        let mut stopped = false;
        loop {
            while (*indent == 0 || i64::from(self.pos.column()) < *indent)
                && self.peek() == Some(b' ')
            {
                self.skip_indentation_blank();
            }
            max_indent = max_indent.max(i64::from(self.pos.column()));

            if (*indent == 0 || i64::from(self.pos.column()) < *indent)
                && self.peek() == Some(b'\t')
            {
                let tab = self.mark();
                while self.is_blank_at(0) {
                    self.skip_indentation_blank();
                }
                if !self.is_break_at(0) {
                    if self.peek().is_some_and(|byte| byte != b'#') {
                        self.tab_indent =
                            Some((tab, "tabs must not be used to indent block scalar content"));
                    }
                    stopped = true;
                    break;
                }
            }

            if !self.is_break_at(0) {
                break;
            }
            self.read_break(breaks);
            *end = self.mark();
        }

        if *indent == 0 {
            *indent = max_indent.max(self.block_indent + 1).max(1);
        }
        stopped
    }
}
