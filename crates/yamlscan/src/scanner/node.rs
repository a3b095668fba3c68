//! Node properties: tags, anchors and aliases.

use alloc::{borrow::Cow, string::String, vec::Vec};

use super::{Scanner, is_flow_indicator};
use crate::{source::ByteSource, token::TokenKind};

type ScanResult<T> = Result<T, Cow<'static, str>>;

pub(super) fn is_word_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

pub(super) fn is_uri_char(byte: u8) -> bool {
    is_word_char(byte)
        || matches!(
            byte,
            b'%' | b'#'
                | b';'
                | b'/'
                | b'?'
                | b':'
                | b'@'
                | b'&'
                | b'='
                | b'+'
                | b'$'
                | b','
                | b'_'
                | b'.'
                | b'!'
                | b'~'
                | b'*'
                | b'\''
                | b'('
                | b')'
                | b'['
                | b']'
        )
}

/// URI characters allowed in a tag shorthand: no `!` and no flow indicators.
fn is_tag_char(byte: u8) -> bool {
    is_uri_char(byte) && byte != b'!' && !is_flow_indicator(byte)
}

impl<S: ByteSource> Scanner<S> {
    pub(super) fn fetch_anchor(&mut self, alias: bool) {
        self.save_simple_key();
        self.simple_key_allowed = false;
        let start = self.mark();
        self.skip_ascii(1);

        let mut name = String::new();
        while !self.is_blankz_at(0) && !self.peek().is_some_and(is_flow_indicator) {
            self.read_char(&mut name);
        }
        if name.is_empty() {
            let message = if alias {
                "alias name must not be empty"
            } else {
                "anchor name must not be empty"
            };
            self.invalid_from(start, message);
            return;
        }
        let end = self.mark();
        let kind = if alias {
            TokenKind::Alias(name)
        } else {
            TokenKind::Anchor(name)
        };
        self.push_token(kind, start, end);
    }

    pub(super) fn fetch_tag(&mut self) {
        self.save_simple_key();
        self.simple_key_allowed = false;
        let start = self.mark();
        match self.scan_tag() {
            Ok((handle, suffix)) => {
                let end = self.mark();
                let separated = self.is_blankz_at(0)
                    || (self.state.in_flow() && self.peek().is_some_and(is_flow_indicator));
                if separated {
                    self.push_token(TokenKind::Tag { handle, suffix }, start, end);
                } else {
                    self.invalid_from(start, "expected whitespace or a line break after a tag");
                }
            }
            Err(message) => self.invalid_from(start, message),
        }
    }

    /// Scans a tag from its leading `!`, returning `(handle, suffix)`.
    fn scan_tag(&mut self) -> ScanResult<(String, String)> {
        self.skip_ascii(1);
        if self.is_blankz_at(0) {
            return Ok(("!".into(), String::new()));
        }
        match self.peek() {
            Some(b'<') => {
                self.skip_ascii(1);
                let suffix = self.scan_uri(true)?;
                if self.peek() != Some(b'>') {
                    return Err("verbatim tag is missing its closing '>'".into());
                }
                self.skip_ascii(1);
                if suffix.is_empty() {
                    return Err("verbatim tag must not be empty".into());
                }
                Ok((String::new(), suffix))
            }
            Some(b'!') => {
                self.skip_ascii(1);
                let suffix = self.scan_uri(false)?;
                if suffix.is_empty() {
                    return Err("secondary tag handle '!!' needs a suffix".into());
                }
                Ok(("!!".into(), suffix))
            }
            _ => {
                let mut run = String::new();
                while self.peek().is_some_and(is_word_char) {
                    self.read_char(&mut run);
                }
                if self.peek() == Some(b'!') {
                    self.skip_ascii(1);
                    let suffix = self.scan_uri(false)?;
                    if suffix.is_empty() {
                        return Err("named tag handle needs a suffix".into());
                    }
                    Ok((alloc::format!("!{run}!"), suffix))
                } else {
                    run.push_str(&self.scan_uri(false)?);
                    Ok(("!".into(), run))
                }
            }
        }
    }

    /// Scans URI characters, decoding `%XX` escapes. `verbatim` allows the
    /// full URI set; otherwise `!` and flow indicators end the run.
    pub(super) fn scan_uri(&mut self, verbatim: bool) -> ScanResult<String> {
        let allowed: fn(u8) -> bool = if verbatim { is_uri_char } else { is_tag_char };
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                Some(b'%') => {
                    let high = self.peek_at(1).and_then(|b| char::from(b).to_digit(16));
                    let low = self.peek_at(2).and_then(|b| char::from(b).to_digit(16));
                    let (Some(high), Some(low)) = (high, low) else {
                        return Err("invalid percent-escape in tag URI".into());
                    };
                    #[allow(clippy::cast_possible_truncation)]
                    bytes.push(((high << 4) | low) as u8);
                    self.skip_ascii(3);
                }
                Some(byte) if allowed(byte) => {
                    bytes.push(byte);
                    self.skip_ascii(1);
                }
                _ => break,
            }
        }
        String::from_utf8(bytes).map_err(|_| "percent-escaped tag URI is not valid UTF-8".into())
    }
}
