//! `%YAML` and `%TAG` directives.

use alloc::{borrow::Cow, format, string::String};

use super::{
    Scanner,
    node::{is_uri_char, is_word_char},
};
use crate::{
    options::YamlVersion,
    position::Mark,
    source::ByteSource,
    token::TokenKind,
};

/// A decimal component of a `%YAML` version.
enum Number {
    Value(u32),
    Missing,
    Overflow,
}

impl<S: ByteSource> Scanner<S> {
    pub(super) fn fetch_directive(&mut self) {
        if self.pos.column() != 0 {
            self.fetch_invalid_char("directives must start at the beginning of a line");
            return;
        }
        self.unroll_indent(-1);
        self.remove_simple_key();
        self.simple_key_allowed = false;

        let start = self.mark();
        self.skip_ascii(1);
        let mut name = String::new();
        while !self.is_blankz_at(0) {
            self.read_char(&mut name);
        }
        match name.as_str() {
            "YAML" => self.scan_version_directive(start),
            "TAG" => self.scan_tag_directive(start),
            "" => self.invalid_from(start, "directive name is missing"),
            _ => self.invalid_from(start, format!("unknown directive '%{name}'")),
        }
    }

    fn scan_version_directive(&mut self, start: Mark) {
        self.skip_blanks();
        let major = self.scan_decimal();
        let minor = if self.peek() == Some(b'.') {
            self.skip_ascii(1);
            self.scan_decimal()
        } else {
            Number::Missing
        };
        let end = self.mark();
        let terminated = self.is_blankz_at(0);

        let (major, minor) = match (major, minor) {
            (Number::Overflow, _) | (_, Number::Overflow) => {
                self.recover_version(start, "YAML version number does not fit in 32 bits");
                return;
            }
            (Number::Value(major), Number::Value(minor)) if terminated => (major, minor),
            _ => {
                self.recover_version(start, "malformed YAML version, expected MAJOR.MINOR");
                return;
            }
        };

        if let Some(version) = YamlVersion::from_numbers(major, minor) {
            self.state.version = version;
        } else {
            self.warn(
                format!("unsupported YAML version {major}.{minor}; assuming 1.2"),
                start,
                end,
            );
            self.state.version = YamlVersion::V1_2;
        }
        self.finish_directive(TokenKind::VersionDirective { major, minor }, start, end);
    }

    /// Drops the rest of the line and falls back to YAML 1.2.
    fn recover_version(&mut self, start: Mark, problem: &str) {
        self.skip_to_resync_point();
        let end = self.mark();
        self.warn(format!("{problem}; assuming 1.2"), start, end);
        self.state.version = YamlVersion::V1_2;
        self.push_token(TokenKind::VersionDirective { major: 1, minor: 2 }, start, end);
    }

    fn scan_decimal(&mut self) -> Number {
        let mut value = 0u32;
        let mut digits = 0;
        let mut overflow = false;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            digits += 1;
            match value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(digit - b'0')))
            {
                Some(next) => value = next,
                None => overflow = true,
            }
            self.skip_ascii(1);
        }
        match (digits, overflow) {
            (0, _) => Number::Missing,
            (_, true) => Number::Overflow,
            _ => Number::Value(value),
        }
    }

    fn scan_tag_directive(&mut self, start: Mark) {
        let (handle, prefix) = match self.scan_tag_directive_parts() {
            Ok(parts) => parts,
            Err(message) => {
                self.invalid_from(start, message);
                return;
            }
        };
        let end = self.mark();
        self.finish_directive(TokenKind::TagDirective { handle, prefix }, start, end);
    }

    fn scan_tag_directive_parts(&mut self) -> Result<(String, String), Cow<'static, str>> {
        if !self.is_blank_at(0) {
            return Err("expected whitespace after '%TAG'".into());
        }
        self.skip_blanks();

        if self.peek() != Some(b'!') {
            return Err("tag handle must start with '!'".into());
        }
        let mut handle = String::from("!");
        self.skip_ascii(1);
        while self.peek().is_some_and(is_word_char) {
            self.read_char(&mut handle);
        }
        if self.peek() == Some(b'!') {
            handle.push('!');
            self.skip_ascii(1);
        } else if handle.len() > 1 {
            return Err("named tag handle must end with '!'".into());
        }

        if !self.is_blank_at(0) {
            return Err("expected whitespace between tag handle and prefix".into());
        }
        self.skip_blanks();

        let mut prefix = String::new();
        match self.peek() {
            Some(b'!') => {
                prefix.push('!');
                self.skip_ascii(1);
            }
            Some(byte) if byte != b'%' && !is_uri_char(byte) => {
                return Err("invalid character in tag prefix".into());
            }
            None => return Err("tag prefix is missing".into()),
            _ => {}
        }
        prefix.push_str(&self.scan_uri(true)?);
        if prefix.is_empty() {
            return Err("tag prefix is missing".into());
        }
        if !self.is_blankz_at(0) {
            return Err("invalid character in tag prefix".into());
        }
        Ok((handle, prefix))
    }

    /// Emits a directive token, checking that only a comment follows it on
    /// its line.
    fn finish_directive(&mut self, kind: TokenKind, start: Mark, end: Mark) {
        self.skip_blanks();
        let comment = if self.peek() == Some(b'#') {
            Some(self.scan_comment(true))
        } else {
            None
        };
        if !self.is_breakz_at(0) {
            let junk = self.mark();
            self.skip_to_resync_point();
            let here = self.mark();
            self.warn("unexpected content after directive", junk, here);
        }
        self.push_token(kind, start, end);
        if let Some(comment) = comment {
            self.queue_token(comment);
        }
    }
}
