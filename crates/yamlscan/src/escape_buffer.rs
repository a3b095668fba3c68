//! Accumulator for the hexadecimal escapes of double-quoted scalars.
//!
//! [`HexEscapeBuffer`] takes the digits of a `\xXX`, `\uXXXX` or
//! `\UXXXXXXXX` escape one at a time and yields the [`char`] once the
//! expected number of digits has arrived.
//!
//! # Errors
//!
//! - A byte that is not an ASCII hexadecimal digit is rejected without being
//!   consumed, so the caller can keep it as ordinary content.
//! - A complete escape that does not denote a Unicode scalar value (a
//!   surrogate, or anything above `0x10FFFF`) is rejected.
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeError {
    #[error("'{}' is not a hexadecimal digit", char::from(*.0))]
    InvalidDigit(u8),
    #[error("escape 0x{0:X} does not denote a valid character")]
    InvalidCodepoint(u32),
}

#[derive(Debug)]
/// Accumulates 2, 4 or 8 hexadecimal digits into a codepoint.
pub(crate) struct HexEscapeBuffer {
    acc: u32,
    len: u8,
    width: u8,
}

impl HexEscapeBuffer {
    /// Creates a buffer expecting `width` digits.
    pub(crate) fn new(width: u8) -> Self {
        debug_assert!(matches!(width, 2 | 4 | 8), "unsupported escape width {width}");
        Self {
            acc: 0,
            len: 0,
            width,
        }
    }

    pub(crate) fn width(&self) -> u8 {
        self.width
    }

    /// Feeds one byte.
    ///
    /// - `Ok(None)` while more digits are expected.
    /// - `Ok(Some(ch))` once the last digit arrives.
    /// - `Err(InvalidDigit)` if `digit` is not hexadecimal; the buffer is
    ///   unchanged.
    /// - `Err(InvalidCodepoint)` if the completed value is not a `char`.
    pub(crate) fn feed(&mut self, digit: u8) -> Result<Option<char>, EscapeError> {
        let value = hex_val(digit).ok_or(EscapeError::InvalidDigit(digit))?;
        self.acc = (self.acc << 4) | value;
        self.len += 1;
        if self.len < self.width {
            return Ok(None);
        }
        let code = self.acc;
        self.acc = 0;
        self.len = 0;
        char::from_u32(code)
            .map(Some)
            .ok_or(EscapeError::InvalidCodepoint(code))
    }
}

fn hex_val(digit: u8) -> Option<u32> {
    char::from(digit).to_digit(16)
}

#[cfg(test)]
mod tests {
    use super::{EscapeError, HexEscapeBuffer};

    #[test]
    fn decodes_each_width() {
        let mut buf = HexEscapeBuffer::new(2);
        assert_eq!(buf.feed(b'4'), Ok(None));
        assert_eq!(buf.feed(b'1'), Ok(Some('A')));

        let mut buf = HexEscapeBuffer::new(4);
        for digit in *b"00e" {
            assert_eq!(buf.feed(digit), Ok(None));
        }
        assert_eq!(buf.feed(b'9'), Ok(Some('é')));

        let mut buf = HexEscapeBuffer::new(8);
        for digit in *b"0001F60" {
            assert_eq!(buf.feed(digit), Ok(None));
        }
        assert_eq!(buf.feed(b'0'), Ok(Some('😀')));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = HexEscapeBuffer::new(4);
        for digit in *b"AbC" {
            assert!(buf.feed(digit).unwrap().is_none());
        }
        assert_eq!(buf.feed(b'd'), Ok(char::from_u32(0xABCD)));
    }

    #[test]
    fn invalid_digit_leaves_the_buffer_alone() {
        let mut buf = HexEscapeBuffer::new(2);
        assert_eq!(buf.feed(b'F'), Ok(None));
        assert_eq!(buf.feed(b'G'), Err(EscapeError::InvalidDigit(b'G')));
        assert_eq!(buf.feed(b'F'), Ok(Some('\u{FF}')));
    }

    #[test]
    fn surrogates_and_out_of_range_values_are_rejected() {
        let mut buf = HexEscapeBuffer::new(4);
        for digit in *b"D80" {
            assert_eq!(buf.feed(digit), Ok(None));
        }
        assert_eq!(buf.feed(b'0'), Err(EscapeError::InvalidCodepoint(0xD800)));

        let mut buf = HexEscapeBuffer::new(8);
        for digit in *b"FFFFFFF" {
            assert_eq!(buf.feed(digit), Ok(None));
        }
        assert_eq!(buf.feed(b'F'), Err(EscapeError::InvalidCodepoint(0xFFFF_FFFF)));
        assert_eq!(buf.width(), 8);
    }
}
