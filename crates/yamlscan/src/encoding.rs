//! Detection of the stream's character encoding.

use core::fmt;

/// Unicode encodings a YAML stream may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// UTF-8, the default.
    Utf8,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
    /// UTF-32, little endian.
    Utf32Le,
    /// UTF-32, big endian.
    Utf32Be,
}

impl Encoding {
    /// Picks the encoding from the first (up to) four bytes of a stream.
    ///
    /// Returns the encoding and the length of the byte order mark, which the
    /// reader consumes without decoding. Byte order marks win, then the
    /// implicit-ASCII patterns YAML streams produce when they start with an
    /// ASCII character, then UTF-8. Patterns only match when all their bytes
    /// are present.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> (Self, usize) {
        match prefix {
            [0x00, 0x00, 0xFE, 0xFF, ..] => (Self::Utf32Be, 4),
            [0xFF, 0xFE, 0x00, 0x00, ..] => (Self::Utf32Le, 4),
            [0xFE, 0xFF, ..] => (Self::Utf16Be, 2),
            [0xFF, 0xFE, ..] => (Self::Utf16Le, 2),
            [0xEF, 0xBB, 0xBF, ..] => (Self::Utf8, 3),
            [0x00, 0x00, 0x00, _, ..] => (Self::Utf32Be, 0),
            [_, 0x00, 0x00, 0x00, ..] => (Self::Utf32Le, 0),
            [0x00, _, ..] => (Self::Utf16Be, 0),
            [_, 0x00, ..] => (Self::Utf16Le, 0),
            _ => (Self::Utf8, 0),
        }
    }

    /// Conventional name of the encoding.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Utf32Be => "UTF-32BE",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Encoding::{self, *};

    #[test]
    fn sniff_table() {
        let cases: &[(&[u8], (Encoding, usize))] = &[
            (&[0x00, 0x00, 0xFE, 0xFF, b'a'], (Utf32Be, 4)),
            (&[0xFF, 0xFE, 0x00, 0x00], (Utf32Le, 4)),
            (&[0xFE, 0xFF, 0x00, b'a'], (Utf16Be, 2)),
            (&[0xFF, 0xFE, b'a', 0x00], (Utf16Le, 2)),
            (&[0xFF, 0xFE, 0x00], (Utf16Le, 2)),
            (&[0xEF, 0xBB, 0xBF, b'a'], (Utf8, 3)),
            (&[0x00, 0x00, 0x00, b'a'], (Utf32Be, 0)),
            (&[b'a', 0x00, 0x00, 0x00], (Utf32Le, 0)),
            (&[0x00, b'a', 0x00, b'b'], (Utf16Be, 0)),
            (&[b'a', 0x00, b'b', 0x00], (Utf16Le, 0)),
            (&[b'a', 0x00], (Utf16Le, 0)),
            (&[0x00, 0x00, 0x00], (Utf16Be, 0)),
            (&[b'a', b'b'], (Utf8, 0)),
            (&[b'a'], (Utf8, 0)),
            (&[], (Utf8, 0)),
        ];
        for (prefix, expected) in cases {
            assert_eq!(Encoding::detect(prefix), *expected, "prefix {prefix:02X?}");
        }
    }

    #[test]
    fn only_the_first_four_bytes_matter() {
        assert_eq!(
            Encoding::detect(&[b'a', 0x00, 0x00, 0x00, 0xFF, 0xFF]),
            Encoding::detect(&[b'a', 0x00, 0x00, 0x00]),
        );
    }
}
