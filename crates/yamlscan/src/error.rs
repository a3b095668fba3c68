use thiserror::Error;

/// Fatal failures reported by [`Scanner::next_token`](crate::Scanner::next_token).
///
/// Lexical problems are never reported here; they travel as
/// [`Warning`](crate::Warning)s on the token they concern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The byte stream is not valid in its detected encoding.
    ///
    /// `index` is the offset in the raw source, in bytes, of the codepoint
    /// that failed to decode. Once returned, the scanner keeps returning this
    /// error.
    #[error("encoding error at byte {index}: {kind}")]
    Encoding {
        /// What went wrong.
        kind: EncodingErrorKind,
        /// Raw source byte offset of the offending codepoint.
        index: u64,
    },

    /// `next_token` was called after the `StreamEnd` token was returned.
    #[error("next_token called after the end of the stream")]
    StreamEnded,
}

/// The ways a codepoint can fail to decode.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingErrorKind {
    /// A UTF-8 byte that cannot start a codepoint.
    #[error("invalid leading byte 0x{0:02X}")]
    InvalidLeadingByte(u8),
    /// A UTF-8 sequence with bad continuation bytes or an overlong form.
    #[error("invalid UTF-8 sequence")]
    InvalidSequence,
    /// A lone or misordered UTF-16 surrogate, or a surrogate value in UTF-32.
    #[error("invalid surrogate 0x{0:04X}")]
    InvalidSurrogate(u32),
    /// The stream ended in the middle of a codepoint.
    #[error("stream ends inside a codepoint")]
    TruncatedCodepoint,
    /// A UTF-32 value above `0x10FFFF`.
    #[error("codepoint 0x{0:X} is outside the Unicode range")]
    CodepointOutOfRange(u32),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_carry_the_offending_value() {
        let err = ScanError::Encoding {
            kind: EncodingErrorKind::InvalidLeadingByte(0xFF),
            index: 7,
        };
        assert_eq!(err.to_string(), "encoding error at byte 7: invalid leading byte 0xFF");
        assert_eq!(
            EncodingErrorKind::CodepointOutOfRange(0x11_0000).to_string(),
            "codepoint 0x110000 is outside the Unicode range"
        );
    }
}
