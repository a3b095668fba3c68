//! Incremental transcoding of raw bytes into the UTF-8 working buffer.

use crate::{buffer::RingBuffer, encoding::Encoding, error::EncodingErrorKind};

/// Byte length of a UTF-8 sequence from its leading byte.
pub(crate) fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/// Decodes one codepoint from the front of `raw` into `out`.
///
/// Returns `Ok(Some(width))` with the raw bytes consumed, or `Ok(None)` when
/// `raw` holds no complete codepoint yet and more input may follow. At end of
/// input a partial codepoint is an error.
pub(crate) fn decode_one(
    encoding: Encoding,
    raw: &mut RingBuffer<u8>,
    out: &mut RingBuffer<u8>,
    at_eof: bool,
) -> Result<Option<usize>, EncodingErrorKind> {
    let available = raw.len();
    if available == 0 {
        return Ok(None);
    }
    let truncated = |needed: usize| {
        if available >= needed {
            Ok(false)
        } else if at_eof {
            Err(EncodingErrorKind::TruncatedCodepoint)
        } else {
            Ok(true)
        }
    };

    let width = match encoding {
        Encoding::Utf8 => {
            let lead = *raw.peek();
            utf8_width(lead).ok_or(EncodingErrorKind::InvalidLeadingByte(lead))?
        }
        Encoding::Utf16Le | Encoding::Utf16Be => {
            if truncated(2)? {
                return Ok(None);
            }
            match unit16(encoding, raw, 0) {
                0xD800..=0xDBFF => 4,
                unit @ 0xDC00..=0xDFFF => {
                    return Err(EncodingErrorKind::InvalidSurrogate(u32::from(unit)));
                }
                _ => 2,
            }
        }
        Encoding::Utf32Le | Encoding::Utf32Be => 4,
    };
    if truncated(width)? {
        return Ok(None);
    }

    let codepoint = match encoding {
        Encoding::Utf8 => {
            let mut bytes = [0u8; 4];
            for (offset, byte) in bytes.iter_mut().enumerate().take(width) {
                *byte = *raw.peek_at(offset);
            }
            match bstr::decode_utf8(&bytes[..width]) {
                (Some(ch), len) if len == width => u32::from(ch),
                _ => return Err(EncodingErrorKind::InvalidSequence),
            }
        }
        Encoding::Utf16Le | Encoding::Utf16Be => {
            let lead = u32::from(unit16(encoding, raw, 0));
            if width == 2 {
                lead
            } else {
                let trail = u32::from(unit16(encoding, raw, 2));
                if !(0xDC00..=0xDFFF).contains(&trail) {
                    return Err(EncodingErrorKind::InvalidSurrogate(trail));
                }
                0x1_0000 + ((lead - 0xD800) << 10) + (trail - 0xDC00)
            }
        }
        Encoding::Utf32Le | Encoding::Utf32Be => {
            let mut bytes = [0u8; 4];
            for (offset, byte) in bytes.iter_mut().enumerate() {
                *byte = *raw.peek_at(offset);
            }
            if encoding == Encoding::Utf32Le {
                u32::from_le_bytes(bytes)
            } else {
                u32::from_be_bytes(bytes)
            }
        }
    };

    encode_utf8(codepoint, out)?;
    raw.skip(width);
    Ok(Some(width))
}

fn unit16(encoding: Encoding, raw: &RingBuffer<u8>, offset: usize) -> u16 {
    let pair = [*raw.peek_at(offset), *raw.peek_at(offset + 1)];
    if encoding == Encoding::Utf16Le {
        u16::from_le_bytes(pair)
    } else {
        u16::from_be_bytes(pair)
    }
}

/// Appends the UTF-8 form of `codepoint` to `out`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn encode_utf8(
    codepoint: u32,
    out: &mut RingBuffer<u8>,
) -> Result<(), EncodingErrorKind> {
    out.reserve(4);
    match codepoint {
        0x00..=0x7F => out.push(codepoint as u8),
        0x80..=0x7FF => {
            out.push(0xC0 | (codepoint >> 6) as u8);
            out.push(0x80 | (codepoint & 0x3F) as u8);
        }
        0xD800..=0xDFFF => return Err(EncodingErrorKind::InvalidSurrogate(codepoint)),
        0x800..=0xFFFF => {
            out.push(0xE0 | (codepoint >> 12) as u8);
            out.push(0x80 | ((codepoint >> 6) & 0x3F) as u8);
            out.push(0x80 | (codepoint & 0x3F) as u8);
        }
        0x1_0000..=0x10_FFFF => {
            out.push(0xF0 | (codepoint >> 18) as u8);
            out.push(0x80 | ((codepoint >> 12) & 0x3F) as u8);
            out.push(0x80 | ((codepoint >> 6) & 0x3F) as u8);
            out.push(0x80 | (codepoint & 0x3F) as u8);
        }
        _ => return Err(EncodingErrorKind::CodepointOutOfRange(codepoint)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::options::GrowthPolicy;

    fn ring(bytes: &[u8]) -> RingBuffer<u8> {
        let mut ring = RingBuffer::new(GrowthPolicy::default());
        for &byte in bytes {
            ring.push(byte);
        }
        ring
    }

    fn decode_all(encoding: Encoding, bytes: &[u8]) -> Result<Vec<u8>, EncodingErrorKind> {
        let mut raw = ring(bytes);
        let mut out = RingBuffer::new(GrowthPolicy::default());
        while decode_one(encoding, &mut raw, &mut out, true)?.is_some() {}
        Ok(out.iter().copied().collect())
    }

    #[test]
    fn utf16_surrogate_pairs() {
        let bytes: Vec<u8> = "a😀".encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(decode_all(Encoding::Utf16Be, &bytes).unwrap(), "a😀".as_bytes());
        let bytes: Vec<u8> = "é😀".encode_utf16().flat_map(u16::to_le_bytes).collect();
        assert_eq!(decode_all(Encoding::Utf16Le, &bytes).unwrap(), "é😀".as_bytes());
    }

    #[test]
    fn utf32_values() {
        let bytes: Vec<u8> = "x€".chars().flat_map(|c| u32::from(c).to_le_bytes()).collect();
        assert_eq!(decode_all(Encoding::Utf32Le, &bytes).unwrap(), "x€".as_bytes());
    }

    #[test]
    fn errors() {
        assert_eq!(
            decode_all(Encoding::Utf8, &[b'a', 0xFF]),
            Err(EncodingErrorKind::InvalidLeadingByte(0xFF))
        );
        assert_eq!(
            decode_all(Encoding::Utf8, &[0xC3, 0x28]),
            Err(EncodingErrorKind::InvalidSequence)
        );
        assert_eq!(
            decode_all(Encoding::Utf8, &[0xE2, 0x82]),
            Err(EncodingErrorKind::TruncatedCodepoint)
        );
        assert_eq!(
            decode_all(Encoding::Utf16Be, &[0xDC, 0x00]),
            Err(EncodingErrorKind::InvalidSurrogate(0xDC00))
        );
        assert_eq!(
            decode_all(Encoding::Utf16Be, &[0xD8, 0x00, 0x00, 0x41]),
            Err(EncodingErrorKind::InvalidSurrogate(0x41))
        );
        assert_eq!(
            decode_all(Encoding::Utf16Le, &[0x41]),
            Err(EncodingErrorKind::TruncatedCodepoint)
        );
        assert_eq!(
            decode_all(Encoding::Utf32Be, &[0x00, 0x11, 0x00, 0x00]),
            Err(EncodingErrorKind::CodepointOutOfRange(0x11_0000))
        );
        assert_eq!(
            decode_all(Encoding::Utf32Be, &[0x00, 0x00, 0xD8, 0x00]),
            Err(EncodingErrorKind::InvalidSurrogate(0xD800))
        );
    }

    #[test]
    fn partial_codepoints_wait_for_more_input() {
        let mut raw = ring(&[0xE2, 0x82]);
        let mut out = RingBuffer::new(GrowthPolicy::default());
        assert_eq!(decode_one(Encoding::Utf8, &mut raw, &mut out, false), Ok(None));
        raw.push(0xAC);
        assert_eq!(decode_one(Encoding::Utf8, &mut raw, &mut out, false), Ok(Some(3)));
        assert_eq!(out.iter().copied().collect::<Vec<_>>(), "€".as_bytes());
        assert!(raw.is_empty());
    }
}
