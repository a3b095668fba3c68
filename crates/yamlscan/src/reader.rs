//! Encoding-aware buffered reader.
//!
//! The reader owns the byte source and two rings: raw bytes as they come
//! from the source, and the UTF-8 working buffer the scanner looks at.
//! Codepoints move from the first to the second lazily, one at a time, as
//! the scanner asks to look further ahead.
//!
//! The first lookahead request sniffs the encoding from up to four raw bytes
//! and drops the byte order mark. A decode failure is sticky: it is recorded,
//! the reader behaves as if the input ended, and the scanner reports the
//! error instead of the next token.

use tracing::trace;

use crate::{
    buffer::RingBuffer,
    decode,
    encoding::Encoding,
    error::ScanError,
    options::ScannerOptions,
    source::ByteSource,
};

#[derive(Debug)]
pub(crate) struct Reader<S> {
    source: S,
    raw: RingBuffer<u8>,
    utf8: RingBuffer<u8>,
    encoding: Option<Encoding>,
    /// The source reported end of input.
    source_done: bool,
    /// Raw bytes consumed so far, BOM included.
    raw_index: u64,
    error: Option<ScanError>,
}

impl<S: ByteSource> Reader<S> {
    pub(crate) fn new(source: S, options: &ScannerOptions) -> Self {
        let raw_capacity = options.raw_capacity();
        let mut raw_growth = options.growth;
        raw_growth.max_capacity = raw_capacity;
        Self {
            source,
            raw: RingBuffer::with_capacity(raw_capacity, raw_growth),
            utf8: RingBuffer::new(options.growth),
            encoding: None,
            source_done: false,
            raw_index: 0,
            error: None,
        }
    }

    pub(crate) fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    pub(crate) fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    /// Detects the encoding if that has not happened yet.
    pub(crate) fn ensure_encoding(&mut self) -> Encoding {
        if let Some(encoding) = self.encoding {
            return encoding;
        }
        while self.raw.len() < 4 && !self.source_done {
            self.refill();
        }
        let mut prefix = [0u8; 4];
        let available = self.raw.len().min(4);
        for (offset, byte) in prefix.iter_mut().enumerate().take(available) {
            *byte = *self.raw.peek_at(offset);
        }
        let (encoding, bom) = Encoding::detect(&prefix[..available]);
        self.raw.skip(bom);
        self.raw_index += bom as u64;
        trace!(%encoding, bom, "detected stream encoding");
        self.encoding = Some(encoding);
        encoding
    }

    /// Makes sure at least `n` UTF-8 bytes are buffered. Returns `false` when
    /// the input ends first or cannot be decoded.
    pub(crate) fn cache(&mut self, n: usize) -> bool {
        while self.utf8.len() < n {
            if !self.decode_next() {
                return false;
            }
        }
        true
    }

    fn decode_next(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let encoding = self.ensure_encoding();
        loop {
            match decode::decode_one(encoding, &mut self.raw, &mut self.utf8, self.source_done) {
                Ok(Some(width)) => {
                    self.raw_index += width as u64;
                    return true;
                }
                Ok(None) if self.source_done => return false,
                Ok(None) => self.refill(),
                Err(kind) => {
                    // Nothing after the bad codepoint will ever be decoded.
                    self.raw.clear();
                    self.error = Some(ScanError::Encoding {
                        kind,
                        index: self.raw_index,
                    });
                    return false;
                }
            }
        }
    }

    fn refill(&mut self) {
        if self.raw.fill(&mut self.source).is_none() {
            self.source_done = true;
        }
    }

    /// The UTF-8 byte `offset` positions ahead, or `None` past the end.
    pub(crate) fn peek_at(&mut self, offset: usize) -> Option<u8> {
        if self.cache(offset + 1) {
            Some(*self.utf8.peek_at(offset))
        } else {
            None
        }
    }

    /// Drops `n` buffered bytes. The caller must have looked at them first.
    pub(crate) fn consume(&mut self, n: usize) {
        self.utf8.skip(n);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use quickcheck::{QuickCheck, TestResult};

    use super::*;
    use crate::{error::EncodingErrorKind, source::SliceSource};

    fn read_all<S: ByteSource>(reader: &mut Reader<S>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(byte) = reader.peek_at(0) {
            out.push(byte);
            reader.consume(1);
        }
        out
    }

    fn encode(text: &str, encoding: Encoding, bom: bool) -> Vec<u8> {
        let text = if bom {
            alloc::format!("\u{FEFF}{text}")
        } else {
            text.into()
        };
        match encoding {
            Encoding::Utf8 => text.into_bytes(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Utf32Le => text.chars().flat_map(|c| u32::from(c).to_le_bytes()).collect(),
            Encoding::Utf32Be => text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect(),
        }
    }

    #[test]
    fn bom_is_dropped() {
        let bytes = encode("key: é", Encoding::Utf16Le, true);
        let mut reader = Reader::new(SliceSource::new(&bytes), &ScannerOptions::default());
        assert_eq!(read_all(&mut reader), "key: é".as_bytes());
        assert_eq!(reader.encoding(), Some(Encoding::Utf16Le));
    }

    #[test]
    fn empty_input_defaults_to_utf8() {
        let mut reader = Reader::new(SliceSource::new(b""), &ScannerOptions::default());
        assert_eq!(reader.ensure_encoding(), Encoding::Utf8);
        assert_eq!(reader.peek_at(0), None);
        assert!(reader.error().is_none());
    }

    #[test]
    fn decode_errors_are_sticky_and_carry_the_raw_index() {
        let mut reader = Reader::new(
            SliceSource::new(b"\xEF\xBB\xBFab\xFFc"),
            &ScannerOptions::default(),
        );
        assert_eq!(read_all(&mut reader), b"ab");
        let expected = ScanError::Encoding {
            kind: EncodingErrorKind::InvalidLeadingByte(0xFF),
            index: 5,
        };
        assert_eq!(reader.error(), Some(&expected));
        assert_eq!(reader.peek_at(0), None);
    }

    #[test]
    fn round_trips_every_encoding_through_any_chunking() {
        fn prop(text: String, chunk: u8, which: u8, bom: bool) -> TestResult {
            if text.contains('\u{FEFF}') || text.starts_with('\0') {
                return TestResult::discard();
            }
            // Implicit detection needs an ASCII first character.
            let encoding = [
                Encoding::Utf8,
                Encoding::Utf16Le,
                Encoding::Utf16Be,
                Encoding::Utf32Le,
                Encoding::Utf32Be,
            ][usize::from(which % 5)];
            let text = alloc::format!("a{text}");
            let bytes = encode(&text, encoding, bom);
            let options = ScannerOptions {
                raw_buffer_capacity: 16,
                ..Default::default()
            };
            let source = SliceSource::with_chunk_size(&bytes, usize::from(chunk));
            let mut reader = Reader::new(source, &options);
            let decoded = read_all(&mut reader);
            TestResult::from_bool(
                decoded == text.as_bytes() && reader.encoding() == Some(encoding),
            )
        }

        let tests = if is_ci::cached() { 5_000 } else { 500 };
        QuickCheck::new()
            .tests(tests)
            .quickcheck(prop as fn(String, u8, u8, bool) -> TestResult);
    }
}
