#![allow(missing_docs)]

mod common;

use std::io::{self, Cursor, Read};

use quickcheck_macros::quickcheck;
use rstest::rstest;
use yamlscan::{
    ChunkSource, Encoding, ReaderSource, Scanner, ScannerOptions, SliceSource, Token, TokenKind,
};

use crate::common::{DOCUMENT, collect, tokens};

fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        Encoding::Utf32Le => text.chars().flat_map(|c| u32::from(c).to_le_bytes()).collect(),
        Encoding::Utf32Be => text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect(),
    }
}

/// Everything after `StreamStart`, which names the encoding.
fn body(mut tokens: Vec<Token>) -> Vec<Token> {
    tokens.remove(0);
    tokens
}

#[rstest]
fn chunk_size_does_not_matter(#[values(1, 2, 3, 7, 64)] chunk: usize) {
    let tokens = collect(
        SliceSource::with_chunk_size(DOCUMENT.as_bytes(), chunk),
        ScannerOptions {
            raw_buffer_capacity: 16,
            ..ScannerOptions::default()
        },
    );
    assert_eq!(tokens, crate::common::tokens(DOCUMENT));
}

#[rstest]
fn every_encoding_gives_the_same_tokens(
    #[values(
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Utf32Le,
        Encoding::Utf32Be
    )]
    encoding: Encoding,
    #[values(false, true)] bom: bool,
) {
    let text = if bom {
        format!("\u{FEFF}{DOCUMENT}")
    } else {
        DOCUMENT.to_string()
    };
    let bytes = encode(&text, encoding);
    let tokens = collect(SliceSource::new(&bytes), ScannerOptions::default());
    assert_eq!(tokens[0].kind, TokenKind::StreamStart(encoding));
    assert_eq!(body(tokens), body(crate::common::tokens(DOCUMENT)));
}

#[test]
fn chunk_source_splits_anywhere() {
    let chunks: Vec<&[u8]> = DOCUMENT.as_bytes().chunks(5).collect();
    let tokens = collect(ChunkSource::new(chunks), ScannerOptions::default());
    assert_eq!(tokens, crate::common::tokens(DOCUMENT));
}

#[test]
fn reader_source_reads_from_io() {
    let tokens = collect(
        ReaderSource::new(Cursor::new(DOCUMENT.as_bytes())),
        ScannerOptions::default(),
    );
    assert_eq!(tokens, crate::common::tokens(DOCUMENT));
}

/// Fails every read after the first `good` bytes.
struct Flaky<'a> {
    bytes: &'a [u8],
    good: usize,
}

impl Read for Flaky<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.good == 0 {
            return Err(io::Error::other("connection reset"));
        }
        let count = self.good.min(buf.len()).min(self.bytes.len());
        buf[..count].copy_from_slice(&self.bytes[..count]);
        self.bytes = &self.bytes[count..];
        self.good -= count;
        Ok(count)
    }
}

#[test]
fn io_errors_end_the_stream() {
    let source = ReaderSource::new(Flaky {
        bytes: b"a: b\nc: d\n",
        good: 5,
    });
    let tokens = collect(source, ScannerOptions::default());
    let names: Vec<_> = tokens.iter().map(|token| token.kind.name()).collect();
    assert_eq!(
        names,
        ["StreamStart", "Scalar", "MappingValue", "Scalar", "StreamEnd"]
    );
}

#[test]
fn truncated_utf16_is_an_encoding_error() {
    let mut bytes = encode("a: b", Encoding::Utf16Le);
    bytes.pop();
    let result: Result<Vec<_>, _> = Scanner::from_bytes(&bytes).collect();
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("encoding error at byte 6"), "{err}");
}

#[quickcheck]
fn utf16_matches_utf8(text: String) -> bool {
    // A leading NUL would make the UTF-8 form sniff as UTF-16 or UTF-32.
    let text = format!("a{text}");
    if text.as_bytes().get(1) == Some(&0) {
        return true;
    }
    let utf8 = tokens(&text);
    let utf16 = collect(
        SliceSource::new(&encode(&text, Encoding::Utf16Le)),
        ScannerOptions::default(),
    );
    body(utf8) == body(utf16)
}
