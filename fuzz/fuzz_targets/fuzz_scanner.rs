#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use yamlscan::{ScanError, Scanner, ScannerOptions, SliceSource, Token, TokenKind};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    block_structure: bool,
    chunk_size: u8,
    raw_buffer_capacity: u8,
    bytes: &'a [u8],
}

fn scan(bytes: &[u8], chunk: usize, options: ScannerOptions) -> Result<Vec<Token>, ScanError> {
    let mut scanner = Scanner::new(SliceSource::with_chunk_size(bytes, chunk), options);
    let tokens = scanner.by_ref().collect::<Result<Vec<_>, _>>();
    assert!(!scanner.has_next_token());
    // Stream end and encoding errors are both terminal.
    assert!(scanner.next_token().is_err());
    tokens
}

fuzz_target!(|input: Input<'_>| {
    let options = ScannerOptions {
        block_structure: input.block_structure,
        ..ScannerOptions::default()
    };
    let reference = scan(input.bytes, input.bytes.len().max(1), options);

    let small = ScannerOptions {
        raw_buffer_capacity: usize::from(input.raw_buffer_capacity),
        ..options
    };
    let chunked = scan(input.bytes, usize::from(input.chunk_size.max(1)), small);
    assert_eq!(reference, chunked, "chunking changed the token stream");

    let Ok(tokens) = reference else {
        return;
    };
    assert!(matches!(
        tokens.first().map(|t| &t.kind),
        Some(TokenKind::StreamStart(_))
    ));
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::StreamEnd));
    let ends = tokens.iter().filter(|t| t.kind == TokenKind::StreamEnd).count();
    assert_eq!(ends, 1);
    for token in &tokens {
        assert!(token.start <= token.end, "{token:?}");
        if token.kind == TokenKind::Invalid {
            assert!(!token.warnings.is_empty(), "{token:?}");
        }
    }
});
