#![allow(missing_docs, dead_code)]

use std::fmt::Write;

use yamlscan::{ByteSource, Scanner, ScannerOptions, SliceSource, Token};

/// A document touching most token kinds.
pub const DOCUMENT: &str = "\
%YAML 1.2
%TAG !e! tag:example.com,2000:app/
--- # config
name: &name \"yaml\\tscan\"
alias: *name
tags: [!e!one, !!str two, 'three']
script: |
  echo hi

  exit 0
summary: >-
  folded
  text
...
";

pub fn collect<S: ByteSource>(source: S, options: ScannerOptions) -> Vec<Token> {
    Scanner::new(source, options)
        .collect::<Result<_, _>>()
        .expect("scan failed")
}

pub fn tokens(input: &str) -> Vec<Token> {
    collect(SliceSource::new(input.as_bytes()), ScannerOptions::default())
}

/// One line per token: one-based span, kind, then any warnings.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        writeln!(out, "{}..{} {:?}", token.start, token.end, token.kind).unwrap();
        for warning in &token.warnings {
            writeln!(out, "    ! {}", warning.message).unwrap();
        }
    }
    out
}
