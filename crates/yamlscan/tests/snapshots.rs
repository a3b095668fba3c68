#![allow(missing_docs)]

mod common;

use yamlscan::{ScannerOptions, SliceSource};

use crate::common::{collect, render, tokens};

#[test]
fn flow_sequence_in_a_mapping() {
    insta::assert_snapshot!(render(&tokens("key: [a, 'b']\n")), @r#"
    1:1..1:1 StreamStart(Utf8)
    1:1..1:4 Scalar { value: "key", style: Plain }
    1:4..1:5 MappingValue
    1:6..1:7 FlowSequenceStart
    1:7..1:8 Scalar { value: "a", style: Plain }
    1:8..1:9 FlowEntrySeparator
    1:10..1:13 Scalar { value: "b", style: SingleQuoted }
    1:13..1:14 FlowSequenceEnd
    2:1..2:1 StreamEnd
    "#);
}

#[test]
fn reserved_indicator_becomes_invalid() {
    insta::assert_snapshot!(render(&tokens("bad: @oops\n")), @r#"
    1:1..1:1 StreamStart(Utf8)
    1:1..1:4 Scalar { value: "bad", style: Plain }
    1:4..1:5 MappingValue
    1:6..1:11 Invalid
        ! '@' and '`' are reserved and cannot start a plain scalar
    2:1..2:1 StreamEnd
    "#);
}

#[test]
fn unknown_escape_is_kept_with_a_warning() {
    insta::assert_snapshot!(render(&tokens("\"a\\q\"")), @r#"
    1:1..1:1 StreamStart(Utf8)
    1:1..1:6 Scalar { value: "a\\q", style: DoubleQuoted }
        ! unknown escape sequence '\q'
    1:6..1:6 StreamEnd
    "#);
}

#[test]
fn block_structure_tokens() {
    let options = ScannerOptions {
        block_structure: true,
        ..ScannerOptions::default()
    };
    let tokens = collect(SliceSource::new(b"- a\n- b: c\n"), options);
    insta::assert_snapshot!(render(&tokens), @r#"
    1:1..1:1 StreamStart(Utf8)
    1:1..1:1 BlockSequenceStart
    1:1..1:2 BlockEntry
    1:3..1:4 Scalar { value: "a", style: Plain }
    2:1..2:2 BlockEntry
    2:3..2:3 BlockMappingStart
    2:3..2:3 MappingKey
    2:3..2:4 Scalar { value: "b", style: Plain }
    2:4..2:5 MappingValue
    2:6..2:7 Scalar { value: "c", style: Plain }
    3:1..3:1 BlockMappingEnd
    3:1..3:1 BlockSequenceEnd
    3:1..3:1 StreamEnd
    "#);
}
