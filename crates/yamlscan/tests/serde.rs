#![cfg(feature = "serde")]
#![allow(missing_docs)]

mod common;

use yamlscan::{ScannerOptions, Token, YamlVersion};

use crate::common::{DOCUMENT, tokens};

#[test]
fn tokens_round_trip_through_json() {
    let tokens = tokens(DOCUMENT);
    let json = serde_json::to_string(&tokens).unwrap();
    let back: Vec<Token> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tokens);
}

#[test]
fn scalar_token_json_shape() {
    let tokens = tokens("a");
    let value = serde_json::to_value(&tokens[1]).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "kind": { "Scalar": { "value": "a", "style": "Plain" } },
            "start": { "index": 0, "line": 0, "column": 0 },
            "end": { "index": 1, "line": 0, "column": 1 },
            "warnings": [],
        })
    );
}

#[test]
fn options_deserialize_from_json() {
    let options: ScannerOptions = serde_json::from_value(serde_json::json!({
        "version": "V1_1",
        "block_structure": true,
        "raw_buffer_capacity": 256,
        "growth": {
            "initial_capacity": 8,
            "scale_factor": 2,
            "max_capacity": 1024,
        },
    }))
    .unwrap();
    assert_eq!(options.version, YamlVersion::V1_1);
    assert!(options.block_structure);
    assert_eq!(options.raw_buffer_capacity, 256);
    assert_eq!(options.growth.max_capacity, 1024);
}
