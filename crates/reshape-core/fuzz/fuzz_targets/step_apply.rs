//! Fuzzing target for the step interpreter
//!
//! The input is split into a step definition and a document. Any step that
//! deserializes must apply to any document without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use reshape_core::{apply, TransformationStep};
use serde_json::{json, Value};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the split point
    let split_point = (data[0] as usize) % data.len();
    let (step_bytes, doc_bytes) = data[1..].split_at(split_point.min(data.len() - 1));

    let Ok(step) = serde_json::from_slice::<TransformationStep>(step_bytes) else {
        return;
    };

    let documents = [
        json!(null),
        json!([]),
        json!({}),
        json!([3, 1, 2]),
        json!([{"a": 1}, {"a": "2"}, {"b": null}]),
        json!({"user": {"name": " ana "}, "items": [{"price": 2}]}),
    ];
    for document in &documents {
        let _ = apply(document, &step);
    }

    if let Ok(document) = serde_json::from_slice::<Value>(doc_bytes) {
        let _ = apply(&document, &step);
    }
});
