//! Fuzzing target for condition parsing and evaluation
//!
//! Arbitrary condition text must either parse or fail with an error, and a
//! parsed condition must evaluate against any item without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use reshape_core::condition::{evaluate_condition, Condition};
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let items = [
        json!(null),
        json!(42),
        json!("text"),
        json!({"status": "paid", "total": 12.5, "tags": ["a"]}),
        json!({"nested": {"deep": {"value": -1}}}),
    ];

    if let Ok(condition) = Condition::parse(&source) {
        for item in &items {
            let _ = condition.evaluate(item);
        }
    }

    // The lenient entry point never fails
    for item in &items {
        let _ = evaluate_condition(&source, item);
    }
});
