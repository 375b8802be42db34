// Tests for output formatting
//
// These tests build real preview results, validation reports, schemas and
// compatibility reports through the engine and check how each format
// renders them.

use super::*;
use reshape_core::{preview_transformations_json, validate_transformations_json};
use reshape_schemas::{analyze_compatibility, infer_schema};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// A writer whose contents stay readable after the OutputWriter takes it
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, 0, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_preview() -> PreviewResult {
    preview_transformations_json(
        &json!({"user": {"name": "ana"}}),
        &json!([
            {"type": "extract", "field": "user.name", "outputField": "name"},
            {"type": "format", "field": "name", "operation": "uppercase"}
        ]),
    )
}

fn sample_metadata() -> RunMetadata {
    RunMetadata {
        request_id: "req_0123".to_string(),
        timestamp: "2025-01-17T10:30:00Z".to_string(),
        duration_ms: 3,
        data_file: "data.json".to_string(),
        pipeline_file: "pipeline.yaml".to_string(),
        step_count: 2,
    }
}

#[test]
fn test_preview_formatting_human() {
    let display = PreviewDisplay {
        show_trace: true,
        metadata: Some(sample_metadata()),
    };

    let formatted = format_preview_result_human(&sample_preview(), &display).unwrap();
    assert!(formatted.contains("═══ Preview Result ═══"));
    assert!(formatted.contains("🔧 Run Details:"));
    assert!(formatted.contains("Request: req_0123"));
    assert!(formatted.contains("Duration: 3ms"));
    assert!(formatted.contains("✅ Applied 2 transformation(s)"));
    assert!(formatted.contains("🔍 Step Trace:"));
    assert!(formatted.contains("  1. extract"));
    assert!(formatted.contains("  2. format"));
    assert!(formatted.contains("\"ANA\""));
}

#[test]
fn test_preview_failure_formatting_human() {
    let result = preview_transformations_json(&json!({"a": 1}), &json!([{"type": "pivot"}]));
    let formatted = format_preview_result_human(&result, &PreviewDisplay::default()).unwrap();
    assert!(formatted.contains("❌ Preview failed:"));
    assert!(!formatted.contains("📤 Output:"));
}

#[test]
fn test_preview_json_omits_trace_unless_requested() {
    let result = sample_preview();

    let plain = OutputFormat::Json
        .format_preview_result(&result, &PreviewDisplay::default())
        .unwrap();
    let value: Value = serde_json::from_str(&plain).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["transformationCount"], 2);
    assert_eq!(value["data"]["name"], "ANA");
    assert!(value.get("steps").is_none());
    assert!(value.get("metadata").is_none());
    assert!(value.get("error").is_none());

    let display = PreviewDisplay {
        show_trace: true,
        metadata: Some(sample_metadata()),
    };
    let traced = OutputFormat::Json.format_preview_result(&result, &display).unwrap();
    let value: Value = serde_json::from_str(&traced).unwrap();
    assert_eq!(value["steps"].as_array().unwrap().len(), 2);
    assert_eq!(value["steps"][1]["output"]["name"], "ANA");
    assert_eq!(value["metadata"]["requestId"], "req_0123");
}

#[test]
fn test_validation_report_formatting_human() {
    let report = validate_transformations_json(&json!([
        {"type": "map"},
        {"type": "sort", "field": "name"}
    ]));

    let formatted = format_validation_report_human(&report).unwrap();
    assert!(formatted.contains("❌ Validation Failed - 2 Error(s)"));
    assert!(formatted.contains("step 1 (field)"));
    assert!(formatted.contains("step 1 (outputField)"));
    assert!(formatted.contains("⚠️ step 2"));
}

#[test]
fn test_validation_report_for_non_array() {
    let report = validate_transformations_json(&json!({"type": "map"}));
    let formatted = format_validation_report_human(&report).unwrap();
    assert!(formatted.contains("pipeline: Transformations must be an array"));
}

#[test]
fn test_valid_report_formatting_human() {
    let report = validate_transformations_json(&json!([
        {"type": "format", "field": "name", "operation": "trim"}
    ]));
    let formatted = format_validation_report_human(&report).unwrap();
    assert_eq!(formatted, "✅ Pipeline is valid (1 transformation(s))\n");
}

#[test]
fn test_schema_formatting_human() {
    let schema = infer_schema(
        &json!({"id": "42", "tags": ["a"], "owner": {"name": "ana"}}),
        &[],
    );

    let formatted = format_schema_human(&schema);
    assert!(formatted.starts_with("📐 object (3 properties) (confidence 0.70)"));
    assert!(formatted.contains("  • id: string [required]  e.g. \"42\""));
    assert!(formatted.contains("  • tags: array of string [required]"));
    assert!(formatted.contains("    • name: string [required]"));
}

#[test]
fn test_compatibility_report_formatting_human() {
    let source = infer_schema(&json!({"id": "42"}), &[]);
    let target = infer_schema(&json!({"id": "7", "email": "a@b.c"}), &[]);
    let report = analyze_compatibility(&source, &target);

    let formatted = format_compatibility_report_human(&report);
    assert!(formatted.contains("═══ Compatibility Report ═══"));
    assert!(formatted.contains("✅ Compatible (score"));
    assert!(formatted.contains("🔍 Issues (1):"));
    assert!(formatted.contains("missing-field: Missing required field 'email'"));
    assert!(!formatted.contains("Suggestions"));
}

#[test]
fn test_compatibility_suggestions_formatting_human() {
    let source = infer_schema(&json!("42"), &[]);
    let target = infer_schema(&json!(42), &[]);
    let report = analyze_compatibility(&source, &target);

    let formatted = format_compatibility_report_human(&report);
    assert!(formatted.contains("🛠️  Suggestions (1):"));
    assert!(formatted.contains("type-conversion-string-number"));
    assert!(formatted.contains("step: format(operation=parse_number)"));
}

#[test]
fn test_machine_formats_serialize_reports() {
    let source = infer_schema(&json!({"id": 1}), &[]);
    let report = analyze_compatibility(&source, &source);

    let yaml = OutputFormat::Yaml.format_compatibility_report(&report).unwrap();
    assert!(yaml.contains("compatible: true"));
    assert!(yaml.contains("autoFixable: false"));

    let json = OutputFormat::Json.format_schema(&source).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "object");
    assert_eq!(value["properties"]["id"]["required"], true);
}

#[test]
fn test_format_value_compact() {
    assert_eq!(format_value_compact(&json!("test")), "\"test\"");
    assert_eq!(format_value_compact(&json!(42)), "42");
    assert_eq!(format_value_compact(&json!(null)), "null");
    assert_eq!(format_value_compact(&json!([1, 2, 3])), "[1, 2, 3]");
    assert_eq!(format_value_compact(&json!([1, 2, 3, 4])), "[4 items]");
    assert_eq!(format_value_compact(&json!({"a": 1})), "{a: 1}");
    assert_eq!(format_value_compact(&json!({"a": 1, "b": 2, "c": 3})), "{3 fields}");
}

#[test]
fn test_writer_messages_respect_quiet_and_format() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.warning("careful").unwrap();
    output.section("Result").unwrap();
    assert_eq!(
        buffer.contents(),
        "INFO: loading\ndone\nWARNING: careful\n\n=== Result ===\n"
    );

    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");

    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.info("loading").unwrap();
    output.error("broken").unwrap();
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_writer_data_ends_with_single_newline() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.data(&json!({"a": 1})).unwrap();
    assert_eq!(buffer.contents(), "{\"a\":1}\n");

    let (mut output, buffer) = writer(OutputFormat::Yaml, false);
    output.data(&json!({"a": 1})).unwrap();
    assert_eq!(buffer.contents(), "a: 1\n");
}

#[test]
fn test_table_alignment() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output
        .table(
            &["Key", "Value"],
            vec![vec!["format".to_string(), "human".to_string()]],
        )
        .unwrap();

    let lines: Vec<String> = buffer.contents().lines().map(str::to_string).collect();
    assert_eq!(lines[0], "Key    │ Value");
    assert_eq!(lines[2], "format │ human");
}

#[test]
fn test_no_progress_with_custom_writer() {
    let (output, _) = writer(OutputFormat::Human, false);
    assert!(output.spinner("working").is_none());
    assert!(output.progress_bar(10, "working").is_none());
}
