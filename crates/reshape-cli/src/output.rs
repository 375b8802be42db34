//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) for preview results,
//! validation reports, inferred schemas and compatibility reports, plus
//! progress indicators for interactive terminals.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reshape_core::{PreviewResult, Severity, StepTrace, ValidationIssue, ValidationReport};
use reshape_schemas::{CompatibilityReport, SchemaNode};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Details about a preview run, shown with `--show-metadata`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub request_id: String,
    pub timestamp: String,
    pub duration_ms: u64,
    pub data_file: String,
    pub pipeline_file: String,
    pub step_count: usize,
}

/// What a preview rendering includes besides the result
#[derive(Debug, Clone, Default)]
pub struct PreviewDisplay {
    pub show_trace: bool,
    pub metadata: Option<RunMetadata>,
}

/// Machine-readable shape of a preview; the trace only appears on request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewView<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    data: &'a Value,
    transformation_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [StepTrace]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a RunMetadata>,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a preview run
    fn format_preview_result(
        &self,
        result: &PreviewResult,
        display: &PreviewDisplay,
    ) -> Result<String>;

    /// Format a pipeline validation report
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String>;

    /// Format an inferred schema
    fn format_schema(&self, schema: &SchemaNode) -> Result<String>;

    /// Format a compatibility report
    fn format_compatibility_report(&self, report: &CompatibilityReport) -> Result<String>;
}

impl OutputFormat {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        // Human format falls back to pretty JSON
        self.serialize(value)
    }

    fn format_preview_result(
        &self,
        result: &PreviewResult,
        display: &PreviewDisplay,
    ) -> Result<String> {
        match self {
            OutputFormat::Human => format_preview_result_human(result, display),
            _ => self.serialize(&PreviewView {
                success: result.success,
                error: result.error.as_deref(),
                data: &result.data,
                transformation_count: result.transformation_count,
                steps: display.show_trace.then_some(result.steps.as_slice()),
                metadata: display.metadata.as_ref(),
            }),
        }
    }

    fn format_validation_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => format_validation_report_human(report),
            _ => self.serialize(report),
        }
    }

    fn format_schema(&self, schema: &SchemaNode) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_schema_human(schema)),
            _ => self.serialize(schema),
        }
    }

    fn format_compatibility_report(&self, report: &CompatibilityReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_compatibility_report_human(report)),
            _ => self.serialize(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        progress: bool,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stdout().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let value_json = serde_json::to_value(value)?;
        trace!("Outputting data: {}", redaction::redacted(&value_json));

        let formatted = self.format.format(value)?;
        self.emit(&formatted)
    }

    /// Write a preview result
    pub fn preview_result(&mut self, result: &PreviewResult, display: &PreviewDisplay) -> Result<()> {
        trace!("Preview output: {}", redaction::redacted(&result.data));
        let formatted = self.format.format_preview_result(result, display)?;
        self.emit(&formatted)
    }

    /// Write a validation report
    pub fn validation_report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_validation_report(report)?;
        self.emit(&formatted)
    }

    /// Write an inferred schema
    pub fn schema(&mut self, schema: &SchemaNode) -> Result<()> {
        let formatted = self.format.format_schema(schema)?;
        self.emit(&formatted)
    }

    /// Write a compatibility report
    pub fn compatibility_report(&mut self, report: &CompatibilityReport) -> Result<()> {
        let formatted = self.format.format_compatibility_report(report)?;
        self.emit(&formatted)
    }

    // Machine formats end with exactly one newline
    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Check if verbose output should be shown
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(&row_str)?;
        }

        Ok(())
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "❌",
        Severity::Warning => "⚠️",
        Severity::Info => "ℹ️",
    }
}

/// Format a preview result for human reading
fn format_preview_result_human(result: &PreviewResult, display: &PreviewDisplay) -> Result<String> {
    let mut output = String::new();

    output.push_str("═══ Preview Result ═══\n\n");

    if let Some(metadata) = &display.metadata {
        output.push_str("🔧 Run Details:\n");
        output.push_str(&format!("  Request: {}\n", metadata.request_id));
        output.push_str(&format!("  Timestamp: {}\n", metadata.timestamp));
        output.push_str(&format!("  Data: {}\n", metadata.data_file));
        output.push_str(&format!("  Pipeline: {}\n", metadata.pipeline_file));
        output.push_str(&format!("  Steps: {}\n", metadata.step_count));
        output.push_str(&format!("  Duration: {}ms\n", metadata.duration_ms));
        output.push('\n');
    }

    match &result.error {
        Some(error) if !result.success => {
            output.push_str(&format!("❌ Preview failed: {}\n", error));
            return Ok(output);
        }
        _ => output.push_str(&format!(
            "✅ Applied {} transformation(s)\n\n",
            result.transformation_count
        )),
    }

    if display.show_trace {
        output.push_str("🔍 Step Trace:\n");
        for step in &result.steps {
            output.push_str(&format_step_trace_human(step));
        }
        output.push('\n');
    }

    output.push_str("📤 Output:\n");
    output.push_str(&serde_json::to_string_pretty(&result.data)?);
    output.push('\n');

    Ok(output)
}

fn format_step_trace_human(step: &StepTrace) -> String {
    format!(
        "  {}. {}\n     in:  {}\n     out: {}\n",
        step.step,
        step.transformation,
        format_value_compact(&step.input),
        format_value_compact(&step.output)
    )
}

/// Format a validation report for human reading
fn format_validation_report_human(report: &ValidationReport) -> Result<String> {
    let mut output = String::new();

    if report.valid {
        output.push_str(&format!(
            "✅ Pipeline is valid ({} transformation(s))\n",
            report.total_transformations
        ));
    } else {
        output.push_str(&format!(
            "❌ Validation Failed - {} Error(s)\n",
            report.errors.len()
        ));
    }

    if report.errors.is_empty() && report.warnings.is_empty() {
        return Ok(output);
    }

    output.push('\n');
    for issue in report.issues() {
        output.push_str(&format_validation_issue_human(issue));
    }

    Ok(output)
}

fn format_validation_issue_human(issue: &ValidationIssue) -> String {
    let location = match (issue.step, &issue.field) {
        (0, _) => "pipeline".to_string(),
        (step, Some(field)) => format!("step {} ({})", step, field),
        (step, None) => format!("step {}", step),
    };
    format!(
        "  {} {}: {}\n",
        severity_icon(issue.severity),
        location,
        issue.message
    )
}

/// Format an inferred schema as an indented tree
fn format_schema_human(schema: &SchemaNode) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "📐 {} (confidence {:.2})\n",
        schema, schema.confidence
    ));
    push_schema_children(&mut output, schema, 1);
    output
}

fn push_schema_children(output: &mut String, node: &SchemaNode, depth: usize) {
    let indent = "  ".repeat(depth);

    if let Some(properties) = &node.properties {
        for (name, property) in properties {
            let required = if property.required { " [required]" } else { "" };
            output.push_str(&format!(
                "{}• {}: {}{}",
                indent, name, property.schema, required
            ));
            if !property.schema.examples.is_empty() {
                let examples: Vec<String> = property
                    .schema
                    .examples
                    .iter()
                    .map(format_value_compact)
                    .collect();
                output.push_str(&format!("  e.g. {}", examples.join(", ")));
            }
            output.push('\n');
            push_schema_children(output, &property.schema, depth + 1);
        }
    }

    if let Some(items) = &node.items {
        if items.properties.is_some() {
            output.push_str(&format!("{}[items]\n", indent));
            push_schema_children(output, items, depth + 1);
        }
    }
}

/// Format a compatibility report for human reading
fn format_compatibility_report_human(report: &CompatibilityReport) -> String {
    let mut output = String::new();

    output.push_str("═══ Compatibility Report ═══\n\n");
    if report.compatible {
        output.push_str(&format!("✅ Compatible (score {:.2})\n", report.score));
    } else {
        output.push_str(&format!("❌ Not compatible (score {:.2})\n", report.score));
    }

    if !report.issues.is_empty() {
        output.push_str(&format!("\n🔍 Issues ({}):\n", report.issues.len()));
        for issue in &report.issues {
            output.push_str(&format!(
                "  {} {}: {}\n",
                severity_icon(issue.severity),
                issue.issue_type,
                issue.message
            ));
        }
    }

    if !report.suggestions.is_empty() {
        output.push_str(&format!("\n🛠️  Suggestions ({}):\n", report.suggestions.len()));
        for suggestion in &report.suggestions {
            output.push_str(&format!(
                "  • {} (confidence {:.2}): {}\n",
                suggestion.id, suggestion.confidence, suggestion.description
            ));
            output.push_str(&format!("    step: {}\n", suggestion.transformation));
        }
    }

    output
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter()
                        .map(format_value_compact)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
