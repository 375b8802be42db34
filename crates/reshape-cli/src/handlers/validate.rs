//! Validate command handler

use super::utils::{check_depth, load_pipeline_document};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use reshape_core::{StepValidator, TransformationPipeline, ValidationMode};
use tracing::{debug, info, instrument};

/// Handle the validate command
#[instrument(skip_all, fields(pipeline = %args.pipeline.display(), strict = args.strict))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Validating pipeline: {}", args.pipeline.display()))?;

    let document = load_pipeline_document(&args.pipeline)?;

    // Steps that do not parse are reported per position by the validator;
    // the depth limit only applies once the whole list parses.
    match serde_json::from_value::<TransformationPipeline>(document.clone()) {
        Ok(pipeline) => check_depth(&pipeline, &config.limits)?,
        Err(e) => debug!(error = %e, "Pipeline does not parse, skipping depth check"),
    }

    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Lenient
    };

    let report = {
        let _timer = Timer::new("validation");
        StepValidator::with_mode(mode).validate_json(&document)
    };

    info!(
        valid = report.valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Validation finished"
    );

    output.validation_report(&report)?;

    if !report.valid {
        return Err(Error::ValidationFailed {
            errors: report.errors.len(),
        });
    }

    Ok(())
}
