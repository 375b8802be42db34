//! Preview command handler

use super::utils::{load_pipeline_document, parse_pipeline, save_value};
use crate::cli::PreviewArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{current_request_id, generate_request_id, timing::Timer};
use crate::output::{OutputWriter, PreviewDisplay, RunMetadata};
use reshape_schemas::load_document;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Handle the preview command
#[instrument(skip_all, fields(data = %args.data.display(), pipeline = %args.pipeline.display()))]
pub fn handle_preview(args: PreviewArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!(
        "Previewing {} through {}",
        args.data.display(),
        args.pipeline.display()
    ))?;

    let data = {
        let _load_timer = Timer::new("data_loading");
        load_document(&args.data)?
    };

    let pipeline = {
        let _load_timer = Timer::new("pipeline_loading");
        let document = load_pipeline_document(&args.pipeline)?;
        parse_pipeline(&args.pipeline, document, &config.limits)?
    };
    debug!(
        steps = pipeline.step_count(),
        depth = pipeline.max_depth(),
        "Pipeline loaded"
    );

    if output.is_verbose() {
        output.info(&format!(
            "{} step(s), nesting depth {}",
            pipeline.step_count(),
            pipeline.max_depth()
        ))?;
    }

    let progress = output.spinner("Running transformations...");
    let started = Instant::now();
    let result = {
        let _preview_timer =
            Timer::with_details("preview", &format!("{} steps", pipeline.step_count()));
        pipeline.preview(&data)
    };
    let duration = started.elapsed();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        success = result.success,
        steps = result.transformation_count,
        duration_ms = duration.as_millis() as u64,
        "Preview finished"
    );

    let metadata = args.show_metadata.then(|| RunMetadata {
        request_id: current_request_id()
            .map(str::to_string)
            .unwrap_or_else(generate_request_id),
        timestamp: chrono::Utc::now().to_rfc3339(),
        duration_ms: duration.as_millis() as u64,
        data_file: args.data.display().to_string(),
        pipeline_file: args.pipeline.display().to_string(),
        step_count: pipeline.step_count(),
    });

    let display = PreviewDisplay {
        show_trace: args.show_trace,
        metadata,
    };
    output.preview_result(&result, &display)?;

    if !result.success {
        let message = result
            .error
            .unwrap_or_else(|| "transformation failed".to_string());
        return Err(Error::PreviewFailed(message));
    }

    if let Some(path) = args.save_to {
        save_value(&path, &result.data)?;
        output.success(&format!("✓ Output saved to {}", path.display()))?;
    }

    Ok(())
}
