//! Compat command handler

use crate::cli::CompatArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::output::OutputWriter;
use reshape_schemas::{analyze_compatibility, load_schema};
use tracing::{info, instrument};

/// Handle the compat command
#[instrument(skip_all, fields(source = %args.source.display(), target = %args.target.display()))]
pub fn handle_compat(args: CompatArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!(
        "Comparing {} against {}",
        args.source.display(),
        args.target.display()
    ))?;

    let source = load_schema(&args.source)
        .with_context(|| format!("Loading source schema {}", args.source.display()))?;
    let target = load_schema(&args.target)
        .with_context(|| format!("Loading target schema {}", args.target.display()))?;

    let report = analyze_compatibility(&source, &target);
    info!(
        compatible = report.compatible,
        score = report.score,
        issues = report.issues.len(),
        "Compatibility analyzed"
    );

    output.compatibility_report(&report)?;

    if !report.compatible {
        return Err(Error::Incompatible {
            score: report.score,
        });
    }

    Ok(())
}
