//! Infer command handler

use crate::cli::InferArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use reshape_schemas::{conforms, load_document, SchemaInferrer, SchemaType};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Handle the infer command
#[instrument(skip_all, fields(data = %args.data.display(), extra_samples = args.samples.len()))]
pub fn handle_infer(args: InferArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Inferring schema from {}", args.data.display()))?;

    let primary = load_document(&args.data)?;
    let (value, mut samples) = if args.each {
        match primary {
            Value::Array(items) => {
                let mut items = items.into_iter();
                let first = items.next().unwrap_or(Value::Null);
                (first, items.collect::<Vec<_>>())
            }
            other => {
                return Err(Error::InvalidFormat {
                    path: args.data.clone(),
                    reason: format!(
                        "--each needs a top-level array, found {}",
                        SchemaType::of(&other)
                    ),
                })
            }
        }
    } else {
        (primary, Vec::new())
    };

    let count = 1 + samples.len() + args.samples.len();
    if count > config.limits.max_samples {
        return Err(Error::TooManySamples {
            count,
            limit: config.limits.max_samples,
        });
    }

    let progress = output.progress_bar(args.samples.len() as u64, "Loading samples");
    for path in &args.samples {
        samples.push(load_document(path)?);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    debug!(samples = count, "Samples loaded");

    let schema = {
        let _timer = Timer::with_details("inference", &format!("{} samples", count));
        SchemaInferrer::new()
            .with_max_depth(config.limits.max_nesting_depth)
            .infer(&value, &samples)
    };

    info!(
        schema_type = %schema.schema_type,
        confidence = schema.confidence,
        "Schema inferred"
    );

    if !args.json_schema {
        return output.schema(&schema);
    }

    output.data(&schema.to_json_schema())?;

    // Properties are typed from their first observation, so later samples
    // can disagree with the exported document.
    for (index, sample) in std::iter::once(&value).chain(&samples).enumerate() {
        let violations = conforms(&schema, sample)?;
        for violation in violations {
            output.warning(&format!("Sample {} does not conform: {}", index + 1, violation))?;
        }
    }

    Ok(())
}
