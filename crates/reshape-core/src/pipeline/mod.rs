//! Pipeline runner
//!
//! A pipeline is an ordered list of steps applied left to right over one seed
//! value, the output of each step becoming the input of the next.
//!
//! [`TransformationPipeline::preview`] additionally records an input/output
//! snapshot per step. Its diagnostic contract is all-or-nothing: when any step
//! fails the trace is discarded and the result carries the seed value, never a
//! truncated trace.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::transform::{apply, TransformationStep};
use crate::validator::{StepValidator, ValidationReport};
use crate::{Error, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace};

/// Snapshot of one executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTrace {
    /// 1-based position of the step in the pipeline
    pub step: usize,
    pub transformation: TransformationStep,
    pub input: Value,
    pub output: Value,
    pub success: bool,
}

/// Outcome of a preview run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Final value, or the seed value when the run failed
    pub data: Value,
    pub original_data: Value,
    /// Per-step trace; empty when the run failed
    pub steps: Vec<StepTrace>,
    pub transformation_count: usize,
}

impl PreviewResult {
    /// A failed run: no trace, data reset to the seed
    pub fn failure(seed: &Value, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: seed.clone(),
            original_data: seed.clone(),
            steps: Vec::new(),
            transformation_count: 0,
        }
    }
}

/// An ordered list of transformation steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformationPipeline {
    steps: Vec<TransformationStep>,
}

impl TransformationPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline from a list of steps
    pub fn from_steps(steps: Vec<TransformationStep>) -> Self {
        Self { steps }
    }

    /// Parse a pipeline from raw JSON
    ///
    /// The document must be an array. A non-array is a
    /// [`Error::Validation`]; a step that does not deserialize is an
    /// [`Error::Internal`] naming its 1-based position.
    pub fn from_json(transformations: &Value) -> Result<Self> {
        let Value::Array(items) = transformations else {
            return Err(Error::Validation {
                field: "transformations".to_string(),
                message: "must be an array of transformation steps".to_string(),
                expected: Some("array".to_string()),
            });
        };

        let steps = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                TransformationStep::deserialize(item).with_context(|| {
                    format!("Invalid transformations: step {} could not be parsed", index + 1)
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self::from_steps(steps))
    }

    /// Append a step
    pub fn add_step(mut self, step: TransformationStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps
    pub fn add_steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = TransformationStep>,
    {
        self.steps.extend(steps);
        self
    }

    pub fn steps(&self) -> &[TransformationStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Deepest step nesting in the pipeline (0 when empty)
    pub fn max_depth(&self) -> usize {
        self.steps
            .iter()
            .map(TransformationStep::depth)
            .max()
            .unwrap_or(0)
    }

    /// Apply every step in order, stopping at the first error
    pub fn run(&self, seed: &Value) -> Result<Value> {
        self.steps
            .iter()
            .try_fold(seed.clone(), |current, step| apply(&current, step))
    }

    /// Apply every step in order and record a trace
    #[instrument(level = "debug", skip_all, fields(steps = self.steps.len()))]
    pub fn preview(&self, seed: &Value) -> PreviewResult {
        let mut current = seed.clone();
        let mut traces = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            match apply(&current, step) {
                Ok(output) => {
                    trace!(step = index + 1, transformation = %step, "Step applied");
                    traces.push(StepTrace {
                        step: index + 1,
                        transformation: step.clone(),
                        input: current,
                        output: output.clone(),
                        success: true,
                    });
                    current = output;
                }
                Err(e) => {
                    debug!(step = index + 1, error = %e, "Preview stopped");
                    return PreviewResult::failure(seed, e.to_string());
                }
            }
        }

        PreviewResult {
            success: true,
            error: None,
            data: current,
            original_data: seed.clone(),
            transformation_count: traces.len(),
            steps: traces,
        }
    }

    /// Check the structure of every step without running anything
    pub fn validate(&self) -> ValidationReport {
        StepValidator::new().validate(&self.steps)
    }
}

impl From<Vec<TransformationStep>> for TransformationPipeline {
    fn from(steps: Vec<TransformationStep>) -> Self {
        Self::from_steps(steps)
    }
}

impl FromIterator<TransformationStep> for TransformationPipeline {
    fn from_iter<I: IntoIterator<Item = TransformationStep>>(iter: I) -> Self {
        Self::from_steps(iter.into_iter().collect())
    }
}

/// Run a preview of `transformations` over `data`
pub fn preview_transformations(data: &Value, transformations: &[TransformationStep]) -> PreviewResult {
    TransformationPipeline::from_steps(transformations.to_vec()).preview(data)
}

/// Run a preview from raw JSON; a step list that cannot be parsed yields a
/// failed result
pub fn preview_transformations_json(data: &Value, transformations: &Value) -> PreviewResult {
    match TransformationPipeline::from_json(transformations) {
        Ok(pipeline) => pipeline.preview(data),
        Err(e) => {
            debug!(error = %e, "Rejected transformation list");
            PreviewResult::failure(data, e.to_string())
        }
    }
}
