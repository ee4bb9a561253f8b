//! Core traits for scoring encoded requests.
//!
//! The service never talks to a concrete model; it is handed a
//! [`Predictor`] at construction, which keeps it testable without real
//! artifact files.

use std::sync::Arc;

use anyhow::{Context, Result};
use artifacts::{FeatureSchema, ScoringArtifacts};

use crate::encoder::EncodedVector;

/// Core trait for anything that can price an encoded request.
///
/// ## Design Note
/// - `Send + Sync` so one predictor can be shared across server workers
/// - `schema` is the column layout `predict` expects its input in
pub trait Predictor: Send + Sync {
    /// Returns the name of this predictor (for logging/debugging)
    fn name(&self) -> &str;

    /// The ordered column set this predictor was trained on
    fn schema(&self) -> Arc<FeatureSchema>;

    /// Produce a point estimate for one row.
    fn predict(&self, vector: &EncodedVector) -> Result<f64>;
}

impl Predictor for ScoringArtifacts {
    fn name(&self) -> &str {
        "artifact-model"
    }

    fn schema(&self) -> Arc<FeatureSchema> {
        self.shared_schema()
    }

    fn predict(&self, vector: &EncodedVector) -> Result<f64> {
        self.model()
            .predict(vector.values())
            .context("Model failed to score request")
    }
}
