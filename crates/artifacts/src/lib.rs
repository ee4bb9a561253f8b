//! # Artifacts Crate
//!
//! Loads the two startup artifacts produced by offline training:
//!
//! - **schema**: the ordered column list the model was fit on
//! - **model**: the regression model, exported as JSON
//!
//! Both are loaded once and are read-only for the lifetime of the process.
//!
//! ## Example Usage
//!
//! ```ignore
//! use artifacts::ScoringArtifacts;
//! use std::path::Path;
//!
//! let artifacts = ScoringArtifacts::load(
//!     Path::new("artifacts/columns.json"),
//!     Path::new("artifacts/model.json"),
//! )?;
//!
//! println!("{} columns", artifacts.schema().len());
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod schema;

pub use error::{ArtifactError, Result};
pub use loader::{load_model, load_schema, ScoringArtifacts};
pub use model::{Aggregation, Model, ModelArtifact, NodeSpec, TreeSpec};
pub use schema::FeatureSchema;
