//! Loading the schema and model artifacts from disk.
//!
//! Both files are JSON:
//! - schema: an array of column names in training order
//! - model: a [`ModelArtifact`] document

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{ArtifactError, Result};
use crate::model::{Model, ModelArtifact};
use crate::schema::FeatureSchema;

/// Read and deserialize a JSON file, keeping the path in every error
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ArtifactError::IoError(e),
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    serde_json::from_str(&contents).map_err(|source| ArtifactError::ParseError {
        path: path.display().to_string(),
        source,
    })
}

/// Load the ordered column list
pub fn load_schema(path: &Path) -> Result<FeatureSchema> {
    let columns: Vec<String> = read_json(path)?;
    let schema = FeatureSchema::new(columns)?;
    info!(path = %path.display(), columns = schema.len(), "loaded feature schema");
    Ok(schema)
}

/// Load a model artifact and bind it to `schema`
pub fn load_model(path: &Path, schema: &FeatureSchema) -> Result<Model> {
    let artifact: ModelArtifact = read_json(path)?;
    let kind = match &artifact {
        ModelArtifact::Linear { .. } => "linear",
        ModelArtifact::TreeEnsemble { .. } => "tree_ensemble",
    };
    let model = artifact.bind(schema)?;
    info!(path = %path.display(), kind, "loaded scoring model");
    Ok(model)
}

/// The read-only pair loaded once at startup.
///
/// Cheap to clone; both halves sit behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScoringArtifacts {
    schema: Arc<FeatureSchema>,
    model: Arc<Model>,
}

impl ScoringArtifacts {
    pub fn new(schema: FeatureSchema, model: Model) -> Result<Self> {
        if model.width() != schema.len() {
            return Err(ArtifactError::WidthMismatch {
                expected: schema.len(),
                found: model.width(),
            });
        }
        Ok(Self {
            schema: Arc::new(schema),
            model: Arc::new(model),
        })
    }

    /// Load both artifacts. Any failure here should stop the process.
    pub fn load(schema_path: &Path, model_path: &Path) -> Result<Self> {
        let schema = load_schema(schema_path)?;
        let model = load_model(model_path, &schema)?;
        Self::new(schema, model)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Shared handle to the schema, for encoders that outlive a borrow
    pub fn shared_schema(&self) -> Arc<FeatureSchema> {
        Arc::clone(&self.schema)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_artifacts() {
        let dir = TempDir::new().unwrap();
        let schema_path = write_file(&dir, "columns.json", r#"["year", "model_bmw"]"#);
        let model_path = write_file(
            &dir,
            "model.json",
            r#"{"kind": "linear", "intercept": 5.0, "coefficients": {"model_bmw": 10.0}}"#,
        );

        let artifacts = ScoringArtifacts::load(&schema_path, &model_path).unwrap();
        assert_eq!(artifacts.schema().columns(), &["year", "model_bmw"]);
        assert_eq!(artifacts.model().predict(&[2020.0, 1.0]).unwrap(), 15.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_schema(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ArtifactError::FileNotFound { .. })));
    }

    #[test]
    fn test_malformed_schema() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "columns.json", r#"{"year": 1}"#);

        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::ParseError { .. }));
        assert!(err.to_string().contains("columns.json"));
    }

    #[test]
    fn test_model_bound_to_schema() {
        let dir = TempDir::new().unwrap();
        let schema_path = write_file(&dir, "columns.json", r#"["year"]"#);
        let model_path = write_file(
            &dir,
            "model.json",
            r#"{"kind": "linear", "intercept": 0.0, "coefficients": {"running_km": 1.0}}"#,
        );

        let result = ScoringArtifacts::load(&schema_path, &model_path);
        assert!(matches!(result, Err(ArtifactError::UnknownColumn { .. })));
    }
}
