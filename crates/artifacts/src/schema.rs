//! The ordered feature schema the model was trained against.

use std::collections::HashMap;

use crate::error::{ArtifactError, Result};

/// Ordered set of named numeric columns.
///
/// Column positions are fixed at load time; every encoded vector is laid out
/// in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from column names in training order.
    ///
    /// Fails if the list is empty, or contains an empty or duplicate name.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ArtifactError::InvalidSchema("schema has no columns".into()));
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column.is_empty() {
                return Err(ArtifactError::InvalidSchema(format!(
                    "column {} has an empty name",
                    idx
                )));
            }
            if positions.insert(column.clone(), idx).is_some() {
                return Err(ArtifactError::InvalidSchema(format!(
                    "duplicate column: {}",
                    column
                )));
            }
        }

        Ok(Self { columns, positions })
    }

    /// Position of a column, if the schema has it
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
