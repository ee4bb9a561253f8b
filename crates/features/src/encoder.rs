//! One-hot feature encoding for valuation requests.
//!
//! Turns a validated [`RawRequest`] into a row aligned to the model's
//! [`FeatureSchema`]. Categorical values are looked up as `{field}_{value}`
//! columns; a value the model never saw during training has no column and
//! simply leaves that field all-zero.

use std::sync::Arc;

use artifacts::FeatureSchema;
use rayon::prelude::*;
use tracing::debug;

/// Brands that set the luxury flag
pub const LUXURY_BRANDS: [&str; 3] = ["mercedes-benz", "bmw", "audi"];

/// Derived column set when the model is a luxury brand
pub const LUXURY_FLAG: &str = "is_luxury";

/// A validated valuation request.
///
/// Numeric fields are already parsed; categorical fields are free text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    pub year: i64,
    pub motor_volume: f64,
    pub running_km: f64,
    pub model: String,
    pub motor_type: String,
    pub wheel: String,
    pub color: String,
    pub car_type: String,
    pub status: String,
}

impl RawRequest {
    /// Categorical fields paired with their column prefix, in form order
    pub fn categorical(&self) -> [(&'static str, &str); 6] {
        [
            ("model", self.model.as_str()),
            ("motor_type", self.motor_type.as_str()),
            ("wheel", self.wheel.as_str()),
            ("color", self.color.as_str()),
            ("type", self.car_type.as_str()),
            ("status", self.status.as_str()),
        ]
    }

    /// Numeric fields paired with their column names
    pub fn numeric(&self) -> [(&'static str, f64); 3] {
        [
            ("year", self.year as f64),
            ("motor_volume", self.motor_volume),
            ("running_km", self.running_km),
        ]
    }

    pub fn is_luxury(&self) -> bool {
        let model = self.model.to_lowercase();
        LUXURY_BRANDS.contains(&model.as_str())
    }
}

/// A single encoded row
#[derive(Debug, Clone)]
pub struct EncodedVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl EncodedVector {
    /// All-zero row over `schema`
    pub fn zeros(schema: Arc<FeatureSchema>) -> Self {
        let values = vec![0.0; schema.len()];
        Self { schema, values }
    }

    /// Set a column by name. Returns false if the schema has no such column.
    pub fn set(&mut self, column: &str, value: f64) -> bool {
        match self.schema.index_of(column) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.index_of(column).map(|idx| self.values[idx])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Non-zero columns in schema order
    pub fn non_zero(&self) -> Vec<(&str, f64)> {
        self.schema
            .columns()
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| **value != 0.0)
            .map(|(column, value)| (column.as_str(), *value))
            .collect()
    }
}

/// Encodes requests against a fixed schema.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<FeatureSchema>,
}

impl FeatureEncoder {
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Encode one request.
    ///
    /// ## Algorithm
    /// 1. Start from a zero row over the schema
    /// 2. Copy the numeric fields into their columns
    /// 3. Set `{field}_{value}` to 1 for each categorical field, if present
    /// 4. Set the luxury flag, if the schema has it
    pub fn encode(&self, raw: &RawRequest) -> EncodedVector {
        let mut vector = EncodedVector::zeros(Arc::clone(&self.schema));

        for (column, value) in raw.numeric() {
            vector.set(column, value);
        }

        for (field, value) in raw.categorical() {
            let column = format!("{}_{}", field, value.to_lowercase());
            if !vector.set(&column, 1.0) {
                debug!(field, column = %column, "category not in schema, leaving field unset");
            }
        }

        if raw.is_luxury() {
            vector.set(LUXURY_FLAG, 1.0);
        }

        vector
    }

    /// Encode many requests in parallel, preserving input order.
    pub fn encode_batch(&self, requests: &[RawRequest]) -> Vec<EncodedVector> {
        requests.par_iter().map(|raw| self.encode(raw)).collect()
    }
}
