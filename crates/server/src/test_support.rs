//! Stub collaborators shared by the server's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use artifacts::FeatureSchema;
use features::{EncodedVector, Predictor};
use image_search::ImageSearch;

use crate::form::FormFields;

pub fn test_schema() -> Arc<FeatureSchema> {
    Arc::new(
        FeatureSchema::new([
            "year",
            "motor_volume",
            "running_km",
            "model_bmw",
            "model_toyota",
            "motor_type_petrol",
            "wheel_left",
            "color_black",
            "type_sedan",
            "status_used",
            "is_luxury",
        ])
        .expect("valid test schema"),
    )
}

/// The example request from the product brief
pub fn sample_form() -> FormFields {
    [
        ("year", "2020"),
        ("motor_volume", "2.0"),
        ("running_km", "50000"),
        ("model", "bmw"),
        ("motor_type", "petrol"),
        ("wheel", "left"),
        ("color", "black"),
        ("type", "sedan"),
        ("status", "used"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn with_field(mut fields: FormFields, name: &str, value: &str) -> FormFields {
    for (key, existing) in fields.iter_mut() {
        if key == name {
            *existing = value.to_string();
        }
    }
    fields
}

/// Predictor returning a fixed price and recording what it was given
pub struct StubPredictor {
    schema: Arc<FeatureSchema>,
    price: Option<f64>,
    calls: AtomicUsize,
    last_row: Mutex<Option<EncodedVector>>,
}

impl StubPredictor {
    pub fn returning(price: f64) -> Arc<Self> {
        Arc::new(Self {
            schema: test_schema(),
            price: Some(price),
            calls: AtomicUsize::new(0),
            last_row: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            schema: test_schema(),
            price: None,
            calls: AtomicUsize::new(0),
            last_row: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_row(&self) -> Option<EncodedVector> {
        self.last_row.lock().expect("last_row lock").clone()
    }
}

impl Predictor for StubPredictor {
    fn name(&self) -> &str {
        "stub"
    }

    fn schema(&self) -> Arc<FeatureSchema> {
        Arc::clone(&self.schema)
    }

    fn predict(&self, vector: &EncodedVector) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_row.lock().expect("last_row lock") = Some(vector.clone());
        self.price.ok_or_else(|| anyhow!("stub predictor failure"))
    }
}

/// Image search returning canned URLs and recording queries.
///
/// The default returns nothing, which is also what a failed search looks
/// like to the caller.
#[derive(Clone, Default)]
pub struct StubSearch {
    urls: Vec<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StubSearch {
    pub fn returning(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            queries: Arc::default(),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

impl ImageSearch for StubSearch {
    async fn search(&self, query: &str) -> Vec<String> {
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.to_string());
        self.urls.clone()
    }
}
