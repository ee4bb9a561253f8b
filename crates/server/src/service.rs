//! # Estimate Service
//!
//! This module coordinates a single valuation:
//! 1. Validate the submitted form
//! 2. Encode the request against the model's schema
//! 3. Score the encoded row
//! 4. Format the price
//! 5. Look up a few photos (best-effort)
//!
//! A rejected form stops at step 1; nothing is scored and no image search
//! is made.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use artifacts::ScoringArtifacts;
use features::{FeatureEncoder, Predictor, RawRequest};
use image_search::ImageSearch;
use tracing::{debug, info};

use crate::form::{self, FormFields};

/// Outcome of one form submission
#[derive(Debug, Clone, PartialEq)]
pub enum Valuation {
    /// The form didn't validate; nothing was scored
    Rejected {
        message: String,
        echoed_input: FormFields,
    },
    Estimated {
        price: f64,
        estimate_text: String,
        echoed_input: FormFields,
        image_urls: Vec<String>,
    },
}

impl Valuation {
    pub fn echoed_input(&self) -> &FormFields {
        match self {
            Valuation::Rejected { echoed_input, .. } => echoed_input,
            Valuation::Estimated { echoed_input, .. } => echoed_input,
        }
    }
}

/// Main service that turns form submissions into valuations
pub struct EstimateService<S> {
    predictor: Arc<dyn Predictor>,
    encoder: FeatureEncoder,
    image_search: S,
}

impl<S: ImageSearch> EstimateService<S> {
    /// Create a service around an already-loaded predictor
    pub fn new(predictor: Arc<dyn Predictor>, image_search: S) -> Self {
        let encoder = FeatureEncoder::new(predictor.schema());
        Self {
            predictor,
            encoder,
            image_search,
        }
    }

    pub fn from_artifacts(artifacts: ScoringArtifacts, image_search: S) -> Self {
        Self::new(Arc::new(artifacts), image_search)
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Main entry point: handle one submitted form.
    ///
    /// # Returns
    /// `Rejected` for invalid input, `Estimated` otherwise. An `Err` means
    /// the predictor itself failed.
    pub async fn handle(&self, fields: &[(String, String)]) -> Result<Valuation> {
        let start_time = Instant::now();

        let raw = match form::parse_form(fields) {
            Ok(raw) => raw,
            Err(err) => {
                info!(reason = ?err, "rejected valuation form");
                return Ok(Valuation::Rejected {
                    message: err.message(),
                    echoed_input: fields.to_vec(),
                });
            }
        };

        let price = self.estimate(&raw)?;
        let estimate_text = format_estimate(price);

        let query = image_query(&raw);
        let image_urls = self.image_search.search(&query).await;

        info!(
            year = raw.year,
            model = %raw.model,
            price,
            images = image_urls.len(),
            "valuation completed in {:.2?}",
            start_time.elapsed()
        );

        Ok(Valuation::Estimated {
            price,
            estimate_text,
            echoed_input: form::echo(&raw),
            image_urls,
        })
    }

    /// Encode and score a validated request
    pub fn estimate(&self, raw: &RawRequest) -> Result<f64> {
        let vector = self.encoder.encode(raw);
        debug!(non_zero = ?vector.non_zero(), "encoded request");
        self.predictor
            .predict(&vector)
            .with_context(|| format!("Predictor {} failed", self.predictor.name()))
    }

    /// Encode a batch in parallel, then score each row
    pub fn estimate_batch(&self, requests: &[RawRequest]) -> Vec<Result<f64>> {
        self.encoder
            .encode_batch(requests)
            .iter()
            .map(|vector| {
                self.predictor
                    .predict(vector)
                    .with_context(|| format!("Predictor {} failed", self.predictor.name()))
            })
            .collect()
    }
}

/// Price text shown to the user, e.g. `Predicted Car Price: $15,000.00`
pub fn format_estimate(price: f64) -> String {
    format!("Predicted Car Price: ${}", format_amount(price))
}

/// Two decimals with thousands separators; a negative sign stays in front
/// of the digits.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", sign, grouped, fraction)
}

/// Photo search query for a request
pub fn image_query(raw: &RawRequest) -> String {
    format!(
        "{} {} {} {} car exterior",
        raw.year, raw.model, raw.car_type, raw.color
    )
}
