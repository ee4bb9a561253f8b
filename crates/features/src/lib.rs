//! Feature encoding and scoring for car valuation requests.
//!
//! This crate provides:
//! - FeatureEncoder for turning a request into a schema-aligned row
//! - Predictor trait for the model that prices a row
//!
//! ## Architecture
//! 1. The service validates form input into a `RawRequest`
//! 2. FeatureEncoder one-hot encodes it against the model's schema
//! 3. A Predictor turns the row into a price
//!
//! ## Example Usage
//! ```ignore
//! use features::{FeatureEncoder, Predictor};
//!
//! let encoder = FeatureEncoder::new(predictor.schema());
//! let vector = encoder.encode(&raw);
//! let price = predictor.predict(&vector)?;
//! ```

pub mod encoder;
pub mod traits;

// Re-export main types
pub use encoder::{EncodedVector, FeatureEncoder, RawRequest, LUXURY_BRANDS, LUXURY_FLAG};
pub use traits::Predictor;
