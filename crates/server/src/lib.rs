//! Server crate for the car valuation service.
//!
//! This crate contains the estimate service that coordinates validation,
//! encoding, scoring and photo lookup, plus the actix-web routes that put
//! it on the web.

pub mod config;
pub mod form;
pub mod render;
pub mod routes;
pub mod service;

#[cfg(test)]
mod test_support;

pub use config::ServerConfig;
pub use form::{parse_form, FormError, FormFields, INVALID_NUMERIC_MESSAGE};
pub use routes::{configure, serve};
pub use service::{format_estimate, image_query, EstimateService, Valuation};
