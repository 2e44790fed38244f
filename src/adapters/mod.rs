//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external formats:
//! - `model`: JSON predictor artifacts exported by the training pipeline
//! - `sanitize`: PII filtering for logs

pub mod model;
pub mod sanitize;
