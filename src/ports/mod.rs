//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the pre-trained model backend.

mod predictor;

pub use predictor::{ModelError, PredictorEngine};
