//! # Mindgauge
#![allow(non_snake_case)]
//!
//! DASS-21 based mental well-being assessment tool.
//!
//! This crate provides:
//! - Questionnaire-driven score prediction using pre-trained model artifacts
//! - Severity classification and guidance text for stress, anxiety and depression
//! - Terminal UI for local-only, single-user use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (Dimension, SeverityBand, Assessment)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (exported model artifacts, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, Dimension, SeverityBand};

/// Result type for Mindgauge operations
pub type Result<T> = std::result::Result<T, MindgaugeError>;

/// Main error type for Mindgauge
#[derive(Debug, thiserror::Error)]
pub enum MindgaugeError {
    #[error("Model operation failed: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid questionnaire input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
