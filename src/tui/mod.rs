//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a calm, wellness-themed interface for:
//! - Dashboard with model status and session summary
//! - Questionnaire entry for the three DASS-21 dimensions
//! - Assessment results with severity and guidance

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::WellnessTheme;
