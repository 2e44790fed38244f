//! Predictor port: Trait for pre-trained model inference.
//!
//! This trait abstracts the model artifact backend from the application
//! logic. The models are opaque, trained offline; at runtime they only map
//! answer vectors to scores and scores to proneness flags.

use crate::domain::{AnswerSet, Dimension};

/// Errors that can occur during model operations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not loaded: {0}")]
    NotLoaded(String),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Signature verification failed: {0}")]
    Signature(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("No proneness classifier for dimension {0}")]
    NoProneClassifier(Dimension),
}

/// Trait for score and proneness prediction.
///
/// Implementations load the five exported predictor artifacts (one score
/// regressor per dimension, plus proneness classifiers for anxiety and
/// depression) and evaluate them on already-collected answers.
pub trait PredictorEngine: Send + Sync {
    /// Predict the dimension score from questionnaire answers.
    ///
    /// # Errors
    /// Returns `ModelError::NotLoaded` if the dimension's regressor is not
    /// available, or `ModelError::Prediction` on a feature mismatch.
    fn predict_score(&self, dimension: Dimension, answers: &AnswerSet) -> Result<f64, ModelError>;

    /// Predict whether the subject is prone to the condition, given the
    /// predicted score.
    ///
    /// Only defined for dimensions with a prone classifier (anxiety and
    /// depression).
    ///
    /// # Errors
    /// Returns `ModelError::NoProneClassifier` for stress, or
    /// `ModelError::NotLoaded` if the classifier artifact is missing.
    fn predict_proneness(&self, dimension: Dimension, score: f64) -> Result<bool, ModelError>;
}
