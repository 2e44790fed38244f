//! Assessment service: Orchestrates one questionnaire submission.
//!
//! This service coordinates:
//! - Answer validation (input-collection concern)
//! - Score prediction via the model backend
//! - Proneness prediction for dimensions that have a classifier
//! - Severity classification and guidance selection

use std::sync::Arc;

use crate::domain::{Assessment, AssessmentData};
use crate::ports::PredictorEngine;
use crate::MindgaugeError;

/// Service for running one assessment per submitted questionnaire.
///
/// Stateless and synchronous: one submission triggers exactly one score
/// prediction and, where applicable, one proneness prediction. No state is
/// shared between invocations.
pub struct AssessmentService<P>
where
    P: PredictorEngine,
{
    engine: Arc<P>,
}

impl<P> AssessmentService<P>
where
    P: PredictorEngine,
{
    /// Create a new assessment service.
    pub fn new(engine: Arc<P>) -> Self {
        Self { engine }
    }

    /// Run the full assessment pipeline for one submission.
    ///
    /// # Errors
    /// Returns error if the answers are out of scale or a predictor fails.
    pub fn run_assessment(&self, data: &AssessmentData) -> Result<Assessment, MindgaugeError> {
        if let Err(errors) = data.answers.validate() {
            return Err(MindgaugeError::Validation(errors.join(", ")));
        }

        let score = self.engine.predict_score(data.dimension, &data.answers)?;

        let assessment = if data.dimension.has_prone_classifier() {
            let prone = self.engine.predict_proneness(data.dimension, score)?;
            Assessment::with_proneness(data.dimension, score, prone)
        } else {
            Assessment::stress(score)
        };

        tracing::info!(
            "Assessment complete: dimension={}, score={:.2}, severity={}",
            assessment.dimension,
            assessment.score,
            assessment.severity
        );

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnswerSet, Dimension, Guidance, SeverityBand};
    use crate::ports::ModelError;

    /// Stub engine: score is twice the answer sum, proneness flips at 12.
    struct StubEngine;

    impl PredictorEngine for StubEngine {
        fn predict_score(
            &self,
            _dimension: Dimension,
            answers: &AnswerSet,
        ) -> Result<f64, ModelError> {
            Ok(answers.to_vec().iter().sum::<f64>() * 2.0)
        }

        fn predict_proneness(&self, dimension: Dimension, score: f64) -> Result<bool, ModelError> {
            if !dimension.has_prone_classifier() {
                return Err(ModelError::NoProneClassifier(dimension));
            }
            Ok(score >= 12.0)
        }
    }

    fn create_test_service() -> AssessmentService<StubEngine> {
        AssessmentService::new(Arc::new(StubEngine))
    }

    #[test]
    fn test_stress_assessment_gets_recommendation() {
        let service = create_test_service();
        let data = AssessmentData::new(Dimension::Stress, AnswerSet::new([1, 1, 1, 1, 1, 1, 1]));

        let assessment = service.run_assessment(&data).expect("Should run");
        assert!((assessment.score - 14.0).abs() < f64::EPSILON);
        assert_eq!(assessment.severity, SeverityBand::Normal);
        assert!(matches!(assessment.guidance, Guidance::Recommendation { .. }));
    }

    #[test]
    fn test_anxiety_assessment_gets_proneness() {
        let service = create_test_service();
        let data = AssessmentData::new(Dimension::Anxiety, AnswerSet::new([3, 3, 3, 0, 0, 0, 0]));

        let assessment = service.run_assessment(&data).expect("Should run");
        assert!((assessment.score - 18.0).abs() < f64::EPSILON);
        assert_eq!(assessment.severity, SeverityBand::Severe);
        assert!(assessment.guidance.is_prone());
    }

    #[test]
    fn test_out_of_scale_answers_rejected() {
        let service = create_test_service();
        let data = AssessmentData::new(Dimension::Depression, AnswerSet::new([7, 0, 0, 0, 0, 0, 0]));

        let err = service.run_assessment(&data).expect_err("Must reject");
        assert!(matches!(err, MindgaugeError::Validation(_)));
    }

    #[test]
    fn test_identical_input_identical_result() {
        let service = create_test_service();
        let data = AssessmentData::new(Dimension::Depression, AnswerSet::new([2, 2, 2, 2, 2, 2, 2]));

        let a = service.run_assessment(&data).expect("Should run");
        let b = service.run_assessment(&data).expect("Should run");
        assert_eq!(a.score, b.score);
        assert_eq!(a.severity, b.severity);
        assert_eq!(a.guidance, b.guidance);
    }
}
