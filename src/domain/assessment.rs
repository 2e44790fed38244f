//! Questionnaire input types for the three DASS-21 dimensions.
//!
//! Question texts follow the DASS-21 survey items the score predictors were
//! trained on (7 items per dimension, answered on a 0-3 scale).

use serde::{Deserialize, Serialize};

/// Number of questionnaire items per dimension.
pub const QUESTIONS_PER_DIMENSION: usize = 7;

/// Highest valid answer value (scale is 0..=3).
pub const ANSWER_MAX: u8 = 3;

/// Psychological dimension covered by an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Stress,
    Anxiety,
    Depression,
}

impl Dimension {
    /// All dimensions, in the order the original survey presents them.
    pub const ALL: [Dimension; 3] = [Dimension::Stress, Dimension::Anxiety, Dimension::Depression];

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Stress => "Stress",
            Self::Anxiety => "Anxiety",
            Self::Depression => "Depression",
        }
    }

    /// Whether a prone-to-condition classifier exists for this dimension.
    ///
    /// The source model pairing ships proneness classifiers for anxiety and
    /// depression only; stress instead has banded recommendation text. This
    /// asymmetry is intentional and must not be unified.
    #[must_use]
    pub fn has_prone_classifier(self) -> bool {
        !matches!(self, Self::Stress)
    }

    /// Questionnaire items for this dimension.
    #[must_use]
    pub fn questions(self) -> &'static [&'static str; QUESTIONS_PER_DIMENSION] {
        match self {
            Self::Stress => &STRESS_QUESTIONS,
            Self::Anxiety => &ANXIETY_QUESTIONS,
            Self::Depression => &DEPRESSION_QUESTIONS,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const STRESS_QUESTIONS: [&str; QUESTIONS_PER_DIMENSION] = [
    "I found it hard to wind down",
    "I tended to over-react to situations",
    "I felt that I was using a lot of nervous energy",
    "I found myself getting agitated",
    "I found it difficult to relax",
    "I was intolerant of anything that kept me from getting on with what I was doing",
    "I felt that I was rather touchy",
];

pub const ANXIETY_QUESTIONS: [&str; QUESTIONS_PER_DIMENSION] = [
    "I was aware of dryness of my mouth",
    "I experienced breathing difficulty (e.g., rapid breathing without exertion)",
    "I experienced trembling (e.g., in the hands)",
    "I was worried about situations in which I might panic and make a fool of myself",
    "I felt I was close to panic",
    "I was aware of the action of my heart in the absence of physical exertion",
    "I felt scared without any good reason",
];

pub const DEPRESSION_QUESTIONS: [&str; QUESTIONS_PER_DIMENSION] = [
    "I couldn't seem to experience any positive feeling at all",
    "I found it difficult to work up the initiative to do things",
    "I felt that I had nothing to look forward to",
    "I felt down-hearted and blue",
    "I was unable to become enthusiastic about anything",
    "I felt I wasn't worth much as a person",
    "I felt that life was meaningless",
];

/// One answer per questionnaire item, on the 0-3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnswerSet {
    answers: [u8; QUESTIONS_PER_DIMENSION],
}

impl AnswerSet {
    /// Create an answer set from raw values.
    #[must_use]
    pub fn new(answers: [u8; QUESTIONS_PER_DIMENSION]) -> Self {
        Self { answers }
    }

    /// Convert answers to a feature vector for model inference.
    /// Order matches the exported model's feature_names (survey item order).
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.answers.iter().map(|&a| f64::from(a)).collect()
    }

    /// Create an answer set from a vector of values.
    ///
    /// # Errors
    /// Returns error if the vector length is not 7.
    pub fn from_vec(v: &[u8]) -> Result<Self, String> {
        if v.len() != QUESTIONS_PER_DIMENSION {
            return Err(format!(
                "Expected {QUESTIONS_PER_DIMENSION} answers, got {}",
                v.len()
            ));
        }
        let mut answers = [0u8; QUESTIONS_PER_DIMENSION];
        answers.copy_from_slice(v);
        Ok(Self { answers })
    }

    /// Validate that all answers are within the 0-3 scale.
    ///
    /// This validation belongs to the input-collection layer; the severity
    /// classifier itself accepts any real-valued score.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, &a)| a > ANSWER_MAX)
            .map(|(i, &a)| format!("Answer {} is {a}, must be 0-{ANSWER_MAX}", i + 1))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A submitted questionnaire for one dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentData {
    /// Dimension the answers belong to
    pub dimension: Dimension,

    /// The seven item answers
    pub answers: AnswerSet,

    /// Timestamp of submission
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl AssessmentData {
    /// Create new assessment data with the given answers.
    #[must_use]
    pub fn new(dimension: Dimension, answers: AnswerSet) -> Self {
        Self {
            dimension,
            answers,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_to_vec() {
        let answers = AnswerSet::new([0, 1, 2, 3, 1, 0, 2]);
        let vec = answers.to_vec();
        assert_eq!(vec.len(), 7);
        assert!((vec[3] - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_answers_from_vec() {
        let answers = AnswerSet::from_vec(&[1, 1, 1, 1, 1, 1, 1]).expect("Should parse");
        assert_eq!(answers.to_vec().iter().sum::<f64>() as i64, 7);

        assert!(AnswerSet::from_vec(&[1, 2]).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(AnswerSet::new([0, 1, 2, 3, 3, 2, 1]).validate().is_ok());

        let err = AnswerSet::new([0, 4, 2, 9, 0, 0, 0])
            .validate()
            .expect_err("Out-of-scale answers must fail");
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_prone_classifier_asymmetry() {
        assert!(!Dimension::Stress.has_prone_classifier());
        assert!(Dimension::Anxiety.has_prone_classifier());
        assert!(Dimension::Depression.has_prone_classifier());
    }

    #[test]
    fn test_question_counts() {
        for dim in Dimension::ALL {
            assert_eq!(dim.questions().len(), QUESTIONS_PER_DIMENSION);
        }
    }
}
