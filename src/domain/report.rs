//! Assessment result record.

use serde::{Deserialize, Serialize};

use super::{
    classify_severity, interpret_proneness, stress_recommendation, Dimension, Guidance,
    SeverityBand,
};

/// Complete result of one submitted assessment.
///
/// Immutable: each classification call constructs and returns a fresh value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier
    pub id: String,

    /// Dimension that was assessed
    pub dimension: Dimension,

    /// Predicted score from the regression model
    pub score: f64,

    /// Severity classification of the score
    pub severity: SeverityBand,

    /// Guidance text (recommendation or proneness interpretation)
    pub guidance: Guidance,

    /// Timestamp of the assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Create a stress assessment from a predicted score.
    #[must_use]
    pub fn stress(score: f64) -> Self {
        Self::build(
            Dimension::Stress,
            score,
            Guidance::Recommendation {
                text: stress_recommendation(score).to_string(),
            },
        )
    }

    /// Create an anxiety or depression assessment from a predicted score and
    /// the proneness classifier output.
    ///
    /// # Panics
    /// Debug-asserts that the dimension has a prone classifier.
    #[must_use]
    pub fn with_proneness(dimension: Dimension, score: f64, prone: bool) -> Self {
        debug_assert!(dimension.has_prone_classifier());
        let text = interpret_proneness(dimension, prone)
            .unwrap_or_default()
            .to_string();
        Self::build(dimension, score, Guidance::Proneness { prone, text })
    }

    fn build(dimension: Dimension, score: f64, guidance: Guidance) -> Self {
        Self {
            id: uuid_v4(),
            dimension,
            score,
            severity: classify_severity(dimension, score),
            guidance,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Generate a simple UUID v4 (random) using CSPRNG.
///
/// Uses ChaCha20Rng seeded from OS entropy so report identifiers are not
/// predictable across runs.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_assessment() {
        let assessment = Assessment::stress(16.5);
        assert_eq!(assessment.dimension, Dimension::Stress);
        assert_eq!(assessment.severity, SeverityBand::Mild);
        assert!(matches!(assessment.guidance, Guidance::Recommendation { .. }));
        assert!(assessment.guidance.text().starts_with("Try deep breathing"));
    }

    #[test]
    fn test_proneness_assessment() {
        let assessment = Assessment::with_proneness(Dimension::Anxiety, 8.0, true);
        assert_eq!(assessment.severity, SeverityBand::Mild);
        assert!(assessment.guidance.is_prone());
    }

    #[test]
    fn test_proneness_can_disagree_with_severity() {
        // A Normal score flagged prone is preserved, not reconciled.
        let assessment = Assessment::with_proneness(Dimension::Depression, 5.0, true);
        assert_eq!(assessment.severity, SeverityBand::Normal);
        assert!(assessment.guidance.is_prone());
    }

    #[test]
    fn test_uuid_generation() {
        let a = Assessment::stress(10.0);
        let b = Assessment::stress(10.0);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36); // UUID format with dashes
    }
}
