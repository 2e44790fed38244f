//! Guidance text selection.
//!
//! Stress gets banded recommendation text keyed by the stress cut points;
//! anxiety and depression get a proneness interpretation driven by a separate
//! binary classifier. The two never mix: there is no proneness flag for
//! stress and no banded recommendation for anxiety or depression.

use serde::{Deserialize, Serialize};

use super::Dimension;

/// Practical tips depending on stress level.
///
/// Keyed by the same cut points as stress severity; scores above 25 share
/// the high-stress warning, matching the source model pairing.
#[must_use]
pub fn stress_recommendation(score: f64) -> &'static str {
    if score <= 14.0 {
        "Keep maintaining balance — continue healthy habits and rest well."
    } else if score <= 18.0 {
        "Try deep breathing or light exercise. Make sure you rest properly and stay socially connected."
    } else if score <= 25.0 {
        "Take breaks often, talk about what's stressing you, and consider journaling or meditating."
    } else {
        "High stress level — it's important to seek emotional support or speak with a counsellor."
    }
}

/// Interpret a proneness flag for anxiety or depression.
///
/// The flag comes from a classifier that is independent of the severity
/// band; a Normal score may still be flagged prone. That disagreement is a
/// property of the trained model pairing and is rendered as-is.
///
/// Returns `None` for stress, which has no proneness classifier.
#[must_use]
pub fn interpret_proneness(dimension: Dimension, prone: bool) -> Option<&'static str> {
    match dimension {
        Dimension::Stress => None,
        Dimension::Anxiety => Some(if prone {
            "You are prone to anxiety. Even if your current anxiety level appears mild or \
             moderate, a score close to the prone-to-anxiety threshold indicates that you are \
             at risk of developing higher anxiety. Consider using relaxation techniques, \
             controlled breathing, mindfulness, and limiting stimulants like caffeine to \
             manage your risk."
        } else {
            "You are not prone to anxiety — keep maintaining your emotional balance."
        }),
        Dimension::Depression => Some(if prone {
            "You are prone to depression. Even though your current level may appear mild or \
             moderate, your score is close to the severe range. This indicates vulnerability \
             to low mood during stressful times. Focus on social connection, enjoyable \
             activities, adequate rest, and seeking support if needed."
        } else {
            "You are not prone to depression — continue maintaining healthy mental habits."
        }),
    }
}

/// Guidance attached to an assessment result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Guidance {
    /// Banded recommendation (stress only).
    Recommendation { text: String },

    /// Proneness interpretation (anxiety and depression only).
    Proneness { prone: bool, text: String },
}

impl Guidance {
    /// Guidance text to render.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Recommendation { text } | Self::Proneness { text, .. } => text,
        }
    }

    /// Whether this guidance carries a positive proneness flag.
    #[must_use]
    pub fn is_prone(&self) -> bool {
        matches!(self, Self::Proneness { prone: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_boundaries() {
        assert!(stress_recommendation(14.0).starts_with("Keep maintaining balance"));
        assert!(stress_recommendation(14.0001).starts_with("Try deep breathing"));
        assert!(stress_recommendation(25.0).starts_with("Take breaks often"));
        assert!(stress_recommendation(34.0).starts_with("High stress level"));
        // Scores between the third and fourth cut points also get the warning.
        assert_eq!(stress_recommendation(30.0), stress_recommendation(34.0));
    }

    #[test]
    fn test_proneness_texts_distinct_and_fixed() {
        for dim in [Dimension::Anxiety, Dimension::Depression] {
            let warned = interpret_proneness(dim, true).expect("prone classifier exists");
            let affirmed = interpret_proneness(dim, false).expect("prone classifier exists");
            assert_ne!(warned, affirmed);
            // Repeated calls return the same fixed strings.
            assert_eq!(interpret_proneness(dim, true), Some(warned));
            assert_eq!(interpret_proneness(dim, false), Some(affirmed));
        }
    }

    #[test]
    fn test_stress_has_no_proneness() {
        assert_eq!(interpret_proneness(Dimension::Stress, true), None);
        assert_eq!(interpret_proneness(Dimension::Stress, false), None);
    }
}
