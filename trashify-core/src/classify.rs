//! Turns an image classifier prediction into a suggested trash kind for new entries.

use std::fmt;

/// Predictions below this confidence suggest nothing.
pub const MIN_CONFIDENCE: f64 = 0.50;

#[derive(Debug, Clone, PartialEq)]
/// Top result of classifying a photo.
pub struct Prediction {
    /// Class label emitted by the model.
    pub label: String,
    /// Confidence in `[0, 1]`, when the model reports one.
    pub confidence: Option<f64>,
}

/// On-device model that classifies a photographed item.
pub trait ImageClassifier: Send + Sync {
    /// Classify encoded image bytes.
    fn classify(&self, image: &[u8]) -> Prediction;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kinds of trash a user can report.
pub enum TrashKind {
    /// Municipal/residual waste.
    Municipal,
    /// Plastics.
    Plastic,
    /// Glass.
    Glass,
    /// Organic waste.
    Bio,
    /// Pet waste.
    PetFeces,
    /// Batteries.
    Batteries,
}

impl TrashKind {
    /// Every reportable kind.
    pub const ALL: [Self; 6] = [
        Self::Municipal,
        Self::Plastic,
        Self::Glass,
        Self::Bio,
        Self::PetFeces,
        Self::Batteries,
    ];

    /// Parse a classifier label. The model spells municipal as `muncipal`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "municipal" | "muncipal" => Some(Self::Municipal),
            "plastic" => Some(Self::Plastic),
            "glass" => Some(Self::Glass),
            "bio" => Some(Self::Bio),
            "pet feces" | "petFeces" => Some(Self::PetFeces),
            "batteries" => Some(Self::Batteries),
            _ => None,
        }
    }

    /// Backend category tag for this kind.
    #[must_use]
    pub fn category_tag(self) -> &'static str {
        match self {
            Self::Municipal => "municipal",
            Self::Plastic => "plastic",
            Self::Glass => "glass",
            Self::Bio => "bio",
            Self::PetFeces => "petFeces",
            Self::Batteries => "batteries",
        }
    }
}

impl fmt::Display for TrashKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.category_tag())
    }
}

/// Kind to pre-select for a prediction, if it is confident and recognized.
#[must_use]
pub fn suggest_kind(prediction: &Prediction) -> Option<TrashKind> {
    let confidence = prediction.confidence?;
    if confidence < MIN_CONFIDENCE {
        return None;
    }
    TrashKind::from_label(&prediction.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{FALLBACK_STYLE, project};

    struct FixedClassifier(Prediction);

    impl ImageClassifier for FixedClassifier {
        fn classify(&self, _image: &[u8]) -> Prediction {
            self.0.clone()
        }
    }

    fn prediction(label: &str, confidence: Option<f64>) -> Prediction {
        Prediction {
            label: label.to_owned(),
            confidence,
        }
    }

    #[test]
    fn confident_known_label_is_suggested() {
        let classifier = FixedClassifier(prediction("muncipal", Some(0.91)));
        let suggestion = suggest_kind(&classifier.classify(b"jpeg"));
        assert_eq!(suggestion, Some(TrashKind::Municipal));
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(
            suggest_kind(&prediction("glass", Some(0.5))),
            Some(TrashKind::Glass)
        );
        assert_eq!(suggest_kind(&prediction("glass", Some(0.49))), None);
    }

    #[test]
    fn missing_confidence_or_unknown_label_suggests_nothing() {
        assert_eq!(suggest_kind(&prediction("bio", None)), None);
        assert_eq!(suggest_kind(&prediction("sofa", Some(0.99))), None);
    }

    #[test]
    fn kinds_map_to_pin_styles_except_glass() {
        for kind in TrashKind::ALL {
            let style = project(kind.category_tag());
            if kind == TrashKind::Glass {
                assert_eq!(style, FALLBACK_STYLE);
            } else {
                assert_ne!(style, FALLBACK_STYLE, "{kind} should have a pin style");
            }
        }
    }
}
