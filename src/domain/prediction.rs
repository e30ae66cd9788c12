//! Prediction entries and model state.

use crate::core::constants::{
    ARCHITECTURE_NAME, FALLBACK_ARCHITECTURE_NAME, UNKNOWN_CONFIDENCE, UNKNOWN_SPECIES,
};
use serde::{Deserialize, Serialize};

/// Whether trained weights are attached to the network.
///
/// Set once when the classifier is built. In `Fallback` mode predictions are random
/// placeholders rather than inference results; callers see this as
/// `model_info.model_loaded == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// Weights were read and attached to the network.
    Loaded,
    /// No usable weights; the network is randomly initialized and never run.
    Fallback,
}

impl ModelState {
    pub fn is_loaded(self) -> bool {
        matches!(self, ModelState::Loaded)
    }

    /// Architecture name reported in `model_info`.
    pub fn architecture(self) -> &'static str {
        match self {
            ModelState::Loaded => ARCHITECTURE_NAME,
            ModelState::Fallback => FALLBACK_ARCHITECTURE_NAME,
        }
    }
}

/// One ranked class prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Capitalized class label.
    pub species: String,
    /// Probability in [0, 1].
    pub confidence: f32,
    /// Position of the label in the label set.
    pub class_index: usize,
}

impl Prediction {
    pub fn new(species: impl Into<String>, confidence: f32, class_index: usize) -> Self {
        Self {
            species: species.into(),
            confidence,
            class_index,
        }
    }

    /// Placeholder reported when an image could not be classified.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_SPECIES, UNKNOWN_CONFIDENCE, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_state_architecture() {
        assert_eq!(ModelState::Loaded.architecture(), "MobileNetV2");
        assert_eq!(ModelState::Fallback.architecture(), "Fallback Model");
        assert!(ModelState::Loaded.is_loaded());
        assert!(!ModelState::Fallback.is_loaded());
    }

    #[test]
    fn test_prediction_serializes_field_names() {
        let json = serde_json::to_value(Prediction::unknown()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "species": "Unknown", "confidence": 0.5, "class_index": 0 })
        );
    }
}
