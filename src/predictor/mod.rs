//! The classifier service.

pub mod animal_classifier;

pub use animal_classifier::{AnimalClassifier, fallback_prediction, load_network};
