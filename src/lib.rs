//! # Animal Classifier
//!
//! A single-shot image classifier built on a MobileNetV2 network running on Candle.
//! It reads one JSON request holding a base64-encoded image, classifies it against a
//! fixed set of animal labels and produces one JSON response envelope.
//!
//! ## Features
//!
//! - MobileNetV2 with PyTorch `.pth` weights in the torchvision layout
//! - Base64 and `data:image/...;base64,` payloads in any common image format
//! - Top-3 predictions with softmax confidences
//! - Fallback mode with a random placeholder prediction when no weights are available
//! - CPU inference, CUDA with the `cuda` feature
//!
//! ## Modules
//!
//! * [`core`] - Configuration, constants, error handling and logging setup
//! * [`domain`] - Labels, predictions, model state and the response envelope
//! * [`models`] - The MobileNetV2 network
//! * [`predictor`] - The classifier service
//! * [`processors`] - Image preprocessing and top-k selection
//! * [`service`] - Request handling for the stdin/stdout contract
//! * [`utils`] - Payload decoding, devices and Candle error mapping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use animal_classifier::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = AnimalClassifier::new(ClassifierConfig::new())?;
//! let response = handle_payload(r#"{"image": "iVBORw0KGgo..."}"#, Some(&classifier));
//! println!("{}", render(&response, false)?);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod predictor;
pub mod processors;
pub mod service;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use animal_classifier::prelude::*;
/// ```
pub mod prelude {
    // Service
    pub use crate::predictor::AnimalClassifier;
    pub use crate::service::{classify, classify_value, handle_payload, read_and_handle, render};

    // Configuration and results
    pub use crate::core::{ClassifierConfig, ClassifierError, ClassifierResult};
    pub use crate::domain::{ModelInfo, ModelState, Prediction, ResponseEnvelope};
}
