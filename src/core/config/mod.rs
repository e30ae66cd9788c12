//! Configuration for the classifier service.
//!
//! [`ClassifierConfig`] defaults reproduce the fixed process contract. A JSON file may
//! override any field at startup; nothing changes after the service is constructed.

pub mod classifier;
pub mod errors;

pub use classifier::ClassifierConfig;
pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
