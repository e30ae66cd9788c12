//! The core module of the classifier.
//!
//! This module contains the fundamental components shared by the rest of the crate:
//! - Configuration and its validation
//! - Constants defining the process contract
//! - Error handling
//! - Diagnostic logging setup

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;

pub use config::{ClassifierConfig, ConfigError, ConfigValidator, ConfigValidatorExt};
pub use constants::*;
pub use errors::{ClassifierError, ClassifierResult, ProcessingStage};
pub use logging::init_tracing;
