//! Error types for the classifier.
//!
//! Errors are split in two layers: [`ConfigError`](crate::core::config::ConfigError)
//! for startup configuration problems, and [`ClassifierError`] for everything that can
//! go wrong while loading the network or classifying an image.
//!
//! # Usage
//!
//! ```rust
//! use animal_classifier::core::errors::{ClassifierError, ProcessingStage};
//!
//! let error = ClassifierError::invalid_input("image payload is empty");
//! assert_eq!(error.to_string(), "invalid input: image payload is empty");
//!
//! let stage = ProcessingStage::Normalization;
//! assert_eq!(stage.to_string(), "normalization");
//! ```

pub mod constructors;
pub mod types;

pub use types::{ClassifierError, OpaqueError, ProcessingStage};

/// Convenient result alias for classifier operations.
pub type ClassifierResult<T> = Result<T, ClassifierError>;
