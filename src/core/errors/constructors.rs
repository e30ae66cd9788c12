//! Constructor helpers for [`ClassifierError`].
//!
//! These keep call sites short and make sure every error carries the stage or model it
//! came from.

use super::types::{ClassifierError, OpaqueError, ProcessingStage};
use std::path::Path;

impl ClassifierError {
    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for softmax/top-k failures.
    pub fn post_processing(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::PostProcessing, context, error)
    }

    /// Creates a post-processing error from a plain message.
    pub fn post_processing_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::post_processing("top-k selection", OpaqueError(message))
    }

    /// Creates a weight-loading error for `path`.
    pub fn model_load(
        path: &Path,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a malformed data URI error.
    pub fn data_uri(message: impl Into<String>) -> Self {
        Self::DataUri {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Returns the processing stage for errors raised while handling an image.
    ///
    /// Load, configuration, input and IO errors have no stage.
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            Self::DataUri { .. } | Self::Base64(_) | Self::ImageDecode(_) => {
                Some(ProcessingStage::Decode)
            }
            Self::Processing { kind, .. } => Some(*kind),
            Self::Inference { .. }
            | Self::InvalidInput { .. }
            | Self::ModelLoad { .. }
            | Self::ConfigError { .. }
            | Self::Json(_)
            | Self::Io(_) => None,
        }
    }
}
