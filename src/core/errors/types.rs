//! Error enum and processing stages.

use std::path::PathBuf;
use thiserror::Error;

/// Stage of the classification procedure an error originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Decoding the image payload (data URI, base64, image bytes).
    Decode,
    /// Per-channel normalization and tensor construction.
    Normalization,
    /// Softmax and top-k selection.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "decode"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Errors raised while loading the network or classifying an image.
///
/// The `Display` output of every variant ends up verbatim in the `error` field of a
/// failed response envelope, so messages carry the underlying cause inline.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The payload looked like a data URI but had no `,` separating header and data.
    #[error("malformed data URI: {message}")]
    DataUri {
        /// What was wrong with the URI.
        message: String,
    },

    /// The payload was not valid standard base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not an image format the decoder understands.
    #[error("cannot identify image file: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Error occurred during preprocessing or postprocessing.
    #[error("{kind} failed: {context}: {source}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred while running the network.
    #[error("inference failed in {model_name}: {context}: {source}")]
    Inference {
        /// Name of the network that failed.
        model_name: String,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The weights file could not be read into the network.
    #[error("failed to load weights from {}: {context}: {source}", path.display())]
    ModelLoad {
        /// Weights file path.
        path: PathBuf,
        /// What the loader was doing.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Request JSON could not be parsed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Plain message error used as a `source` when there is no richer cause to attach.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OpaqueError(pub String);
