//! Conversions from Candle errors into [`ClassifierError`].

use crate::core::errors::{ClassifierError, ProcessingStage};

/// Convert Candle error to ClassifierError for inference operations.
pub fn candle_to_inference(
    model_name: &str,
    context: impl Into<String>,
    err: candle_core::Error,
) -> ClassifierError {
    ClassifierError::Inference {
        model_name: model_name.to_string(),
        context: context.into(),
        source: Box::new(err),
    }
}

/// Convert Candle error to ClassifierError for processing operations.
pub fn candle_to_processing(
    kind: ProcessingStage,
    context: impl Into<String>,
    err: candle_core::Error,
) -> ClassifierError {
    ClassifierError::Processing {
        kind,
        context: context.into(),
        source: Box::new(err),
    }
}
