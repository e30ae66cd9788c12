//! The JSON envelope written to standard output.

use super::prediction::{ModelState, Prediction};
use serde::{Deserialize, Serialize};

/// Metadata describing the classifier that produced a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// `"MobileNetV2"`, or `"Fallback Model"` without trained weights.
    pub architecture: String,
    /// Raw labels in output-layer order.
    pub classes: Vec<String>,
    /// Compute device name.
    pub device: String,
    /// Whether trained weights are attached.
    pub model_loaded: bool,
    /// Network input size, formatted `"{width}x{height}"`.
    pub input_size: String,
    /// Weights file name.
    pub model_file: String,
}

impl ModelInfo {
    pub fn new(
        state: ModelState,
        classes: Vec<String>,
        device: impl Into<String>,
        input_shape: (u32, u32),
        model_file: impl Into<String>,
    ) -> Self {
        let (height, width) = input_shape;
        Self {
            architecture: state.architecture().to_string(),
            classes,
            device: device.into(),
            model_loaded: state.is_loaded(),
            input_size: format!("{}x{}", width, height),
            model_file: model_file.into(),
        }
    }
}

/// The single externally observable result of an invocation.
///
/// `error` is present only on failure and `model_info` only on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub predictions: Vec<Prediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
}

impl ResponseEnvelope {
    /// Successful classification.
    pub fn success(predictions: Vec<Prediction>, model_info: ModelInfo) -> Self {
        Self {
            success: true,
            error: None,
            predictions,
            model_info: Some(model_info),
        }
    }

    /// Failure inside the predict boundary: carries one placeholder prediction.
    pub fn prediction_failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            predictions: vec![Prediction::unknown()],
            model_info: None,
        }
    }

    /// Failure outside the predict boundary: no predictions at all.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            predictions: Vec::new(),
            model_info: None,
        }
    }
}
