//! Constants used throughout the classifier.
//!
//! These values define the process contract: the weights file looked up at startup,
//! the label order baked into the trained output layer, the network input geometry and
//! the placeholder values reported when classification cannot run.

/// Weights file read at startup when no other path is configured.
pub const DEFAULT_WEIGHTS_FILE: &str = "animal_mobilenet.pth";

/// Class labels in the order of the trained network's output layer.
pub const DEFAULT_LABELS: [&str; 6] = ["cat", "chicken", "cow", "dog", "horse", "sheep"];

/// Network input size as (height, width).
pub const DEFAULT_INPUT_SHAPE: (u32, u32) = (224, 224);

/// ImageNet channel means (RGB order).
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet channel standard deviations (RGB order).
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Maximum number of predictions returned per image.
pub const DEFAULT_TOPK: usize = 3;

/// Architecture name reported when trained weights are attached.
pub const ARCHITECTURE_NAME: &str = "MobileNetV2";

/// Architecture name reported in fallback mode.
pub const FALLBACK_ARCHITECTURE_NAME: &str = "Fallback Model";

/// Lower bound (inclusive) of the fallback confidence range.
pub const FALLBACK_CONFIDENCE_MIN: f32 = 0.75;

/// Upper bound (exclusive) of the fallback confidence range.
pub const FALLBACK_CONFIDENCE_MAX: f32 = 0.95;

/// Species reported by the placeholder prediction of a failed request.
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// Confidence reported by the placeholder prediction of a failed request.
pub const UNKNOWN_CONFIDENCE: f32 = 0.5;

/// Prefix of every diagnostic line written to stderr.
pub const LOG_PREFIX: &str = "[AI_LOG]";

/// Error reported when the classifier could not be constructed.
pub const MODEL_NOT_INITIALIZED: &str = "Model not initialized";

/// Error reported when standard input is empty.
pub const NO_INPUT_PROVIDED: &str = "No input data provided";
