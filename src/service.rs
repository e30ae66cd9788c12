//! Request handling for the stdin/stdout process contract.
//!
//! Every function here returns a [`ResponseEnvelope`]; failures are reported in the
//! envelope rather than as Rust errors, so the caller always has exactly one document
//! to print.

use crate::core::constants::{MODEL_NOT_INITIALIZED, NO_INPUT_PROVIDED};
use crate::core::errors::{ClassifierError, ClassifierResult};
use crate::domain::ResponseEnvelope;
use crate::predictor::AnimalClassifier;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, error};

/// The JSON object read from standard input.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    /// Base64 image data, optionally wrapped in a `data:image/...;base64,` URI.
    ///
    /// Any JSON value is accepted here; a value that is not a string fails inside the
    /// predict boundary like any other undecodable image.
    pub image: Value,
}

/// Parses a request body. The `image` field is required.
pub fn parse_request(raw: &str) -> ClassifierResult<ClassifyRequest> {
    Ok(serde_json::from_str(raw)?)
}

/// Classifies `image` with `classifier`, or reports that no classifier is available.
pub fn classify(classifier: Option<&AnimalClassifier>, image: &str) -> ResponseEnvelope {
    match classifier {
        Some(classifier) => classifier.predict_from_base64(image),
        None => ResponseEnvelope::failure(MODEL_NOT_INITIALIZED),
    }
}

/// [`classify`] for the raw `image` value of a request.
pub fn classify_value(classifier: Option<&AnimalClassifier>, image: &Value) -> ResponseEnvelope {
    match (classifier, image.as_str()) {
        (None, _) => ResponseEnvelope::failure(MODEL_NOT_INITIALIZED),
        (Some(classifier), Some(payload)) => classifier.predict_from_base64(payload),
        (Some(_), None) => {
            let e = ClassifierError::invalid_input(format!(
                "image payload must be a string, got {}",
                json_type_name(image)
            ));
            error!("Prediction error: {}", e);
            ResponseEnvelope::prediction_failure(e.to_string())
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Handles a raw request body as read from standard input.
pub fn handle_payload(raw: &str, classifier: Option<&AnimalClassifier>) -> ResponseEnvelope {
    let raw = raw.trim();
    if raw.is_empty() {
        return ResponseEnvelope::failure(NO_INPUT_PROVIDED);
    }

    match parse_request(raw) {
        Ok(request) => {
            if let Some(payload) = request.image.as_str() {
                debug!("Received image payload of {} bytes", payload.len());
            }
            classify_value(classifier, &request.image)
        }
        Err(e) => {
            error!("Invalid request: {}", e);
            ResponseEnvelope::failure(format!("Processing error: {e}"))
        }
    }
}

/// Reads the whole of `reader` and handles it as one request.
pub fn read_and_handle<R: Read>(
    mut reader: R,
    classifier: Option<&AnimalClassifier>,
) -> ResponseEnvelope {
    let mut raw = String::new();
    match reader.read_to_string(&mut raw) {
        Ok(_) => handle_payload(&raw, classifier),
        Err(e) => {
            error!("Failed to read input: {}", e);
            ResponseEnvelope::failure(format!("Processing error: {e}"))
        }
    }
}

/// Serializes an envelope as a single JSON document, indented when `pretty` is set.
pub fn render(envelope: &ResponseEnvelope, pretty: bool) -> ClassifierResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassifierConfig;
    use crate::domain::Prediction;
    use serde_json::json;
    use std::io;

    fn fallback_classifier(dir: &tempfile::TempDir) -> AnimalClassifier {
        let config = ClassifierConfig::new()
            .with_weights_path(dir.path().join("animal_mobilenet.pth"))
            .with_device("cpu");
        AnimalClassifier::new(config).unwrap()
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stdin closed"))
        }
    }

    #[test]
    fn test_empty_input() {
        for raw in ["", "   ", "\n\t\n"] {
            let envelope = handle_payload(raw, None);
            assert_eq!(
                serde_json::to_value(&envelope).unwrap(),
                json!({ "success": false, "error": "No input data provided", "predictions": [] })
            );
        }
    }

    #[test]
    fn test_invalid_json_is_processing_error() {
        let envelope = handle_payload("{not json", None);
        assert!(!envelope.success);
        assert!(envelope.predictions.is_empty());
        assert!(envelope.error.unwrap().starts_with("Processing error: "));
    }

    #[test]
    fn test_missing_image_key_is_processing_error() {
        for raw in [r#"{"picture": "abc"}"#, "[]", "42"] {
            let envelope = handle_payload(raw, None);
            assert!(!envelope.success);
            assert!(envelope.predictions.is_empty());
            assert!(envelope.error.unwrap().starts_with("Processing error: "));
        }
    }

    #[test]
    fn test_non_string_image_fails_inside_predict() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = fallback_classifier(&dir);

        for raw in [
            r#"{"image": 42}"#,
            r#"{"image": null}"#,
            r#"{"image": ["abc"]}"#,
        ] {
            let envelope = handle_payload(raw, Some(&classifier));
            assert!(!envelope.success, "{raw}");
            assert_eq!(envelope.predictions, vec![Prediction::unknown()]);
            assert!(envelope.model_info.is_none());
            assert!(
                envelope
                    .error
                    .as_deref()
                    .is_some_and(|e| e.contains("must be a string")),
                "{raw}: {:?}",
                envelope.error
            );
        }
    }

    #[test]
    fn test_non_string_image_without_classifier() {
        let envelope = handle_payload(r#"{"image": 42}"#, None);
        assert_eq!(envelope.error.as_deref(), Some("Model not initialized"));
        assert!(envelope.predictions.is_empty());
    }

    #[test]
    fn test_uninitialized_classifier() {
        let envelope = handle_payload(r#"{"image": "aGVsbG8="}"#, None);
        assert_eq!(envelope.error.as_deref(), Some("Model not initialized"));
        assert!(envelope.predictions.is_empty());
        assert!(envelope.model_info.is_none());
    }

    #[test]
    fn test_read_failure_becomes_envelope() {
        let envelope = read_and_handle(FailingReader, None);
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Processing error: stdin closed"));
    }

    #[test]
    fn test_read_and_handle_reads_everything() {
        let envelope = read_and_handle(io::Cursor::new(b"  \n".to_vec()), None);
        assert_eq!(envelope.error.as_deref(), Some("No input data provided"));
    }

    #[test]
    fn test_render_is_single_document() {
        let envelope = ResponseEnvelope::failure("No input data provided");
        let compact = render(&envelope, false).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = render(&envelope, true).unwrap();
        assert!(pretty.contains("\n  \"success\": false"));

        let a: Value = serde_json::from_str(&compact).unwrap();
        let b: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_request_accepts_extra_fields() {
        let request = parse_request(r#"{"image": "abc", "id": 3}"#).unwrap();
        assert_eq!(request.image, "abc");
    }
}
