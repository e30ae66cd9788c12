//! Startup configuration of the classifier.

use super::errors::{ConfigError, ConfigValidator};
use crate::core::constants::{
    DEFAULT_INPUT_SHAPE, DEFAULT_LABELS, DEFAULT_TOPK, DEFAULT_WEIGHTS_FILE, IMAGENET_MEAN,
    IMAGENET_STD,
};
use crate::utils::device::DeviceSpec;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Configuration for [`AnimalClassifier`](crate::predictor::AnimalClassifier).
///
/// Every field has a default, so a configuration file only needs to list the values
/// it changes:
///
/// ```rust
/// use animal_classifier::core::config::ClassifierConfig;
///
/// let config: ClassifierConfig = serde_json::from_str(r#"{ "device": "cpu" }"#).unwrap();
/// assert_eq!(config.labels.len(), 6);
/// assert_eq!(config.input_shape, (224, 224));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path of the PyTorch state dict to load.
    pub weights_path: PathBuf,
    /// Class labels in output-layer order.
    pub labels: Vec<String>,
    /// Compute device: `auto`, `cpu`, `cuda` or `cuda:N`.
    pub device: String,
    /// Maximum number of predictions per image.
    pub topk: usize,
    /// Network input size as (height, width).
    pub input_shape: (u32, u32),
    /// Per-channel normalization mean (RGB order).
    pub normalize_mean: Vec<f32>,
    /// Per-channel normalization standard deviation (RGB order).
    pub normalize_std: Vec<f32>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights_path: PathBuf::from(DEFAULT_WEIGHTS_FILE),
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            device: DeviceSpec::Auto.to_string(),
            topk: DEFAULT_TOPK,
            input_shape: DEFAULT_INPUT_SHAPE,
            normalize_mean: IMAGENET_MEAN.to_vec(),
            normalize_std: IMAGENET_STD.to_vec(),
        }
    }
}

impl ClassifierConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from a JSON file.
    ///
    /// The result is not validated; call [`ConfigValidator::validate`] before use.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Sets the weights file path.
    pub fn with_weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = path.into();
        self
    }

    /// Sets the device specification.
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Sets the class labels.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// File name of the weights path, as reported in `model_info.model_file`.
    pub fn weights_file_name(&self) -> String {
        self.weights_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.weights_path.display().to_string())
    }

    /// Parsed device specification.
    pub fn device_spec(&self) -> Result<DeviceSpec, ConfigError> {
        self.device.parse()
    }
}

impl ConfigValidator for ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "labels must not be empty".to_string(),
            });
        }
        if let Some(label) = self.labels.iter().find(|l| l.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig {
                message: format!("label '{}' is blank", label),
            });
        }
        let mut seen = HashSet::new();
        for label in &self.labels {
            if !seen.insert(label.to_lowercase()) {
                return Err(ConfigError::InvalidConfig {
                    message: format!("duplicate label '{}'", label),
                });
            }
        }

        self.validate_positive_usize(self.topk, "topk")?;
        let (height, width) = self.input_shape;
        self.validate_image_dimensions(width, height)?;

        self.validate_rgb_triplet(&self.normalize_mean, "normalize_mean")?;
        self.validate_rgb_triplet(&self.normalize_std, "normalize_std")?;
        for (i, &s) in self.normalize_std.iter().enumerate() {
            self.validate_positive_f32(s, &format!("normalize_std[{}]", i))?;
        }

        self.device_spec()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weights_file_name(), "animal_mobilenet.pth");
        assert_eq!(config.topk, 3);
        assert_eq!(config.labels[0], "cat");
        assert_eq!(config.labels[5], "sheep");
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(ClassifierConfig::new().with_labels(Vec::<String>::new()).validate().is_err());
        assert!(
            ClassifierConfig::new()
                .with_labels(["cat", "Cat"])
                .validate()
                .is_err()
        );
        assert!(ClassifierConfig::new().with_device("tpu").validate().is_err());

        let mut config = ClassifierConfig::new();
        config.topk = 0;
        assert!(config.validate().is_err());

        let mut config = ClassifierConfig::new();
        config.normalize_std = vec![0.229, 0.0, 0.225];
        assert!(config.validate().is_err());

        let mut config = ClassifierConfig::new();
        config.input_shape = (0, 224);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weights_file_name_strips_directories() {
        let config = ClassifierConfig::new().with_weights_path("/models/v2/animal.pth");
        assert_eq!(config.weights_file_name(), "animal.pth");
    }

    #[test]
    fn test_from_json_file_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        std::fs::write(
            &path,
            r#"{ "labels": ["bird", "fish"], "topk": 1, "device": "cpu" }"#,
        )
        .unwrap();

        let config = ClassifierConfig::from_json_file(&path).unwrap();
        assert_eq!(config.labels, vec!["bird", "fish"]);
        assert_eq!(config.topk, 1);
        assert_eq!(config.weights_path, PathBuf::from("animal_mobilenet.pth"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_file_reports_missing_file() {
        let err = ClassifierConfig::from_json_file(Path::new("/nonexistent/classifier.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }
}
