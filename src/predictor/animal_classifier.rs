//! Animal Classifier
//!
//! The classifier service: owns the network, its [`ModelState`], the label set and the
//! preprocessing pipeline. It is built once per process and every call to
//! [`AnimalClassifier::predict_from_base64`] is independent of the previous ones.
//!
//! When the weights file is missing or unreadable the service still starts, in
//! fallback mode. Fallback predictions are a random label with a confidence in
//! `[0.75, 0.95)`: an intentionally approximate placeholder, flagged to callers through
//! `model_info.model_loaded == false`.

use crate::core::config::{ClassifierConfig, ConfigValidatorExt};
use crate::core::constants::{FALLBACK_CONFIDENCE_MAX, FALLBACK_CONFIDENCE_MIN};
use crate::core::errors::{ClassifierError, ClassifierResult, ProcessingStage};
use crate::domain::{AnimalLabels, ModelInfo, ModelState, Prediction, ResponseEnvelope};
use crate::models::{MobileNetV2, MobileNetV2Config};
use crate::processors::{ImagePreprocessor, Topk};
use crate::utils::{candle_to_processing, create_device, decode_image_payload, device_label};
use candle_core::{Device, Tensor};
use image::RgbImage;
use rand::Rng;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Image classifier over a fixed, ordered label set.
#[derive(Debug)]
pub struct AnimalClassifier {
    labels: AnimalLabels,
    network: MobileNetV2,
    state: ModelState,
    preprocessor: ImagePreprocessor,
    topk: Topk,
    device: Device,
    model_file: String,
}

/// Loads trained weights from `path`, or builds a random network when that fails.
///
/// A missing file and a failed load are both non-fatal; only failing to build the
/// random network itself is an error.
pub fn load_network(
    path: &Path,
    config: &MobileNetV2Config,
    device: &Device,
) -> ClassifierResult<(MobileNetV2, ModelState)> {
    if !path.exists() {
        warn!("Model file not found: {}", path.display());
        return Ok((MobileNetV2::random_init(config, device)?, ModelState::Fallback));
    }

    info!("Loading model from {}...", path.display());
    match MobileNetV2::from_pth(path, config, device) {
        Ok(network) => {
            info!("Model loaded successfully!");
            Ok((network, ModelState::Loaded))
        }
        Err(e) => {
            error!("Error loading model: {}", e);
            Ok((MobileNetV2::random_init(config, device)?, ModelState::Fallback))
        }
    }
}

/// Draws the fallback placeholder: a uniformly random label with a confidence in
/// `[0.75, 0.95)`.
pub fn fallback_prediction<R: Rng>(
    labels: &AnimalLabels,
    rng: &mut R,
) -> ClassifierResult<Prediction> {
    if labels.is_empty() {
        return Err(ClassifierError::config_error("label set is empty"));
    }
    let class_index = rng.gen_range(0..labels.len());
    let confidence = rng.gen_range(FALLBACK_CONFIDENCE_MIN..FALLBACK_CONFIDENCE_MAX);
    let species = labels
        .species(class_index)
        .ok_or_else(|| ClassifierError::invalid_input(format!("no label at {class_index}")))?;
    Ok(Prediction::new(species, confidence, class_index))
}

impl AnimalClassifier {
    /// Builds the classifier described by `config`, loading weights from
    /// `config.weights_path`.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the requested device cannot be created.
    /// Weight loading problems never fail construction; they select fallback mode.
    pub fn new(config: ClassifierConfig) -> ClassifierResult<Self> {
        let config = config.validate_and_wrap()?;
        let device = create_device(config.device_spec()?)?;

        info!("Starting model initialization...");
        info!("Device: {}", device_label(&device));
        info!("Classes: {:?}", config.labels);

        let network_config = MobileNetV2Config::new(config.labels.len());
        let (network, state) = load_network(&config.weights_path, &network_config, &device)?;
        Self::from_parts(&config, network, state, device)
    }

    /// Assembles a classifier from an already-built network.
    pub fn from_parts(
        config: &ClassifierConfig,
        network: MobileNetV2,
        state: ModelState,
        device: Device,
    ) -> ClassifierResult<Self> {
        if network.num_classes() != config.labels.len() {
            return Err(ClassifierError::config_error(format!(
                "network has {} outputs but {} labels are configured",
                network.num_classes(),
                config.labels.len()
            )));
        }

        Ok(Self {
            labels: AnimalLabels::new(config.labels.iter().cloned()),
            network,
            state,
            preprocessor: ImagePreprocessor::from_config(config, device.clone())?,
            topk: Topk::new(config.topk)?,
            device,
            model_file: config.weights_file_name(),
        })
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn labels(&self) -> &AnimalLabels {
        &self.labels
    }

    /// Metadata attached to every successful response.
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo::new(
            self.state,
            self.labels.as_slice().to_vec(),
            device_label(&self.device),
            self.preprocessor.input_shape(),
            self.model_file.clone(),
        )
    }

    /// Classifies a base64 or data-URI payload and wraps the outcome in a response
    /// envelope. Never fails: errors become a `success: false` envelope with a single
    /// placeholder prediction.
    pub fn predict_from_base64(&self, payload: &str) -> ResponseEnvelope {
        self.predict_from_base64_with_rng(payload, &mut rand::thread_rng())
    }

    /// [`predict_from_base64`](Self::predict_from_base64) with an explicit random source
    /// for the fallback branch.
    pub fn predict_from_base64_with_rng<R: Rng>(
        &self,
        payload: &str,
        rng: &mut R,
    ) -> ResponseEnvelope {
        match self.predict(payload, rng) {
            Ok(predictions) => ResponseEnvelope::success(predictions, self.model_info()),
            Err(e) => {
                match e.stage() {
                    Some(stage) => error!("Prediction error during {}: {}", stage, e),
                    None => error!("Prediction error: {}", e),
                }
                ResponseEnvelope::prediction_failure(e.to_string())
            }
        }
    }

    /// Decodes `payload` and classifies it.
    pub fn predict<R: Rng>(
        &self,
        payload: &str,
        rng: &mut R,
    ) -> ClassifierResult<Vec<Prediction>> {
        let image = decode_image_payload(payload)?;
        debug!("Decoded image {}x{}", image.width(), image.height());
        self.predict_image(&image, rng)
    }

    /// Classifies a decoded image.
    ///
    /// Preprocessing runs in both model states so that unusable images are rejected
    /// the same way whether or not weights are loaded.
    pub fn predict_image<R: Rng>(
        &self,
        image: &RgbImage,
        rng: &mut R,
    ) -> ClassifierResult<Vec<Prediction>> {
        let input = self.preprocessor.preprocess(image)?;

        match self.state {
            ModelState::Loaded => {
                let predictions = self.classify_tensor(&input)?;
                if let Some(top) = predictions.first() {
                    info!("Prediction: {} ({:.2})", top.species, top.confidence);
                }
                Ok(predictions)
            }
            ModelState::Fallback => {
                let prediction = fallback_prediction(&self.labels, rng)?;
                warn!("Using fallback prediction: {}", prediction.species);
                Ok(vec![prediction])
            }
        }
    }

    /// Forward pass, softmax and top-k over a preprocessed `(1, 3, H, W)` tensor.
    fn classify_tensor(&self, input: &Tensor) -> ClassifierResult<Vec<Prediction>> {
        let probs = self.network.predict_proba(input)?;
        let row = probs
            .get(0)
            .and_then(|row| row.to_vec1::<f32>())
            .map_err(|e| {
                candle_to_processing(
                    ProcessingStage::PostProcessing,
                    "read class probabilities",
                    e,
                )
            })?;

        let top = self.topk.process(&row)?;
        top.iter()
            .map(|(class_index, confidence)| -> ClassifierResult<Prediction> {
                let species = self.labels.species(class_index).ok_or_else(|| {
                    ClassifierError::post_processing_message(format!(
                        "class index {class_index} has no label"
                    ))
                })?;
                Ok(Prediction::new(species, confidence, class_index))
            })
            .collect()
    }
}
