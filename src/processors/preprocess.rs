//! Image → input tensor preprocessing for the classifier network.

use crate::core::config::ClassifierConfig;
use crate::core::errors::{ClassifierResult, ProcessingStage};
use crate::processors::normalization::NormalizeImage;
use crate::utils::candle_to_processing;
use candle_core::{Device, Tensor};
use image::{RgbImage, imageops::FilterType};

/// Resizes an RGB image to the network input size and normalizes it into a
/// `(1, 3, height, width)` tensor on the target device.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    input_shape: (u32, u32),
    resize_filter: FilterType,
    normalizer: NormalizeImage,
    device: Device,
}

impl ImagePreprocessor {
    /// Creates a preprocessor.
    ///
    /// `input_shape` is (height, width). The aspect ratio is not preserved.
    pub fn new(
        input_shape: (u32, u32),
        resize_filter: FilterType,
        normalizer: NormalizeImage,
        device: Device,
    ) -> Self {
        Self {
            input_shape,
            resize_filter,
            normalizer,
            device,
        }
    }

    /// Builds the preprocessor described by `config`.
    pub fn from_config(config: &ClassifierConfig, device: Device) -> ClassifierResult<Self> {
        let normalizer = NormalizeImage::new(
            None,
            Some(config.normalize_mean.clone()),
            Some(config.normalize_std.clone()),
        )?;
        Ok(Self::new(
            config.input_shape,
            FilterType::Triangle,
            normalizer,
            device,
        ))
    }

    /// Input size as (height, width).
    pub fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    /// Resizes `image` to the input size.
    pub fn resize(&self, image: &RgbImage) -> RgbImage {
        let (height, width) = self.input_shape;
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        image::imageops::resize(image, width, height, self.resize_filter)
    }

    /// Resizes and normalizes `image` into a batch of one.
    pub fn preprocess(&self, image: &RgbImage) -> ClassifierResult<Tensor> {
        let resized = self.resize(image);
        let (height, width) = self.input_shape;
        let data = self.normalizer.normalize(&resized);

        Tensor::from_vec(data, (1, 3, height as usize, width as usize), &self.device).map_err(
            |e| {
                candle_to_processing(
                    ProcessingStage::Normalization,
                    "create input tensor",
                    e,
                )
            },
        )
    }
}
