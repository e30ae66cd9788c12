//! Per-channel image normalization.
//!
//! Pixels are mapped as `value * alpha + beta` with `alpha = scale / std` and
//! `beta = -mean / std`, which equals `(value * scale - mean) / std`. Output is laid
//! out channel-first (CHW), as torchvision networks expect.

use crate::core::constants::{IMAGENET_MEAN, IMAGENET_STD};
use crate::core::errors::{ClassifierError, ClassifierResult};
use image::RgbImage;

/// Normalizes RGB images into flat CHW f32 buffers.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    pub beta: Vec<f32>,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - Optional scaling factor (defaults to 1.0/255.0)
    /// * `mean` - Optional mean values for each channel (defaults to [0.485, 0.456, 0.406])
    /// * `std` - Optional standard deviation values for each channel (defaults to [0.229, 0.224, 0.225])
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Scale is less than or equal to 0
    /// * Mean or std vectors don't have exactly 3 elements
    /// * Any standard deviation value is less than or equal to 0
    pub fn new(
        scale: Option<f32>,
        mean: Option<Vec<f32>>,
        std: Option<Vec<f32>>,
    ) -> ClassifierResult<Self> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or_else(|| IMAGENET_MEAN.to_vec());
        let std = std.unwrap_or_else(|| IMAGENET_STD.to_vec());

        if scale <= 0.0 {
            return Err(ClassifierError::config_error("Scale must be greater than 0"));
        }

        if mean.len() != 3 {
            return Err(ClassifierError::config_error(
                "Mean must have exactly 3 elements for RGB",
            ));
        }

        if std.len() != 3 {
            return Err(ClassifierError::config_error(
                "Std must have exactly 3 elements for RGB",
            ));
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ClassifierError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let alpha: Vec<f32> = std.iter().map(|s| scale / s).collect();
        let beta: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();

        Ok(Self { alpha, beta })
    }

    /// Normalizes one image into a flat `[3, height, width]` buffer.
    pub fn normalize(&self, rgb_img: &RgbImage) -> Vec<f32> {
        let (width, height) = rgb_img.dimensions();
        let (width, height) = (width as usize, height as usize);
        let plane = width * height;
        let mut result = vec![0.0f32; 3 * plane];

        for (x, y, pixel) in rgb_img.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                result[c * plane + y * width + x] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
            }
        }
        result
    }
}
