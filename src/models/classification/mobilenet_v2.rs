//! MobileNetV2 Classification Model
//!
//! A Candle implementation of MobileNetV2 whose parameter names follow the torchvision
//! layout (`features.0` … `features.18`, `classifier.1`), so a `state_dict` saved from
//! PyTorch with `torch.save` loads without any renaming.
//!
//! Batch normalization always runs with the stored running statistics and dropout is
//! never applied: the network is inference-only.

use crate::core::errors::{ClassifierError, ClassifierResult};
use crate::utils::candle_to_inference;
use candle_core::{DType, Device, Module, Result, Tensor};
use candle_nn::{Conv2d, Conv2dConfig, Init, Linear, VarBuilder, VarMap};
use std::path::Path;

const MODEL_NAME: &str = "MobileNetV2";
const BN_EPS: f64 = 1e-5;
const ROUND_NEAREST: usize = 8;
const STEM_CHANNELS: usize = 32;
const HEAD_CHANNELS: usize = 1280;

/// Inverted residual settings: (expand ratio, output channels, repeats, first stride).
const INVERTED_RESIDUAL_SETTING: [(usize, usize, usize, usize); 7] = [
    (1, 16, 1, 1),
    (6, 24, 2, 2),
    (6, 32, 3, 2),
    (6, 64, 4, 2),
    (6, 96, 3, 1),
    (6, 160, 3, 2),
    (6, 320, 1, 1),
];

/// Network hyper-parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileNetV2Config {
    /// Size of the output layer.
    pub num_classes: usize,
    /// Channel width multiplier (1.0 for the standard network).
    pub width_mult: f64,
}

impl MobileNetV2Config {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            width_mult: 1.0,
        }
    }
}

/// Rounds `value` to a multiple of `divisor`, never going more than 10% below it.
fn make_divisible(value: f64, divisor: usize) -> usize {
    let divisor_f = divisor as f64;
    let mut new_value = divisor.max(((value + divisor_f / 2.0) as usize) / divisor * divisor);
    if (new_value as f64) < 0.9 * value {
        new_value += divisor;
    }
    new_value
}

/// BatchNorm2d folded into a per-channel affine transform.
#[derive(Debug, Clone)]
struct FrozenBatchNorm {
    scale: Tensor,
    shift: Tensor,
}

impl FrozenBatchNorm {
    fn load(channels: usize, vb: VarBuilder) -> Result<Self> {
        let weight = vb.get_with_hints(channels, "weight", Init::Const(1.0))?;
        let bias = vb.get_with_hints(channels, "bias", Init::Const(0.0))?;
        let running_mean = vb.get_with_hints(channels, "running_mean", Init::Const(0.0))?;
        let running_var = vb.get_with_hints(channels, "running_var", Init::Const(1.0))?;

        // y = (x - mean) / sqrt(var + eps) * weight + bias
        let denom = (running_var + BN_EPS)?.sqrt()?;
        let scale = weight.div(&denom)?;
        let shift = bias.sub(&running_mean.mul(&scale)?)?;

        Ok(Self {
            scale: scale.reshape((1, channels, 1, 1))?,
            shift: shift.reshape((1, channels, 1, 1))?,
        })
    }
}

impl Module for FrozenBatchNorm {
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        x.broadcast_mul(&self.scale)?.broadcast_add(&self.shift)
    }
}

/// Convolution + BatchNorm + ReLU6 (torchvision `Conv2dNormActivation`).
#[derive(Debug, Clone)]
struct ConvNormActivation {
    conv: Conv2d,
    norm: FrozenBatchNorm,
}

impl ConvNormActivation {
    fn load(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        groups: usize,
        vb: VarBuilder,
    ) -> Result<Self> {
        let conv_cfg = Conv2dConfig {
            stride,
            padding: (kernel_size - 1) / 2,
            groups,
            ..Default::default()
        };
        let conv = candle_nn::conv2d_no_bias(
            in_channels,
            out_channels,
            kernel_size,
            conv_cfg,
            vb.pp("0"),
        )?;
        let norm = FrozenBatchNorm::load(out_channels, vb.pp("1"))?;
        Ok(Self { conv, norm })
    }
}

impl Module for ConvNormActivation {
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = self.conv.forward(x)?;
        let x = self.norm.forward(&x)?;
        x.clamp(0f32, 6f32)
    }
}

/// Inverted residual block: optional 1x1 expansion, 3x3 depthwise, linear 1x1 projection.
#[derive(Debug, Clone)]
struct InvertedResidual {
    expand: Option<ConvNormActivation>,
    depthwise: ConvNormActivation,
    project: Conv2d,
    project_norm: FrozenBatchNorm,
    use_residual: bool,
}

impl InvertedResidual {
    fn load(
        in_channels: usize,
        out_channels: usize,
        stride: usize,
        expand_ratio: usize,
        vb: VarBuilder,
    ) -> Result<Self> {
        let hidden = in_channels * expand_ratio;
        let vb = vb.pp("conv");

        // Sequential indices shift by one when the expansion layer is absent.
        let mut idx = 0;
        let expand = if expand_ratio != 1 {
            let layer = ConvNormActivation::load(in_channels, hidden, 1, 1, 1, vb.pp(idx))?;
            idx += 1;
            Some(layer)
        } else {
            None
        };
        let depthwise = ConvNormActivation::load(hidden, hidden, 3, stride, hidden, vb.pp(idx))?;
        let project = candle_nn::conv2d_no_bias(
            hidden,
            out_channels,
            1,
            Conv2dConfig::default(),
            vb.pp(idx + 1),
        )?;
        let project_norm = FrozenBatchNorm::load(out_channels, vb.pp(idx + 2))?;

        Ok(Self {
            expand,
            depthwise,
            project,
            project_norm,
            use_residual: stride == 1 && in_channels == out_channels,
        })
    }
}

impl Module for InvertedResidual {
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let mut h = match &self.expand {
            Some(expand) => expand.forward(x)?,
            None => x.clone(),
        };
        h = self.depthwise.forward(&h)?;
        h = self.project.forward(&h)?;
        h = self.project_norm.forward(&h)?;
        if self.use_residual { h + x } else { Ok(h) }
    }
}

/// MobileNetV2 classifier.
#[derive(Debug, Clone)]
pub struct MobileNetV2 {
    stem: ConvNormActivation,
    blocks: Vec<InvertedResidual>,
    head: ConvNormActivation,
    classifier: Linear,
    num_classes: usize,
}

impl MobileNetV2 {
    /// Builds the network, pulling every parameter from `vb`.
    pub fn load(config: &MobileNetV2Config, vb: VarBuilder) -> Result<Self> {
        let features = vb.pp("features");

        let mut in_channels = make_divisible(STEM_CHANNELS as f64 * config.width_mult, ROUND_NEAREST);
        let head_channels = make_divisible(
            HEAD_CHANNELS as f64 * config.width_mult.max(1.0),
            ROUND_NEAREST,
        );

        let stem = ConvNormActivation::load(3, in_channels, 3, 2, 1, features.pp(0))?;

        let mut blocks = Vec::new();
        for &(expand_ratio, channels, repeats, first_stride) in &INVERTED_RESIDUAL_SETTING {
            let out_channels = make_divisible(channels as f64 * config.width_mult, ROUND_NEAREST);
            for i in 0..repeats {
                let stride = if i == 0 { first_stride } else { 1 };
                let block = InvertedResidual::load(
                    in_channels,
                    out_channels,
                    stride,
                    expand_ratio,
                    features.pp(blocks.len() + 1),
                )?;
                blocks.push(block);
                in_channels = out_channels;
            }
        }

        let head = ConvNormActivation::load(
            in_channels,
            head_channels,
            1,
            1,
            1,
            features.pp(blocks.len() + 1),
        )?;

        // classifier.0 is dropout, which has no parameters.
        let classifier =
            candle_nn::linear(head_channels, config.num_classes, vb.pp("classifier.1"))?;

        Ok(Self {
            stem,
            blocks,
            head,
            classifier,
            num_classes: config.num_classes,
        })
    }

    /// Loads a PyTorch `state_dict` file (`torch.save(model.state_dict(), path)`).
    ///
    /// Missing tensors and shape mismatches are reported as
    /// [`ClassifierError::ModelLoad`].
    pub fn from_pth(
        path: &Path,
        config: &MobileNetV2Config,
        device: &Device,
    ) -> ClassifierResult<Self> {
        let vb = VarBuilder::from_pth(path, DType::F32, device)
            .map_err(|e| ClassifierError::model_load(path, "read state dict", e))?;
        Self::load(config, vb)
            .map_err(|e| ClassifierError::model_load(path, "attach weights to network", e))
    }

    /// Builds an untrained network with randomly initialized parameters.
    pub fn random_init(config: &MobileNetV2Config, device: &Device) -> ClassifierResult<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        Self::load(config, vb)
            .map_err(|e| candle_to_inference(MODEL_NAME, "initialize random weights", e))
    }

    /// Number of output classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Runs the network and returns softmax probabilities of shape `(batch, num_classes)`.
    pub fn predict_proba(&self, input: &Tensor) -> ClassifierResult<Tensor> {
        let logits = self
            .forward(input)
            .map_err(|e| candle_to_inference(MODEL_NAME, "forward pass", e))?;
        candle_nn::ops::softmax(&logits, candle_core::D::Minus1)
            .map_err(|e| candle_to_inference(MODEL_NAME, "softmax", e))
    }
}

impl Module for MobileNetV2 {
    /// Returns raw logits of shape `(batch, num_classes)`.
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let mut x = self.stem.forward(x)?;
        for block in &self.blocks {
            x = block.forward(&x)?;
        }
        let x = self.head.forward(&x)?;
        // Global average pooling over H and W.
        let x = x.mean((2, 3))?;
        self.classifier.forward(&x)
    }
}
