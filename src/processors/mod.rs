//! Image preprocessing and prediction postprocessing.

pub mod normalization;
pub mod preprocess;
pub mod topk;

pub use normalization::NormalizeImage;
pub use preprocess::ImagePreprocessor;
pub use topk::{Topk, TopkResult};
