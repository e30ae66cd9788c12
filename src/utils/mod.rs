//! Utility functions for payload decoding, devices and Candle error mapping.

pub mod candle;
pub mod device;
pub mod image;

pub use candle::{candle_to_inference, candle_to_processing};
pub use device::{DeviceSpec, create_device, device_label};
pub use image::{
    decode_base64, decode_image_payload, dynamic_to_rgb, encode_image_file, strip_data_uri,
};
