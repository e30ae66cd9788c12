//! Classification networks.

pub mod mobilenet_v2;

#[cfg(test)]
pub(crate) mod torch_state_dict;

pub use mobilenet_v2::{MobileNetV2, MobileNetV2Config};
