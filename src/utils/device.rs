//! Compute device selection for Candle.

use crate::core::config::ConfigError;
use crate::core::errors::{ClassifierError, ClassifierResult};
use candle_core::Device;
use std::fmt;
use std::str::FromStr;

/// Requested compute device.
///
/// # Supported formats
///
/// - `"auto"` → CUDA device 0 when available, otherwise CPU
/// - `"cpu"` → CPU device
/// - `"cuda"` or `"gpu"` → CUDA device 0
/// - `"cuda:N"` → CUDA device N (e.g., `"cuda:1"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSpec {
    Auto,
    Cpu,
    Cuda(usize),
}

impl FromStr for DeviceSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let device_str = s.trim().to_lowercase();
        match device_str.as_str() {
            "auto" | "" => Ok(DeviceSpec::Auto),
            "cpu" => Ok(DeviceSpec::Cpu),
            "cuda" | "gpu" => Ok(DeviceSpec::Cuda(0)),
            other => match other.strip_prefix("cuda:") {
                Some(ordinal) => ordinal.parse().map(DeviceSpec::Cuda).map_err(|_| {
                    ConfigError::InvalidConfig {
                        message: format!("Invalid CUDA device ordinal in '{}'", other),
                    }
                }),
                None => Err(ConfigError::InvalidConfig {
                    message: format!(
                        "Unknown device: '{}'. Use 'auto', 'cpu', 'cuda', or 'cuda:N'",
                        other
                    ),
                }),
            },
        }
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSpec::Auto => write!(f, "auto"),
            DeviceSpec::Cpu => write!(f, "cpu"),
            DeviceSpec::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
        }
    }
}

#[cfg(not(feature = "cuda"))]
fn cuda_not_enabled() -> ClassifierError {
    ClassifierError::config_error("CUDA support not enabled. Compile with --features cuda")
}

/// Creates the Candle device for `spec`.
///
/// `Auto` never fails on machines without a GPU; an explicit CUDA request does.
pub fn create_device(spec: DeviceSpec) -> ClassifierResult<Device> {
    match spec {
        DeviceSpec::Auto => Device::cuda_if_available(0).or_else(|e| {
            tracing::warn!("CUDA unavailable ({}), using CPU", e);
            Ok(Device::Cpu)
        }),
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda(ordinal) => {
            #[cfg(feature = "cuda")]
            {
                Device::new_cuda(ordinal).map_err(|e| {
                    ClassifierError::config_error(format!(
                        "Failed to create CUDA device {}: {}",
                        ordinal, e
                    ))
                })
            }
            #[cfg(not(feature = "cuda"))]
            {
                let _ = ordinal;
                Err(cuda_not_enabled())
            }
        }
    }
}

/// Short device name reported in `model_info.device`.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
