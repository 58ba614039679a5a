//! Error types for papillon.
//!
//! Animation operations never fail; these cover the edges of the system:
//! GPU initialization, configuration loading and the window/event loop.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("GPU surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur when loading or validating a [`ButterflyConfig`](crate::ButterflyConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML or has wrongly typed fields.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A color string could not be parsed.
    #[error("Invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),
    /// A field holds a value outside its allowed range.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors that can occur when running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The supplied configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_error_wraps_into_simulation_error() {
        let err: SimulationError = GpuError::NoAdapter.into();
        assert!(err.to_string().starts_with("GPU error: No compatible GPU adapter"));
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::InvalidValue {
            field: "offset_decay",
            reason: "must be in (0, 1)".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for `offset_decay`: must be in (0, 1)"
        );
    }
}
