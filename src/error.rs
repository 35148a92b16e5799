//! Error types for gesture-galaxy.
//!
//! Configuration problems are fatal at construction, GPU acquisition failures
//! are fatal to a single render session, and [`RunError`] wraps everything the
//! windowed binary can hit. Unknown gesture tokens are never errors.

use thiserror::Error;

/// Rejected configuration. Raised before any particle is generated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("galaxy radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("galaxy must have at least one branch")]
    NoBranches,
    #[error("particle count must be greater than zero")]
    EmptyField,
    #[error("randomness must be non-negative and finite, got {0}")]
    InvalidRandomness(f32),
    #[error("randomness power must be positive and finite, got {0}")]
    InvalidRandomnessPower(f32),
    #[error("color components must lie in [0, 1], got {0:?}")]
    InvalidColor([f32; 3]),
    #[error("smoothing factor must lie in (0, 1], got {0}")]
    InvalidSmoothing(f32),
    #[error("reference rate must be positive, got {0} Hz")]
    InvalidReferenceRate(f32),
    #[error("zoom bounds must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidZoomBounds { min: f32, max: f32 },
    #[error("stop decay must lie in [0, 1], got {0}")]
    InvalidStopDecay(f32),
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("dwell duration must be positive and representable, got {0} s")]
    InvalidDwell(f32),
    #[error("gesture inbox capacity must be greater than zero")]
    EmptyInbox,
}

/// Errors that can occur while acquiring GPU resources for a render session.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a Vulkan/Metal/DX12/WebGPU capable device is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("surface exposes no supported texture format")]
    NoSurfaceFormat,
}

/// Errors surfaced by a single frame draw.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The swapchain texture could not be acquired.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Errors that can occur when running the windowed viewer.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Json(#[from] serde_json::Error),
}
