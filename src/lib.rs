//! # Gesture Galaxy
//!
//! A procedural spiral-galaxy point cloud steered by discrete gesture events.
//!
//! An external producer (a remote vision session, stdin, a replay script, the
//! keyboard) emits sparse, bursty gesture tokens such as `zoom_in` or
//! `move_left`. The core turns them into continuous, jitter-free camera and
//! rotation motion:
//!
//! ```text
//! GestureSource --channel--> GestureSession --> MotionController targets
//!                                                       |
//!              RenderBackend <-- FrameTransform <-- RenderLoop::tick
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use gesture_galaxy::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let system = GalaxySystem::new(GalaxyConfig::default())?;
//!     spawn_gesture_source(ScriptedGestureSource::demo(), system.sender());
//!     gesture_galaxy::app::run(system)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Field
//!
//! [`FieldGenerator`] places particles on spiral arms once at startup. Arms are
//! assigned by particle index, so every arm gets the same population.
//!
//! ### Motion
//!
//! [`MotionController`] eases current zoom/pitch/yaw toward their targets with
//! exponential smoothing. It never overshoots. See [`SmoothingMode`] for the
//! frame-coupled and time-normalized variants.
//!
//! ### Gestures
//!
//! | gesture | effect |
//! |---------|--------|
//! | `zoom_in` / `zoom_out` | zoom target -/+ step, clamped |
//! | `move_left` / `move_right` | yaw target -/+ pan step |
//! | `move_up` / `move_down` | pitch target -/+ pan step |
//! | `stop` | pitch target to rest, yaw target decayed |
//! | `rotate` | reserved, no motion |
//!
//! A non-stop gesture stays active for the dwell duration, after which
//! [`GestureSession`] applies `stop` on its own. Unknown tokens are ignored.

pub mod app;
pub mod config;
pub mod error;
pub mod field;
pub mod gesture;
pub mod gpu;
pub mod input;
pub mod motion;
pub mod render;
pub mod source;
pub mod system;
pub mod time;

pub use config::{GalaxyConfig, RenderConfig, SessionConfig};
pub use error::{ConfigError, GpuError, RenderError, RunError};
pub use field::{FieldGenerator, GalaxyParams, ParticleField, ParticleVertex};
pub use gesture::{Gesture, GestureSession, SessionState, UnknownGesture};
pub use glam::Vec3;
pub use gpu::GpuRenderer;
pub use motion::{
    FrameTransform, MotionConfig, MotionController, MotionField, MotionParams, MotionState,
    SmoothingMode,
};
pub use render::{RenderBackend, RenderLoop};
pub use source::{
    spawn_gesture_source, GestureInbox, GestureSender, GestureSource, LineGestureSource,
    ScriptedGestureSource, SendStatus,
};
pub use system::GalaxySystem;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use gesture_galaxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::GalaxyConfig;
    pub use crate::error::{ConfigError, RunError};
    pub use crate::field::{FieldGenerator, GalaxyParams};
    pub use crate::gesture::Gesture;
    pub use crate::motion::{FrameTransform, MotionConfig, SmoothingMode};
    pub use crate::render::{RenderBackend, RenderLoop};
    pub use crate::source::{
        spawn_gesture_source, GestureSource, LineGestureSource, ScriptedGestureSource,
    };
    pub use crate::system::GalaxySystem;
    pub use crate::Vec3;
}
