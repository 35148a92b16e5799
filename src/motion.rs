//! Damped camera/rotation controller.
//!
//! [`MotionController`] keeps a *current* and a *target* value for camera
//! distance (zoom), object pitch and object yaw. Gestures move targets; every
//! frame [`MotionController::advance`] moves each current value a fixed
//! fraction of the remaining distance toward its target:
//!
//! ```text
//! current += (target - current) * k
//! ```
//!
//! With `0 < k <= 1` this is exponential decay, so current values approach
//! their targets monotonically and never overshoot.
//!
//! `k` is chosen by [`SmoothingMode`]. [`SmoothingMode::PerFrame`] uses the
//! smoothing factor as-is every call, which ties motion speed to the display
//! refresh rate. [`SmoothingMode::TimeNormalized`] rescales the factor by the
//! elapsed time so that one reference frame worth of time always covers the
//! same fraction of the gap.
//!
//! Independently of gestures, a small idle spin is accumulated every step and
//! added to the rendered yaw, so the galaxy keeps drifting when nobody is
//! steering it.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the smoothing factor relates to elapsed time.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Apply the factor once per `advance` call regardless of `dt`.
    #[default]
    PerFrame,
    /// Scale the factor so that `1 / reference_hz` seconds equals one frame.
    TimeNormalized { reference_hz: f32 },
}

/// Tunables for [`MotionController`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of the remaining gap covered per reference frame.
    pub smoothing_factor: f32,
    pub smoothing_mode: SmoothingMode,
    /// Camera distance at startup.
    pub initial_zoom: f32,
    /// Object pitch at startup, in radians.
    pub initial_pitch: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Zoom target change per zoom gesture.
    pub zoom_step: f32,
    /// Pitch/yaw target change per move gesture, in radians.
    pub pan_step: f32,
    /// Multiplier applied to the yaw target on stop.
    pub stop_decay: f32,
    /// Pitch target restored on stop, in radians.
    pub resting_pitch: f32,
    /// Yaw drift per reference frame, in radians.
    pub idle_spin: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.04,
            smoothing_mode: SmoothingMode::PerFrame,
            initial_zoom: 45.0,
            initial_pitch: 0.3,
            zoom_min: 8.0,
            zoom_max: 180.0,
            zoom_step: 10.0,
            pan_step: 0.12,
            stop_decay: 0.4,
            resting_pitch: 0.3,
            idle_spin: 0.0008,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing_factor));
        }
        if let SmoothingMode::TimeNormalized { reference_hz } = self.smoothing_mode {
            if !(reference_hz.is_finite() && reference_hz > 0.0) {
                return Err(ConfigError::InvalidReferenceRate(reference_hz));
            }
        }
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max && self.zoom_max.is_finite()) {
            return Err(ConfigError::InvalidZoomBounds {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        if !(0.0..=1.0).contains(&self.stop_decay) {
            return Err(ConfigError::InvalidStopDecay(self.stop_decay));
        }
        for (field, value) in [
            ("initial_zoom", self.initial_zoom),
            ("initial_pitch", self.initial_pitch),
            ("zoom_step", self.zoom_step),
            ("pan_step", self.pan_step),
            ("resting_pitch", self.resting_pitch),
            ("idle_spin", self.idle_spin),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}

/// One of the three steerable quantities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionField {
    Zoom,
    Pitch,
    Yaw,
}

/// Camera distance and object orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionParams {
    pub zoom: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl MotionParams {
    #[inline]
    pub fn get(&self, field: MotionField) -> f32 {
        match field {
            MotionField::Zoom => self.zoom,
            MotionField::Pitch => self.pitch,
            MotionField::Yaw => self.yaw,
        }
    }

    #[inline]
    fn get_mut(&mut self, field: MotionField) -> &mut f32 {
        match field {
            MotionField::Zoom => &mut self.zoom,
            MotionField::Pitch => &mut self.pitch,
            MotionField::Yaw => &mut self.yaw,
        }
    }
}

/// Rendered values and the values they are steering toward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    pub current: MotionParams,
    pub target: MotionParams,
}

/// Per-frame transform handed to the rendering backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransform {
    /// Distance from the camera to the galaxy center.
    pub camera_distance: f32,
    /// Rotation about the x axis, in radians.
    pub pitch: f32,
    /// Rotation about the y axis including idle drift, in radians.
    pub yaw: f32,
}

/// Smooths current camera/rotation values toward gesture-driven targets.
#[derive(Clone, Debug)]
pub struct MotionController {
    config: MotionConfig,
    state: MotionState,
    drift: f32,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = MotionParams {
            zoom: config.initial_zoom.clamp(config.zoom_min, config.zoom_max),
            pitch: config.initial_pitch,
            yaw: 0.0,
        };
        Ok(Self {
            config,
            state: MotionState {
                current: start,
                target: start,
            },
            drift: 0.0,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn current(&self) -> MotionParams {
        self.state.current
    }

    pub fn target(&self) -> MotionParams {
        self.state.target
    }

    /// Accumulated idle drift, wrapped to `[0, 2π)`.
    pub fn drift(&self) -> f32 {
        self.drift
    }

    /// Fraction of the remaining gap covered by an `advance(dt)` call.
    pub fn step_fraction(&self, dt: f32) -> f32 {
        let k = self.config.smoothing_factor;
        match self.config.smoothing_mode {
            SmoothingMode::PerFrame => k,
            SmoothingMode::TimeNormalized { reference_hz } => {
                1.0 - (1.0 - k).powf(dt.max(0.0) * reference_hz)
            }
        }
    }

    /// Reference frames represented by `dt`.
    fn frames(&self, dt: f32) -> f32 {
        match self.config.smoothing_mode {
            SmoothingMode::PerFrame => 1.0,
            SmoothingMode::TimeNormalized { reference_hz } => dt.max(0.0) * reference_hz,
        }
    }

    /// Move every current value one smoothing step toward its target.
    pub fn advance(&mut self, dt: f32) {
        let k = self.step_fraction(dt);
        let MotionState { current, target } = &mut self.state;

        current.zoom += (target.zoom - current.zoom) * k;
        current.pitch += (target.pitch - current.pitch) * k;
        current.yaw += (target.yaw - current.yaw) * k;
        current.zoom = current.zoom.clamp(self.config.zoom_min, self.config.zoom_max);

        self.drift = (self.drift + self.config.idle_spin * self.frames(dt)).rem_euclid(TAU);
    }

    /// Set an absolute target. Zoom is clamped into its bounds.
    pub fn set_target(&mut self, field: MotionField, value: f32) {
        let value = match field {
            MotionField::Zoom => value.clamp(self.config.zoom_min, self.config.zoom_max),
            MotionField::Pitch | MotionField::Yaw => value,
        };
        *self.state.target.get_mut(field) = value;
    }

    /// Shift a target by `delta`. Zoom is clamped into its bounds.
    pub fn nudge_target(&mut self, field: MotionField, delta: f32) {
        self.set_target(field, self.state.target.get(field) + delta);
    }

    /// Partial stop: restore the resting pitch and decay the yaw target.
    pub fn stop(&mut self) {
        self.state.target.pitch = self.config.resting_pitch;
        self.state.target.yaw *= self.config.stop_decay;
    }

    /// Jump current values onto their targets.
    pub fn snap_to_target(&mut self) {
        self.state.current = self.state.target;
    }

    pub fn transform(&self) -> FrameTransform {
        FrameTransform {
            camera_distance: self.state.current.zoom,
            pitch: self.state.current.pitch,
            yaw: self.state.current.yaw + self.drift,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> MotionController {
        MotionController::new(MotionConfig::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let m = controller();
        let c = m.current();
        assert_eq!(c.zoom, 45.0);
        assert_eq!(c.pitch, 0.3);
        assert_eq!(c.yaw, 0.0);
        assert_eq!(m.current(), m.target());
    }

    #[test]
    fn test_fixed_point() {
        let mut m = controller();
        m.set_target(MotionField::Yaw, 1.25);
        m.set_target(MotionField::Zoom, 60.0);
        m.snap_to_target();
        let before = m.current();
        for _ in 0..100 {
            m.advance(1.0 / 60.0);
        }
        assert_eq!(m.current(), before);
    }

    #[test]
    fn test_single_step_law() {
        let mut m = controller();
        m.set_target(MotionField::Zoom, 35.0);
        m.advance(0.0);
        assert!((m.current().zoom - (45.0 - 10.0 * 0.04)).abs() < 1e-5);
    }

    #[test]
    fn test_convergence_without_overshoot() {
        let mut m = controller();
        m.set_target(MotionField::Zoom, 80.0);
        m.set_target(MotionField::Yaw, 2.0);

        let k = m.config().smoothing_factor;
        let n = (0.001f32.ln() / (1.0 - k).ln()).ceil() as usize;
        for _ in 0..n {
            m.advance(1.0 / 60.0);
            assert!(m.current().zoom <= 80.0);
            assert!(m.current().yaw <= 2.0);
        }
        assert!((m.current().zoom - 80.0).abs() <= 80.0 * 0.001);
        assert!((m.current().yaw - 2.0).abs() <= 2.0 * 0.001);
    }

    #[test]
    fn test_zoom_target_clamped() {
        let mut m = controller();
        m.set_target(MotionField::Zoom, 1.0);
        assert_eq!(m.target().zoom, 8.0);
        m.set_target(MotionField::Zoom, 1000.0);
        assert_eq!(m.target().zoom, 180.0);
        m.nudge_target(MotionField::Zoom, 50.0);
        assert_eq!(m.target().zoom, 180.0);
    }

    #[test]
    fn test_pitch_yaw_unclamped() {
        let mut m = controller();
        for _ in 0..100 {
            m.nudge_target(MotionField::Yaw, 0.12);
            m.nudge_target(MotionField::Pitch, -0.12);
        }
        assert!((m.target().yaw - 12.0).abs() < 1e-3);
        assert!((m.target().pitch - (0.3 - 12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_stop_is_partial() {
        let mut m = controller();
        m.set_target(MotionField::Yaw, 1.0);
        m.set_target(MotionField::Pitch, -0.5);
        m.stop();
        assert!((m.target().yaw - 0.4).abs() < 1e-6);
        assert_eq!(m.target().pitch, 0.3);
    }

    #[test]
    fn test_idle_drift_without_gestures() {
        let mut m = controller();
        let start = m.transform().yaw;
        for _ in 0..10 {
            m.advance(1.0 / 60.0);
        }
        assert!((m.transform().yaw - start - 10.0 * 0.0008).abs() < 1e-6);
        // drift never leaks into the smoothed state
        assert_eq!(m.current().yaw, 0.0);
    }

    #[test]
    fn test_time_normalized_matches_per_frame_at_reference() {
        let config = MotionConfig {
            smoothing_mode: SmoothingMode::TimeNormalized { reference_hz: 60.0 },
            ..Default::default()
        };
        let m = MotionController::new(config).unwrap();
        assert!((m.step_fraction(1.0 / 60.0) - 0.04).abs() < 1e-5);
        // two half frames cover the same ground as one full frame
        let half = m.step_fraction(1.0 / 120.0);
        assert!((1.0 - (1.0 - half) * (1.0 - half) - 0.04).abs() < 1e-5);
        assert_eq!(m.step_fraction(0.0), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = |config: MotionConfig| MotionController::new(config).unwrap_err();
        assert_eq!(
            bad(MotionConfig { smoothing_factor: 0.0, ..Default::default() }),
            ConfigError::InvalidSmoothing(0.0)
        );
        assert!(matches!(
            bad(MotionConfig { zoom_min: 50.0, zoom_max: 10.0, ..Default::default() }),
            ConfigError::InvalidZoomBounds { .. }
        ));
        assert_eq!(
            bad(MotionConfig { stop_decay: 1.5, ..Default::default() }),
            ConfigError::InvalidStopDecay(1.5)
        );
    }

    #[test]
    fn test_non_finite_knobs_rejected() {
        let cases: [(&str, fn(&mut MotionConfig, f32)); 6] = [
            ("initial_zoom", |c, v| c.initial_zoom = v),
            ("initial_pitch", |c, v| c.initial_pitch = v),
            ("zoom_step", |c, v| c.zoom_step = v),
            ("pan_step", |c, v| c.pan_step = v),
            ("resting_pitch", |c, v| c.resting_pitch = v),
            ("idle_spin", |c, v| c.idle_spin = v),
        ];
        for (field, set) in cases {
            for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
                let mut config = MotionConfig::default();
                set(&mut config, value);
                match MotionController::new(config) {
                    Err(ConfigError::NonFinite { field: f, .. }) => assert_eq!(f, field),
                    other => panic!("{} = {} accepted: {:?}", field, value, other),
                }
            }
        }
    }
}
