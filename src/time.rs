//! Frame timing for the render loop.
//!
//! [`FrameClock`] is the single clock the core runs on: the render loop ticks
//! it once per frame with the frame's [`Instant`] and hands the resulting
//! delta to the motion controller and the same instant to the gesture session.
//!
//! # Example
//!
//! ```ignore
//! use gesture_galaxy::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // once per frame:
//! let (now, dt) = clock.tick_now();
//! println!("frame {} dt {:.4}s fps {:.1}", clock.frame(), dt, clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Longest delta reported for a single frame, in seconds.
///
/// A window that was hidden or dragged can stall for seconds; feeding that
/// straight into time-normalized smoothing would snap the camera.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Per-frame timing: delta, frame count and a periodically refreshed FPS.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Fixed delta for deterministic stepping (optional).
    fixed_delta: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// A clock whose first frame is measured from `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Record a frame at `now` and return its delta in seconds.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let raw_delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta.min(MAX_FRAME_DELTA));
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Record a frame at the current instant.
    pub fn tick_now(&mut self) -> (Instant, f32) {
        let now = Instant::now();
        (now, self.tick(now))
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.last_frame.saturating_duration_since(self.start)
    }

    /// Use a fixed delta instead of measured frame time. `None` restores
    /// measured timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Restart measurement from `now`, e.g. after the render session resumes.
    pub fn reset(&mut self, now: Instant) {
        *self = Self {
            fixed_delta: self.fixed_delta,
            ..Self::starting_at(now)
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
