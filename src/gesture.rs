//! Gesture vocabulary and the dwell-timed session that applies it.
//!
//! A [`GestureSession`] is either idle or holding one active gesture with an
//! expiry deadline. Every non-stop gesture nudges the [`MotionController`]
//! targets and (re)arms the deadline; `stop`, or the deadline passing while a
//! gesture is active, applies the partial stop exactly once and returns the
//! session to idle.
//!
//! Time is passed in explicitly as an [`Instant`] so the render loop's frame
//! tick is the only clock, and tests can drive the session deterministically.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::error::ConfigError;
use crate::motion::{MotionController, MotionField};

/// Default time a gesture stays active before reverting to idle.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(2000);

/// A discrete command detected from one hand motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    ZoomIn,
    ZoomOut,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Stop,
    /// Reserved. Arms the dwell timer but does not move anything.
    Rotate,
}

impl Gesture {
    pub const ALL: [Gesture; 8] = [
        Gesture::ZoomIn,
        Gesture::ZoomOut,
        Gesture::MoveLeft,
        Gesture::MoveRight,
        Gesture::MoveUp,
        Gesture::MoveDown,
        Gesture::Stop,
        Gesture::Rotate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::ZoomIn => "zoom_in",
            Gesture::ZoomOut => "zoom_out",
            Gesture::MoveLeft => "move_left",
            Gesture::MoveRight => "move_right",
            Gesture::MoveUp => "move_up",
            Gesture::MoveDown => "move_down",
            Gesture::Stop => "stop",
            Gesture::Rotate => "rotate",
        }
    }

    /// Apply this gesture's effect to the motion targets.
    pub fn apply_to(self, motion: &mut MotionController) {
        let zoom_step = motion.config().zoom_step;
        let pan_step = motion.config().pan_step;
        match self {
            Gesture::ZoomIn => motion.nudge_target(MotionField::Zoom, -zoom_step),
            Gesture::ZoomOut => motion.nudge_target(MotionField::Zoom, zoom_step),
            Gesture::MoveLeft => motion.nudge_target(MotionField::Yaw, -pan_step),
            Gesture::MoveRight => motion.nudge_target(MotionField::Yaw, pan_step),
            Gesture::MoveUp => motion.nudge_target(MotionField::Pitch, -pan_step),
            Gesture::MoveDown => motion.nudge_target(MotionField::Pitch, pan_step),
            Gesture::Stop => motion.stop(),
            Gesture::Rotate => {}
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token that names no known gesture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown gesture {0:?}")]
pub struct UnknownGesture(pub String);

impl FromStr for Gesture {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Gesture::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownGesture(token.to_string()))
    }
}

/// Where the session is in its idle/active cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// `expires_at` is `None` when the dwell reaches past what `Instant` can
    /// represent; such a gesture is held until an explicit stop.
    Active {
        gesture: Gesture,
        expires_at: Option<Instant>,
    },
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn active_gesture(&self) -> Option<Gesture> {
        match self {
            SessionState::Idle => None,
            SessionState::Active { gesture, .. } => Some(*gesture),
        }
    }
}

/// Applies inbound gestures to motion targets and auto-reverts after a dwell.
#[derive(Clone, Debug)]
pub struct GestureSession {
    dwell: Duration,
    state: SessionState,
}

impl GestureSession {
    pub fn new(dwell: Duration) -> Result<Self, ConfigError> {
        if dwell.is_zero() {
            return Err(ConfigError::InvalidDwell(0.0));
        }
        Ok(Self {
            dwell,
            state: SessionState::Idle,
        })
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Apply a gesture received at `now`.
    pub fn apply(&mut self, gesture: Gesture, motion: &mut MotionController, now: Instant) {
        gesture.apply_to(motion);
        self.state = match gesture {
            Gesture::Stop => SessionState::Idle,
            _ => SessionState::Active {
                gesture,
                expires_at: now.checked_add(self.dwell),
            },
        };
        log::debug!("gesture {} applied, target now {:?}", gesture, motion.target());
    }

    /// Parse and apply an untrusted token. Unknown tokens are dropped.
    pub fn apply_token(
        &mut self,
        token: &str,
        motion: &mut MotionController,
        now: Instant,
    ) -> Option<Gesture> {
        match token.parse::<Gesture>() {
            Ok(gesture) => {
                self.apply(gesture, motion, now);
                Some(gesture)
            }
            Err(e) => {
                log::debug!("dropping inbound token: {}", e);
                None
            }
        }
    }

    /// Revert to idle if the active gesture's dwell has elapsed.
    ///
    /// Returns `true` when the stop effect was applied.
    pub fn tick(&mut self, motion: &mut MotionController, now: Instant) -> bool {
        match self.state {
            SessionState::Active {
                gesture,
                expires_at: Some(deadline),
            } if now >= deadline => {
                motion.stop();
                self.state = SessionState::Idle;
                log::debug!("gesture {} expired, reverting to idle", gesture);
                true
            }
            _ => false,
        }
    }
}
