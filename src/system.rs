//! The owned aggregate the render loop drives.

use std::time::Instant;

use rand::Rng;

use crate::config::GalaxyConfig;
use crate::error::ConfigError;
use crate::field::{FieldGenerator, ParticleField};
use crate::gesture::{Gesture, GestureSession};
use crate::motion::{FrameTransform, MotionController};
use crate::source::{GestureInbox, GestureSender};

/// Particle field, motion controller, gesture session and inbox.
///
/// Built once at startup and handed to the render loop; nothing here is
/// shared or global. Producers get a [`GestureSender`] from
/// [`GalaxySystem::sender`].
#[derive(Debug)]
pub struct GalaxySystem {
    config: GalaxyConfig,
    field: ParticleField,
    motion: MotionController,
    session: GestureSession,
    inbox: GestureInbox,
    sender: GestureSender,
}

impl GalaxySystem {
    /// Validate `config` and generate the particle field.
    pub fn new(config: GalaxyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = FieldGenerator::new(config.galaxy.clone()).generate(config.particle_count)?;
        Self::assemble(config, field)
    }

    /// Like [`GalaxySystem::new`] but draws the field from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: GalaxyConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = FieldGenerator::new(config.galaxy.clone())
            .generate_with_rng(config.particle_count, rng)?;
        Self::assemble(config, field)
    }

    fn assemble(config: GalaxyConfig, field: ParticleField) -> Result<Self, ConfigError> {
        let motion = MotionController::new(config.motion.clone())?;
        let session = GestureSession::new(config.session.dwell()?)?;
        let (sender, inbox) = GestureInbox::bounded(config.session.inbox_capacity)?;

        log::info!(
            "galaxy ready: {} particles, {} branches, bounding radius {:.1}",
            field.len(),
            config.galaxy.branches,
            field.bounding_radius()
        );

        Ok(Self {
            config,
            field,
            motion,
            session,
            inbox,
            sender,
        })
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// A new producer handle for the gesture inbox.
    pub fn sender(&self) -> GestureSender {
        self.sender.clone()
    }

    /// Apply a gesture synchronously.
    pub fn apply_gesture(&mut self, gesture: Gesture, now: Instant) {
        self.session.apply(gesture, &mut self.motion, now);
    }

    /// Apply an untrusted token synchronously. Unknown tokens are ignored.
    pub fn apply_token(&mut self, token: &str, now: Instant) -> Option<Gesture> {
        self.session.apply_token(token, &mut self.motion, now)
    }

    /// Advance one frame: drain queued gestures, expire the dwell timer,
    /// smooth motion, and return the transform to draw.
    pub fn frame(&mut self, now: Instant, dt: f32) -> FrameTransform {
        for token in self.inbox.drain() {
            self.session.apply_token(&token, &mut self.motion, now);
        }
        self.session.tick(&mut self.motion, now);
        self.motion.advance(dt);
        self.motion.transform()
    }
}
