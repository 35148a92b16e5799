//! Graphics-API-independent frame driver.
//!
//! [`RenderLoop`] owns the [`GalaxySystem`] and, while a render session is
//! running, one [`RenderBackend`]. Each tick advances the system and hands the
//! smoothed [`FrameTransform`] to the backend. Stopping drops the backend,
//! which releases every graphics resource it acquired; the system (and with it
//! the motion state) survives, so a session can be started again.

use std::time::Instant;

use crate::error::RenderError;
use crate::motion::FrameTransform;
use crate::system::GalaxySystem;
use crate::time::FrameClock;

/// Something that can draw the galaxy with a given transform.
///
/// Implementations own their graphics resources and release them on drop.
pub trait RenderBackend {
    /// The drawable area changed size. Only the projection depends on it.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn draw(&mut self, transform: &FrameTransform) -> Result<(), RenderError>;
}

/// Drives the system once per frame and submits the result to a backend.
pub struct RenderLoop<B: RenderBackend> {
    system: GalaxySystem,
    backend: Option<B>,
    clock: FrameClock,
    sessions: u32,
}

impl<B: RenderBackend> RenderLoop<B> {
    pub fn new(system: GalaxySystem) -> Self {
        Self {
            system,
            backend: None,
            clock: FrameClock::new(),
            sessions: 0,
        }
    }

    pub fn system(&self) -> &GalaxySystem {
        &self.system
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_some()
    }

    /// Number of render sessions started so far.
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Attach a backend and begin a render session at `now`. A backend that
    /// is already attached is released first.
    pub fn start(&mut self, backend: B, now: Instant) {
        self.stop();
        self.backend = Some(backend);
        self.clock.reset(now);
        self.sessions += 1;
        log::info!("render session {} started", self.sessions);
    }

    /// End the render session and release the backend. No further draws
    /// happen until the next [`RenderLoop::start`].
    pub fn stop(&mut self) {
        if let Some(backend) = self.backend.take() {
            drop(backend);
            log::info!("render session {} stopped", self.sessions);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(backend) = &mut self.backend {
            backend.resize(width, height);
        }
    }

    /// Run one frame at `now`. Returns `Ok(None)` when no session is running.
    pub fn tick(&mut self, now: Instant) -> Result<Option<FrameTransform>, RenderError> {
        let Some(backend) = &mut self.backend else {
            return Ok(None);
        };
        let dt = self.clock.tick(now);
        let transform = self.system.frame(now, dt);
        backend.draw(&transform)?;
        Ok(Some(transform))
    }
}

impl<B: RenderBackend> Drop for RenderLoop<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalaxyConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Log {
        draws: Vec<FrameTransform>,
        resizes: Vec<(u32, u32)>,
        live: i32,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl Recorder {
        fn new(log: &Rc<RefCell<Log>>) -> Self {
            log.borrow_mut().live += 1;
            Recorder(log.clone())
        }
    }

    impl Drop for Recorder {
        fn drop(&mut self) {
            self.0.borrow_mut().live -= 1;
        }
    }

    impl RenderBackend for Recorder {
        fn resize(&mut self, width: u32, height: u32) {
            self.0.borrow_mut().resizes.push((width, height));
        }

        fn draw(&mut self, transform: &FrameTransform) -> Result<(), RenderError> {
            self.0.borrow_mut().draws.push(*transform);
            Ok(())
        }
    }

    fn render_loop() -> RenderLoop<Recorder> {
        let config = GalaxyConfig {
            particle_count: 200,
            ..Default::default()
        };
        RenderLoop::new(GalaxySystem::with_rng(config, &mut SmallRng::seed_from_u64(3)).unwrap())
    }

    #[test]
    fn test_tick_without_backend_is_noop() {
        let mut rl = render_loop();
        assert_eq!(rl.tick(Instant::now()).unwrap(), None);
        assert_eq!(rl.clock().frame(), 0);
    }

    #[test]
    fn test_start_stop_cycles_release_backend() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut rl = render_loop();
        let t0 = Instant::now();

        for cycle in 0..5u64 {
            rl.start(Recorder::new(&log), t0);
            assert_eq!(log.borrow().live, 1);
            for f in 1..=3 {
                rl.tick(t0 + Duration::from_millis(cycle * 100 + f * 16)).unwrap();
            }
            rl.stop();
            assert_eq!(log.borrow().live, 0);
            assert!(rl.tick(t0 + Duration::from_secs(10)).unwrap().is_none());
        }
        assert_eq!(log.borrow().draws.len(), 15);
        assert_eq!(rl.sessions(), 5);
    }

    #[test]
    fn test_restart_replaces_backend() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut rl = render_loop();
        rl.start(Recorder::new(&log), Instant::now());
        rl.start(Recorder::new(&log), Instant::now());
        assert_eq!(log.borrow().live, 1);
        drop(rl);
        assert_eq!(log.borrow().live, 0);
    }

    #[test]
    fn test_resize_forwarded_without_touching_motion() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut rl = render_loop();
        rl.start(Recorder::new(&log), Instant::now());
        let before = rl.system().motion().state();
        rl.resize(800, 600);
        assert_eq!(log.borrow().resizes, vec![(800, 600)]);
        assert_eq!(rl.system().motion().state(), before);
    }

    #[test]
    fn test_gesture_reaches_backend() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut rl = render_loop();
        let t0 = Instant::now();
        rl.start(Recorder::new(&log), t0);
        rl.system().sender().send("zoom_out");
        for f in 1..=600u64 {
            rl.tick(t0 + Duration::from_millis(f * 16)).unwrap();
        }
        let last = *log.borrow().draws.last().unwrap();
        assert!((last.camera_distance - 55.0).abs() < 0.01);
    }
}
