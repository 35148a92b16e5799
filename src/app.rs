//! Windowed viewer: winit event loop around a [`RenderLoop`] of [`GpuRenderer`].

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::{RenderError, RunError};
use crate::gpu::GpuRenderer;
use crate::input;
use crate::render::RenderLoop;
use crate::source::GestureSender;
use crate::system::GalaxySystem;

/// Frames between window title refreshes.
const TITLE_REFRESH_FRAMES: u64 = 30;

/// Open a window and run until it is closed.
///
/// Blocks the calling thread. Gesture producers should already hold a
/// sender from [`GalaxySystem::sender`]. A GPU acquisition or fatal surface
/// failure ends the loop and is returned.
pub fn run(system: GalaxySystem) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(system);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    render_loop: RenderLoop<GpuRenderer>,
    keyboard: GestureSender,
    error: Option<RunError>,
}

impl App {
    fn new(system: GalaxySystem) -> Self {
        let keyboard = system.sender();
        Self {
            window: None,
            render_loop: RenderLoop::new(system),
            keyboard,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RunError) {
        log::error!("{}", error);
        self.render_loop.stop();
        self.error = Some(error);
        event_loop.exit();
    }

    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window = match &self.window {
            Some(window) => window.clone(),
            None => {
                let render = &self.render_loop.system().config().render;
                let window_attrs = Window::default_attributes()
                    .with_title(render.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(render.width, render.height));
                let window = Arc::new(event_loop.create_window(window_attrs)?);
                self.window = Some(window.clone());
                window
            }
        };

        let system = self.render_loop.system();
        let renderer = pollster::block_on(GpuRenderer::new(
            window.clone(),
            system.field(),
            &system.config().render,
        ))?;
        self.render_loop.start(renderer, std::time::Instant::now());
        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        match self.render_loop.tick(std::time::Instant::now()) {
            Ok(Some(transform)) => {
                let clock = self.render_loop.clock();
                if clock.frame() % TITLE_REFRESH_FRAMES == 0 {
                    if let Some(window) = &self.window {
                        let title = &self.render_loop.system().config().render.title;
                        window.set_title(&format!(
                            "{} | {:.0} fps | zoom {:.1}",
                            title,
                            clock.fps(),
                            transform.camera_distance
                        ));
                    }
                }
            }
            Ok(None) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                if let Some(renderer) = self.render_loop.backend_mut() {
                    renderer.reconfigure();
                }
            }
            Err(e @ RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                self.fail(event_loop, e.into());
            }
            Err(e) => log::warn!("render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_loop.is_running() {
            return;
        }
        if let Err(e) = self.start_session(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.render_loop.stop();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.render_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.render_loop
                    .resize(physical_size.width, physical_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if input::is_quit(&event) {
                    self.render_loop.stop();
                    event_loop.exit();
                } else if let Some(gesture) = input::gesture_for_event(&event) {
                    self.keyboard.send(gesture.as_str());
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    if self.render_loop.is_running() {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.render_loop.stop();
    }
}
