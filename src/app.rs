//! Desktop window hosting the fireworks.
//!
//! [`run`] opens a winit window, renders the [`Scene`] with [`GpuState`] and
//! forwards left clicks to the [`FrameDriver`].

use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::PerspectiveCamera;
use crate::config::AppConfig;
use crate::driver::{FrameDriver, FrameHost};
use crate::error::AppError;
use crate::gpu::GpuState;
use crate::input::Input;
use crate::scene::Scene;
use crate::spawn::RandomSampler;

/// Renders into the window and schedules redraws.
struct WindowHost<'a> {
    gpu: &'a mut GpuState,
    window: &'a Window,
}

impl FrameHost<Scene> for WindowHost<'_> {
    type Error = wgpu::SurfaceError;

    fn render(&mut self, graph: &Scene, camera: &PerspectiveCamera) -> Result<(), Self::Error> {
        self.gpu.render(graph, camera)
    }

    fn request_next_frame(&mut self) {
        self.window.request_redraw();
    }
}

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    driver: FrameDriver<Scene, RandomSampler>,
    input: Input,
    error: Option<AppError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let (width, height) = (config.window.width, config.window.height);
        let aspect = width as f32 / height.max(1) as f32;
        let driver = FrameDriver::new(
            config.fireworks.clone(),
            Scene::new(),
            RandomSampler::from_entropy(),
            config.camera.build(aspect),
            config.plane.build(),
        );
        Self {
            config,
            window: None,
            gpu_state: None,
            driver,
            input: Input::new(width, height),
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.driver.resize(size.width, size.height);

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.config.render))?;
        info!(width = size.width, height = size.height, "Window ready");

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (self.window.as_deref(), self.gpu_state.as_mut()) else {
            return;
        };

        let result = {
            let mut host = WindowHost {
                gpu: &mut *gpu_state,
                window,
            };
            self.driver.tick(&mut host)
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            error!("Failed to start: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(click) = self.input.handle_event(&event) {
            self.driver.handle_click(click.position, self.input.viewport());
        }

        match event {
            WindowEvent::CloseRequested => {
                self.driver.shutdown();
                info!(
                    spawned = self.driver.registry().total_spawned(),
                    "Closing window"
                );
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.driver.resize(physical_size.width, physical_size.height);
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
