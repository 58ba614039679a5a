//! Simulation builder and runner

use crate::config::ButterflyConfig;
use crate::error::SimulationError;
use crate::field::{ButterflyControl, ButterflyField};
use crate::gpu::GpuState;
use crate::input::{Command, Input};
use crate::visuals::WingPalette;
use glam::Vec2;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

#[cfg(feature = "egui")]
use crate::gpu::egui_integration::EguiIntegration;

const TITLE: &str = "Papillon";

/// Butterfly window builder.
///
/// Use method chaining to configure, then call `.run()` to start.
///
/// ```ignore
/// Simulation::new()
///     .with_particle_count(2500)
///     .with_window_size(1920, 1080)
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    config: ButterflyConfig,
}

impl Simulation {
    /// Create a simulation with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: ButterflyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_width = width;
        self.config.window_height = height;
        self
    }

    /// Fix the random seed so every run draws the same butterfly.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_palette(mut self, palette: WingPalette) -> Self {
        self.config.palette = palette;
        self
    }

    /// Whether the formation starts as soon as the window opens.
    pub fn with_auto_form(mut self, auto_form: bool) -> Self {
        self.config.auto_form = auto_form;
        self
    }

    pub fn config(&self) -> &ButterflyConfig {
        &self.config
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    config: ButterflyConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: Option<ButterflyField>,
    input: Input,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    /// First fatal error raised inside a handler; returned from `run`.
    error: Option<SimulationError>,
}

impl App {
    fn new(config: ButterflyConfig) -> Self {
        Self {
            config,
            window: None,
            gpu_state: None,
            field: None,
            input: Input::new(),
            #[cfg(feature = "egui")]
            egui: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            &self.config.palette,
            self.config.particle_count as usize,
            self.config.max_ripples,
        ))?;

        let viewport = Vec2::new(size.width.max(1) as f32, size.height.max(1) as f32);
        let mut field = ButterflyField::new(self.config.clone(), viewport)?;
        field.mount();

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(
                gpu_state.device(),
                gpu_state.format(),
                &window,
            ));
        }

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.field = Some(field);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state), Some(field)) =
            (&self.window, &mut self.gpu_state, &mut self.field)
        else {
            return;
        };

        for command in self.input.commands() {
            match command {
                Command::Form => {
                    field.trigger();
                }
                Command::Reset => {
                    field.reset();
                }
                Command::TogglePause => {
                    field.toggle_pause();
                }
                Command::Quit => event_loop.exit(),
            }
        }
        if let Some(pointer) = self.input.cursor_moved() {
            field.pointer_moved(pointer);
        }
        for &at in self.input.clicks() {
            field.click(at);
        }
        self.input.begin_frame();

        field.update();

        if field.clock().sample_ready() {
            window.set_title(&format!("{TITLE} | {}", field.stats()));
        }

        gpu_state.upload(&field.instances(), &field.ring_instances(), field.clock().elapsed());

        #[cfg(feature = "egui")]
        let result = match &mut self.egui {
            Some(egui) => {
                let stats = field.stats();
                let mut actions = crate::hud::HudActions::default();
                let output = egui.run(window, |ctx| actions = crate::hud::show(ctx, &stats));
                actions.apply(field);
                gpu_state.render(Some((egui, &output)))
            }
            None => gpu_state.render(None),
        };
        #[cfg(not(feature = "egui"))]
        let result = gpu_state.render();

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("Failed to start: {}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let consumed = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => egui.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        if !consumed {
            self.input.handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(field) = &mut self.field {
                    field.resize(Vec2::new(
                        physical_size.width as f32,
                        physical_size.height as f32,
                    ));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(field) = &self.field {
            log::info!("Shutting down after {} frames", field.clock().frame());
        }
        #[cfg(feature = "egui")]
        {
            self.egui = None;
        }
        self.gpu_state = None;
        self.window = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_config() {
        let sim = Simulation::new()
            .with_particle_count(800)
            .with_window_size(640, 480)
            .with_seed(5)
            .with_auto_form(false);
        let config = sim.config();
        assert_eq!(config.particle_count, 800);
        assert_eq!((config.window_width, config.window_height), (640, 480));
        assert_eq!(config.seed, Some(5));
        assert!(!config.auto_form);
    }

    #[test]
    fn test_with_config_replaces_everything() {
        let custom = ButterflyConfig {
            particle_count: 42,
            ..Default::default()
        };
        let sim = Simulation::new().with_seed(1).with_config(custom.clone());
        assert_eq!(sim.config(), &custom);
    }
}
