//! Egui overlay support.
//!
//! Only compiled with the `egui` feature. Wraps the egui context, the winit
//! input bridge and the wgpu renderer so the host only sees three calls per
//! frame: [`run`](EguiIntegration::run), then the renderer's
//! [`prepare`](EguiIntegration::prepare) / [`paint`](EguiIntegration::paint) /
//! [`cleanup`](EguiIntegration::cleanup) sequence.

use std::sync::Arc;
use winit::window::Window;

pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated output of one egui frame.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiIntegration {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: &Arc<Window>,
    ) -> Self {
        let ctx = egui::Context::default();

        // Dark, flat style so the panel stays out of the animation's way
        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self { ctx, state, renderer }
    }

    /// Feed a window event to egui.
    ///
    /// Returns true if egui consumed it (pointer over the panel, focused widget).
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run one UI frame and tessellate it.
    pub fn run(&mut self, window: &Window, ui: impl FnMut(&egui::Context)) -> EguiFrameOutput {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, ui);

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        EguiFrameOutput {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Upload textures and buffers. Call before opening the egui render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &output.paint_jobs,
            screen_descriptor,
        );
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer
            .render(render_pass, &output.paint_jobs, screen_descriptor);
    }

    /// Free textures after the frame is submitted.
    pub fn cleanup(&mut self, output: &EguiFrameOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
