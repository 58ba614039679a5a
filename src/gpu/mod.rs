//! wgpu renderer for the butterfly field.
//!
//! Two instanced pipelines draw into the swapchain each frame:
//!
//! 1. particle sprites: one soft-edged quad per [`ParticleInstance`]
//! 2. ripple rings: one stroked circle per [`RingInstance`], drawn on top
//!
//! Positions are in window pixels; the shaders convert to clip space using
//! the viewport stored in the uniform buffer.

#[cfg(feature = "egui")]
pub mod egui_integration;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::interaction::RingInstance;
use crate::particle::ParticleInstance;
use crate::visuals::WingPalette;

#[cfg(feature = "egui")]
use egui_integration::{EguiFrameOutput, EguiIntegration};

pub const PARTICLE_SHADER: &str = include_str!("particle.wgsl");
pub const RING_SHADER: &str = include_str!("ring.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Uniforms {
    viewport: [f32; 2],
    time: f32,
    _padding: f32,
    ring_color: [f32; 4],
}

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x2, // position
    },
    wgpu::VertexAttribute {
        offset: 8,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32, // radius
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x4, // color, after the padding word
    },
];

const RING_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // center
    1 => Float32,   // radius
    2 => Float32,   // alpha
];

/// Instance buffer that grows when more instances arrive than it can hold.
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
    stride: usize,
    label: &'static str,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str, stride: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, stride, capacity),
            capacity,
            len: 0,
            stride,
            label,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, stride: usize, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (stride * capacity) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let count = bytes.len() / self.stride;
        if count > self.capacity {
            self.capacity = count.next_power_of_two();
            self.buffer = Self::allocate(device, self.label, self.stride, self.capacity);
            log::debug!("Grew {} to {} instances", self.label, self.capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = count as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &wgpu::RenderPipeline) {
        if self.len == 0 {
            return;
        }
        pass.set_pipeline(pipeline);
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..6, 0..self.len);
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    particle_pipeline: wgpu::RenderPipeline,
    ring_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    particles: InstanceBuffer,
    rings: InstanceBuffer,
    clear_color: wgpu::Color,
    ring_color: [f32; 4],
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        palette: &WingPalette,
        particle_capacity: usize,
        ring_capacity: usize,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let ring_color = palette.ring.to_rgba(0.9);
        let uniforms = Uniforms {
            viewport: [config.width as f32, config.height as f32],
            time: 0.0,
            _padding: 0.0,
            ring_color,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let particle_pipeline = create_instanced_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            "Particle",
            PARTICLE_SHADER,
            std::mem::size_of::<ParticleInstance>(),
            &PARTICLE_ATTRIBUTES,
        );
        let ring_pipeline = create_instanced_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            "Ring",
            RING_SHADER,
            std::mem::size_of::<RingInstance>(),
            &RING_ATTRIBUTES,
        );

        let particles = InstanceBuffer::new(
            &device,
            "Particle Instance Buffer",
            std::mem::size_of::<ParticleInstance>(),
            particle_capacity,
        );
        let rings = InstanceBuffer::new(
            &device,
            "Ring Instance Buffer",
            std::mem::size_of::<RingInstance>(),
            ring_capacity,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particle_pipeline,
            ring_pipeline,
            uniform_buffer,
            uniform_bind_group,
            particles,
            rings,
            clear_color: palette.background.to_wgpu(),
            ring_color,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Upload this frame's instances.
    pub fn upload(&mut self, particles: &[ParticleInstance], rings: &[RingInstance], time: f32) {
        let uniforms = Uniforms {
            viewport: [self.config.width as f32, self.config.height as f32],
            time,
            _padding: 0.0,
            ring_color: self.ring_color,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.particles
            .write(&self.device, &self.queue, bytemuck::cast_slice(particles));
        self.rings
            .write(&self.device, &self.queue, bytemuck::cast_slice(rings));
    }

    /// Draw the uploaded instances, then the HUD overlay if one is given.
    pub fn render(
        &mut self,
        #[cfg(feature = "egui")] overlay: Option<(&mut EguiIntegration, &EguiFrameOutput)>,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            self.particles.draw(&mut render_pass, &self.particle_pipeline);
            self.rings.draw(&mut render_pass, &self.ring_pipeline);
        }

        #[cfg(feature = "egui")]
        if let Some((egui, frame)) = overlay {
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: frame.pixels_per_point,
            };
            egui.prepare(&self.device, &self.queue, &mut encoder, frame, &screen);
            {
                let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                egui.paint(&mut render_pass.forget_lifetime(), frame, &screen);
            }
            egui.cleanup(frame);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_instanced_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    label: &str,
    source: &str,
    stride: usize,
    attributes: &[wgpu::VertexAttribute],
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} Shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(module)
    }

    fn has_entry_points(module: &naga::Module) -> bool {
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        names.contains(&"vs_main") && names.contains(&"fs_main")
    }

    #[test]
    fn test_particle_shader_is_valid() {
        let module = validate_wgsl(PARTICLE_SHADER).unwrap();
        assert!(has_entry_points(&module));
    }

    #[test]
    fn test_ring_shader_is_valid() {
        let module = validate_wgsl(RING_SHADER).unwrap();
        assert!(has_entry_points(&module));
    }

    #[test]
    fn test_uniform_layout() {
        // viewport + time + padding, then a 16-byte aligned vec4
        assert_eq!(std::mem::size_of::<Uniforms>(), 32);
    }

    #[test]
    fn test_vertex_attributes_match_instances() {
        assert_eq!(PARTICLE_ATTRIBUTES[1].offset, 8);
        // Color skips the padding word
        assert_eq!(PARTICLE_ATTRIBUTES[2].offset, 16);
        assert_eq!(RING_ATTRIBUTES[2].offset, 12);
        assert_eq!(std::mem::size_of::<RingInstance>(), 16);
    }
}
