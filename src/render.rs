use crate::core::{Camera, FrameParams, ParticleEngine};
use web_sys as web;

mod particles;
use particles::{create_particle_resources, ParticleBuffers, ParticleResources, ParticleUniforms};

// Sprite size multiplier applied on top of per-particle sizes.
const POINT_SCALE: f32 = 1.5;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    particles: ParticleResources,
    buffers: ParticleBuffers,
    camera: Camera,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        sizes: &[f32],
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let particles = create_particle_resources(&device, format);
        let buffers = ParticleBuffers::new(&device, sizes.len());
        // sizes are fixed for the lifetime of the particle set
        queue.write_buffer(&buffers.size, 0, bytemuck::cast_slice(sizes));
        let mut camera = Camera::default();
        camera.set_viewport(width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particles,
            buffers,
            camera,
            width,
            height,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.01,
                b: 0.03,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.camera.set_viewport(width, height);
        }
    }

    /// Push whichever particle buffers changed since the last frame.
    pub fn upload(&mut self, engine: &mut ParticleEngine) {
        if engine.take_positions_dirty() {
            self.write_positions(engine);
        }
        if engine.take_colors_dirty() {
            self.write_colors(engine);
        }
    }

    fn write_positions(&self, engine: &ParticleEngine) {
        self.queue.write_buffer(
            &self.buffers.start,
            0,
            bytemuck::cast_slice(engine.positions()),
        );
        self.queue.write_buffer(
            &self.buffers.target,
            0,
            bytemuck::cast_slice(engine.targets()),
        );
    }

    fn write_colors(&self, engine: &ParticleEngine) {
        self.queue
            .write_buffer(&self.buffers.color, 0, bytemuck::cast_slice(engine.colors()));
    }

    pub fn render(&mut self, frame_params: &FrameParams) -> Result<(), wgpu::SurfaceError> {
        let uniforms = ParticleUniforms {
            view_proj: self.camera.view_projection().to_cols_array_2d(),
            model: frame_params.model_matrix().to_cols_array_2d(),
            resolution: [self.width as f32, self.height as f32],
            time: frame_params.time,
            mix_factor: frame_params.mix,
            point_scale: POINT_SCALE,
            pulse: frame_params.pulse,
            noise_amp: frame_params.noise_amplitude,
            _pad: 0.0,
        };
        self.queue.write_buffer(
            &self.particles.uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particles_pass"),
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
            rpass.set_pipeline(&self.particles.pipeline);
            rpass.set_bind_group(0, &self.particles.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.buffers.start.slice(..));
            rpass.set_vertex_buffer(1, self.buffers.target.slice(..));
            rpass.set_vertex_buffer(2, self.buffers.color.slice(..));
            rpass.set_vertex_buffer(3, self.buffers.size.slice(..));
            rpass.draw(0..6, 0..self.buffers.count);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
