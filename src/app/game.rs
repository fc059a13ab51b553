use std::sync::Arc;
use std::time::Instant;

use cgmath::Point3;
use rand::Rng;
use tracing::{info, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window};

use blockwork::config::{self, EngineSettings, GraphicsSettings};
use blockwork::constants::TEXTURE_SIZE;
use blockwork::core::{Uniforms, Vertex};
use blockwork::player::{Camera, InputState};
use blockwork::render::renderer::ChunkRenderer;
use blockwork::render::bridge::MeshLayer;
use blockwork::render::{generate_texture_atlas, load_texture_atlas_from_file};
use blockwork::world::World;

const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 185.0 / 255.0,
    g: 233.0 / 255.0,
    b: 250.0 / 255.0,
    a: 1.0,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct GameState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    terrain_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    uniforms: Uniforms,
    renderer: ChunkRenderer,
    world: World,
    camera: Camera,
    input: InputState,
    cursor_grabbed: bool,
    start: Instant,
    last_frame: Instant,
}

impl GameState {
    pub fn new(window: Arc<Window>) -> Self {
        let settings = config::load_settings(config::DEFAULT_SETTINGS_FILE);
        let seed = settings
            .world
            .seed
            .unwrap_or_else(|| rand::rng().random());
        info!(seed, "world seed");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .expect("failed to create surface");
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            ..Default::default()
        }))
        .expect("no suitable GPU adapter");
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("blockwork device"),
            ..Default::default()
        }))
        .expect("failed to create GPU device");

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if settings.graphics.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        let (atlas_data, tile_size) = match load_texture_atlas_from_file("assets/atlas.png") {
            Ok((data, tile)) => {
                info!("loaded texture atlas from assets/atlas.png");
                (data, tile)
            }
            Err(e) => {
                info!("using procedural texture atlas ({e})");
                (generate_texture_atlas(), TEXTURE_SIZE)
            }
        };
        let (atlas_view, sampler) = upload_atlas(&device, &queue, &atlas_data, tile_size);

        let uniforms = Uniforms::new();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("chunk pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let terrain_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/terrain.wgsl"));
        let water_shader = device.create_shader_module(wgpu::include_wgsl!("shaders/water.wgsl"));

        let terrain_pipeline = create_chunk_pipeline(
            &device,
            &pipeline_layout,
            &terrain_shader,
            format,
            wgpu::BlendState::REPLACE,
            true,
        );
        let water_pipeline = create_chunk_pipeline(
            &device,
            &pipeline_layout,
            &water_shader,
            format,
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        let renderer = ChunkRenderer::new(device.clone());
        let world = World::new(settings.world.clone(), seed);

        let ground = world.generator().surface_height(0, 0);
        let spawn_y = ground.max(settings.world.sea_level) as f32 + 12.0;
        let mut camera = Camera::new(Point3::new(0.5, spawn_y, 0.5), settings.graphics.fov);
        camera.move_speed = settings.graphics.move_speed;
        camera.sensitivity = settings.graphics.mouse_sensitivity;

        let now = Instant::now();
        GameState {
            window,
            surface,
            device,
            queue,
            surface_config,
            depth_view,
            terrain_pipeline,
            water_pipeline,
            bind_group,
            uniform_buffer,
            uniforms,
            renderer,
            world,
            camera,
            input: InputState::default(),
            cursor_grabbed: false,
            start: now,
            last_frame: now,
        }
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        let pressed = event.state == ElementState::Pressed;
        match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW) => self.input.forward = pressed,
            PhysicalKey::Code(KeyCode::KeyS) => self.input.backward = pressed,
            PhysicalKey::Code(KeyCode::KeyA) => self.input.left = pressed,
            PhysicalKey::Code(KeyCode::KeyD) => self.input.right = pressed,
            PhysicalKey::Code(KeyCode::Space) => self.input.up = pressed,
            PhysicalKey::Code(KeyCode::ShiftLeft) => self.input.down = pressed,
            PhysicalKey::Code(KeyCode::Escape) if pressed => self.release_cursor(),
            _ => {}
        }
    }

    pub fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if state == ElementState::Pressed && button == MouseButton::Left && !self.cursor_grabbed {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            match grabbed {
                Ok(()) => {
                    self.window.set_cursor_visible(false);
                    self.cursor_grabbed = true;
                }
                Err(e) => warn!("failed to grab cursor: {e}"),
            }
        }
    }

    fn release_cursor(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.cursor_grabbed = false;
    }

    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.cursor_grabbed {
            self.camera.turn(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn update_and_render(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        self.camera.update(&self.input, dt);
        self.world.update_state(self.camera.position);
        self.world.apply_updates(&mut self.renderer);

        self.render_frame();
    }

    fn render_frame(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => return,
            Err(e) => panic!("failed to acquire frame: {e}"),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.surface_config.width as f32 / self.surface_config.height as f32;
        let view_proj = self.camera.projection_matrix(aspect) * self.camera.view_matrix();
        self.uniforms.update(
            view_proj,
            self.camera.position,
            self.start.elapsed().as_secs_f32(),
        );
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        self.world.render(&mut self.renderer, &self.camera);
        let commands = self.renderer.take_commands();
        let instance_buffer = self.renderer.build_instance_buffer(&commands);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("chunk pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.bind_group, &[]);

            if let Some(instances) = instance_buffer.as_ref() {
                let stride = std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress;
                let mut current_layer = None;
                for (i, cmd) in commands.iter().enumerate() {
                    let Some(mesh) = self.renderer.mesh(cmd.handle) else {
                        continue;
                    };
                    if current_layer != Some(cmd.layer) {
                        let pipeline = match cmd.layer {
                            MeshLayer::Water => &self.water_pipeline,
                            MeshLayer::Solid | MeshLayer::Flora => &self.terrain_pipeline,
                        };
                        pass.set_pipeline(pipeline);
                        current_layer = Some(cmd.layer);
                    }
                    pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                    pass.set_vertex_buffer(1, instances.slice(i as wgpu::BufferAddress * stride..));
                    pass.draw(0..mesh.vertex_count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    pub fn shutdown(&mut self) {
        info!("shutting down, tearing down the world");
        self.world.delete_all(&mut self.renderer);
        config::save_settings(
            config::DEFAULT_SETTINGS_FILE,
            &EngineSettings {
                world: self.world.config().clone(),
                graphics: GraphicsSettings {
                    fov: self.camera.fov,
                    vsync: self.surface_config.present_mode != wgpu::PresentMode::AutoNoVsync,
                    mouse_sensitivity: self.camera.sensitivity,
                    move_speed: self.camera.move_speed,
                },
            },
        );
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_atlas(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &[u8],
    tile_size: u32,
) -> (wgpu::TextureView, wgpu::Sampler) {
    let layers = data.len() as u32 / (tile_size * tile_size * 4);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("texture atlas"),
        size: wgpu::Extent3d {
            width: tile_size,
            height: tile_size,
            depth_or_array_layers: layers,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(tile_size * 4),
            rows_per_image: Some(tile_size),
        },
        wgpu::Extent3d {
            width: tile_size,
            height: tile_size,
            depth_or_array_layers: layers,
        },
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        dimension: Some(wgpu::TextureViewDimension::D2Array),
        ..Default::default()
    });
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("atlas sampler"),
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });
    (view, sampler)
}

fn create_chunk_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("chunk pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::desc(), ChunkRenderer::instance_desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
