use crate::mesh::{Vertex, unit_cube};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use cubeview_render::{RenderError, RenderStatus, Renderer};
use cubeview_scene::{PerspectiveCamera, Scene};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Directional lights the shader evaluates; further lights are ignored.
pub const MAX_LIGHTS: usize = 4;

const INITIAL_INSTANCES: u32 = 64;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_count: [u32; 4],
    light_dir: [[f32; 4]; MAX_LIGHTS],
    light_color: [[f32; 4]; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    /// Specular color in rgb, shininess in a.
    specular: [f32; 4],
}

fn build_uniforms(scene: &Scene, camera: &PerspectiveCamera) -> Uniforms {
    let mut uniforms = Uniforms {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_pos: camera.position.extend(1.0).to_array(),
        ..Zeroable::zeroed()
    };

    let mut count = 0;
    for light in scene.lights().take(MAX_LIGHTS) {
        let [r, g, b] = light.color.to_linear();
        uniforms.light_dir[count] = light.direction().extend(0.0).to_array();
        uniforms.light_color[count] = [
            r * light.intensity,
            g * light.intensity,
            b * light.intensity,
            1.0,
        ];
        count += 1;
    }
    uniforms.light_count[0] = count as u32;
    uniforms
}

fn build_instances(scene: &Scene) -> Vec<InstanceData> {
    scene
        .meshes()
        .map(|mesh| {
            let cols = mesh.world_matrix().to_cols_array_2d();
            let [r, g, b] = mesh.material.color.to_linear();
            let [sr, sg, sb] = mesh.material.specular.to_linear();
            InstanceData {
                model_0: cols[0],
                model_1: cols[1],
                model_2: cols[2],
                model_3: cols[3],
                color: [r, g, b, 1.0],
                specular: [sr, sg, sb, mesh.material.shininess],
            }
        })
        .collect()
}

/// Map a failed frame acquisition to a skipped frame or a render error.
///
/// Lost and outdated surfaces are reconfigured by the caller and retried on
/// the next frame; a timeout is retried as is.
fn acquire_failure(err: wgpu::SurfaceError) -> Result<RenderStatus, RenderError> {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            tracing::debug!("surface lost or outdated, frame skipped");
            Ok(RenderStatus::Skipped)
        }
        wgpu::SurfaceError::Timeout => {
            tracing::warn!("surface frame acquisition timed out, frame skipped");
            Ok(RenderStatus::Skipped)
        }
        e => Err(RenderError::Frame(e.to_string())),
    }
}

/// Clamp a requested surface size into what the device can allocate.
fn surface_extent((width, height): (u32, u32), max: u32) -> (u32, u32) {
    (width.clamp(1, max), height.clamp(1, max))
}

/// wgpu renderer bound to one drawing surface.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    adapter_info: wgpu::AdapterInfo,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    depth_texture: wgpu::TextureView,
    size: (u32, u32),
    pixel_ratio: f64,
    physical_size: Option<(u32, u32)>,
}

impl WgpuRenderer {
    /// Create a renderer drawing into `target`, initially `width` x `height`
    /// pixels at a pixel ratio of 1.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubeview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                ..Zeroable::zeroed()
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (cube_verts, cube_indices) = unit_cube();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let cube_index_count = cube_indices.len() as u32;

        let instance_buffer = Self::create_instance_buffer(&device, INITIAL_INSTANCES);
        let depth_texture = Self::create_depth_texture(&device, config.width, config.height);

        let adapter_info = adapter.get_info();
        tracing::info!(
            backend = adapter_info.backend.to_str(),
            adapter = %adapter_info.name,
            format = ?surface_format,
            "wgpu renderer initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            size: (config.width, config.height),
            config,
            adapter_info,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCES,
            depth_texture,
            pixel_ratio: 1.0,
            physical_size: None,
        })
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Size the surface from the window's physical pixel size.
    ///
    /// Once set, this takes precedence over logical size times pixel ratio,
    /// which can be a pixel off on fractional scale factors.
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        self.physical_size = Some((width, height));
        self.reconfigure();
    }

    /// Reconfigure the surface if the drawing buffer size changed.
    fn reconfigure(&mut self) {
        let max = self.device.limits().max_texture_dimension_2d;
        let (width, height) = surface_extent(self.drawing_buffer_size(), max);
        if width == self.config.width && height == self.config.height {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Self::create_depth_texture(&self.device, width, height);
        tracing::debug!(width, height, "surface reconfigured");
    }

    fn ensure_instance_capacity(&mut self, needed: u32) {
        if needed <= self.instance_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        self.instance_buffer = Self::create_instance_buffer(&self.device, capacity);
        self.instance_capacity = capacity;
        tracing::debug!(capacity, "instance buffer grown");
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (capacity as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl Renderer for WgpuRenderer {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
        self.reconfigure();
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.reconfigure();
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.physical_size.unwrap_or_else(|| {
            let ratio = self.pixel_ratio;
            (
                (self.size.0 as f64 * ratio).round() as u32,
                (self.size.1 as f64 * ratio).round() as u32,
            )
        })
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<RenderStatus, RenderError> {
        if camera.is_projection_stale() {
            return Err(RenderError::StaleProjection {
                aspect: camera.aspect,
            });
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                if matches!(e, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.surface.configure(&self.device, &self.config);
                }
                return acquire_failure(e);
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&build_uniforms(scene, camera)),
        );

        let instances = build_instances(scene);
        self.ensure_instance_capacity(instances.len() as u32);
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let [r, g, b] = scene.background().to_linear();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if !instances.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.cube_index_count, 0, 0..instances.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(RenderStatus::Presented)
    }
}
