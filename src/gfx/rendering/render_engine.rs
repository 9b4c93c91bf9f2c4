//! wgpu backend that replays a recorded [`RenderState`].
//!
//! Per frame the engine uploads meshes and textures it has not seen yet,
//! writes the scene uniform (camera, lighting terms, light slots) and one
//! object uniform per draw command, then issues the draws in recording
//! order.
//!
//! Bind groups:
//! - group 0: [`SceneUniform`]
//! - group 1: [`ObjectUniform`], dynamic offset per draw
//! - group 2: texture and sampler, a 1x1 white texture when nothing is bound

use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::Zeroable;
use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use super::facade::MAX_LIGHTS;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::render_state::{DrawCommand, RenderState};
use crate::error::RenderError;
use crate::gfx::resources::{
    DepthBuffer, LightUniform, MaterialUniform, TextureImage, TextureResource, TextureUnit,
};
use crate::math::{ColorType, OPENGL_TO_WGPU_MATRIX};
use crate::wgpu_utils::{binding_types, UniformBuffer};

const SCENE_PIPELINE: &str = "Scene";

/// Per-frame uniform data: camera, lighting terms and every light slot.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    /// ambient, diffuse, specular, normal mapping
    pub terms: [u32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

/// Per-draw uniform data.
///
/// `flags.x` holds the routing bits and `flags.y` whether a texture is bound.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub material: MaterialUniform,
    pub flags: [u32; 4],
}

impl SceneUniform {
    pub fn from_state(state: &RenderState) -> Self {
        let view_proj = OPENGL_TO_WGPU_MATRIX * state.projection() * state.view();
        let eye = state.eye();
        let terms = state.lighting_terms();
        let mut lights = [LightUniform::zeroed(); MAX_LIGHTS];
        for (slot, light) in lights.iter_mut().zip(state.lights()) {
            *slot = light.to_uniform();
        }
        Self {
            view_proj: view_proj.into(),
            view_position: [eye.x, eye.y, eye.z, 1.0],
            terms: [
                terms.ambient as u32,
                terms.diffuse as u32,
                terms.specular as u32,
                terms.normal_mapping as u32,
            ],
            lights,
        }
    }
}

impl ObjectUniform {
    pub fn from_command(command: &DrawCommand) -> Self {
        Self {
            model: command.model.into(),
            normal_matrix: normal_matrix(command.model).into(),
            material: command.material.to_uniform(),
            flags: [command.routing.bits(), command.texture.is_some() as u32, 0, 0],
        }
    }
}

/// Inverse transpose of `model`; singular models fall back to `model`.
fn normal_matrix(model: Matrix4<f32>) -> Matrix4<f32> {
    model.invert().map(|m| m.transpose()).unwrap_or(model)
}

/// Rounds `size` up to a multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_buffer: DepthBuffer,
    pipeline_manager: PipelineManager,

    scene_uniform: UniformBuffer<SceneUniform>,
    scene_bind_group: wgpu::BindGroup,

    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_capacity: usize,
    object_stride: u64,

    texture_layout: wgpu::BindGroupLayout,
    default_texture: wgpu::BindGroup,
    textures: HashMap<TextureUnit, wgpu::BindGroup>,

    // Indexed like RenderState meshes; None for meshes without triangles.
    meshes: Vec<Option<GpuMesh>>,
    // RenderState epoch the mirrored meshes and textures belong to.
    resource_epoch: u64,
}

impl RenderEngine {
    /// Creates a render engine drawing to `window`
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // The shader writes final colors, so prefer a non-sRGB target.
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_buffer = DepthBuffer::new(&device, config.width, config.height);

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[binding_types::entry(0, binding_types::uniform())],
        });
        let scene_uniform = UniformBuffer::<SceneUniform>::new(&device);
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform.binding_resource(),
            }],
        });

        let object_size = std::mem::size_of::<ObjectUniform>() as u64;
        let object_stride = align_to(
            object_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[binding_types::entry(
                0,
                binding_types::dynamic_uniform(object_size),
            )],
        });
        let object_capacity = 64;
        let (object_buffer, object_bind_group) =
            Self::create_object_buffer(&device, &object_layout, object_capacity, object_stride);

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                binding_types::entry(0, binding_types::texture_2d()),
                binding_types::entry(
                    1,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });
        let white = TextureImage::solid(ColorType::WHITE);
        let default_texture =
            Self::create_texture_bind_group(&device, &queue, &texture_layout, &white, "Default");

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        // Open surfaces like the cylinder body are seen from both sides.
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default()
                .with_label("SCENE")
                .with_shader("scene")
                .with_cull_mode(None)
                .with_depth_format(DepthBuffer::FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    scene_layout,
                    object_layout.clone(),
                    texture_layout.clone(),
                ]),
        );
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_buffer,
            pipeline_manager,
            scene_uniform,
            scene_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_capacity,
            object_stride,
            texture_layout,
            default_texture,
            textures: HashMap::new(),
            meshes: Vec::new(),
            resource_epoch: 0,
        })
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &TextureImage,
        label: &str,
    ) -> wgpu::BindGroup {
        let resource = TextureResource::from_image(device, queue, image, label);
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Texture Bind Group", label)),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&resource.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&resource.sampler),
                },
            ],
        })
    }

    /// Uploads meshes and textures added to `state` since the last frame.
    ///
    /// When `state` released its resources the GPU copies are dropped first.
    fn sync_resources(&mut self, state: &RenderState) {
        let released = state.resource_epoch() != self.resource_epoch;
        if released || state.meshes().len() < self.meshes.len() {
            log::debug!(
                "Dropping {} GPU meshes and {} textures",
                self.meshes.len(),
                self.textures.len()
            );
            self.meshes.clear();
            self.textures.clear();
            self.resource_epoch = state.resource_epoch();
        }

        for mesh in &state.meshes()[self.meshes.len()..] {
            let gpu_mesh = if mesh.indices.is_empty() {
                None
            } else {
                let vertices = mesh.to_vertices();
                Some(GpuMesh {
                    vertex_buffer: self.device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some("Mesh Vertex Buffer"),
                            contents: bytemuck::cast_slice(&vertices),
                            usage: wgpu::BufferUsages::VERTEX,
                        },
                    ),
                    index_buffer: self.device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some("Mesh Index Buffer"),
                            contents: bytemuck::cast_slice(&mesh.indices),
                            usage: wgpu::BufferUsages::INDEX,
                        },
                    ),
                    index_count: mesh.indices.len() as u32,
                })
            };
            self.meshes.push(gpu_mesh);
        }

        for command in state.commands() {
            let Some(unit) = command.texture else {
                continue;
            };
            if self.textures.contains_key(&unit) {
                continue;
            }
            match state.texture(&unit) {
                Some(image) => {
                    let bind_group = Self::create_texture_bind_group(
                        &self.device,
                        &self.queue,
                        &self.texture_layout,
                        image,
                        &format!("Unit {}", unit.slot),
                    );
                    log::debug!("Uploaded texture for unit {}", unit.slot);
                    self.textures.insert(unit, bind_group);
                }
                None => log::warn!("No image recorded for texture unit {}", unit.slot),
            }
        }
    }

    /// Writes one object uniform per command, growing the buffer if needed.
    fn write_objects(&mut self, commands: &[DrawCommand]) {
        if commands.len() > self.object_capacity {
            self.object_capacity = commands.len().next_power_of_two();
            let (buffer, bind_group) = Self::create_object_buffer(
                &self.device,
                &self.object_layout,
                self.object_capacity,
                self.object_stride,
            );
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            log::debug!("Object buffer grown to {} entries", self.object_capacity);
        }
        if commands.is_empty() {
            return;
        }

        let stride = self.object_stride as usize;
        let mut bytes = vec![0u8; stride * commands.len()];
        for (chunk, command) in bytes.chunks_exact_mut(stride).zip(commands) {
            let uniform = ObjectUniform::from_command(command);
            let data = bytemuck::bytes_of(&uniform);
            chunk[..data.len()].copy_from_slice(data);
        }
        self.queue.write_buffer(&self.object_buffer, 0, &bytes);
    }

    /// Draws the commands recorded in `state` over a `background` clear.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(
        &mut self,
        state: &RenderState,
        background: ColorType,
    ) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.sync_resources(state);
        self.scene_uniform
            .update_content(&self.queue, SceneUniform::from_state(state));
        self.write_objects(state.commands());
        let pipeline = self.pipeline_manager.get_pipeline(SCENE_PIPELINE)?.clone();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_buffer.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            for (index, command) in state.commands().iter().enumerate() {
                let Some(Some(mesh)) = self.meshes.get(command.mesh.index()) else {
                    continue;
                };
                let texture = command
                    .texture
                    .and_then(|unit| self.textures.get(&unit))
                    .unwrap_or(&self.default_texture);
                let offset = (index as u64 * self.object_stride) as wgpu::DynamicOffset;

                render_pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                render_pass.set_bind_group(2, texture, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_buffer = DepthBuffer::new(&self.device, width, height);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}
