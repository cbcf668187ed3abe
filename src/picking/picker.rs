//! The two-pass GPU picker.

use glam::{Mat4, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use super::decode::{decode_depth, decode_id, encode_id_color};
use super::id_alloc::PickIdAllocator;
use super::mesh_cache::MeshCache;
use super::result::PickResult;
use super::unproject::PickRay;
use crate::camera::core::{Camera, CameraUniform};
use crate::error::StagehandError;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::readback::read_pixel;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::scene::{NodeId, Scene};

/// Default minimum interval between picks. Cursor movement arrives faster
/// than picks are useful; anything inside this window is skipped.
pub const PICK_THROTTLE: Duration = Duration::from_millis(10);

/// Per-object uniform data, written at a 256-byte stride so each draw can
/// bind it with a dynamic offset.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

const OBJECT_STRIDE: usize = 256;

/// What a hit on part of a composite object selects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectMode {
    /// Walk up to the nearest composite root: clicking a wheel selects
    /// the car.
    #[default]
    Whole,
    /// Select exactly the node that was hit.
    Part,
}

/// Renders the scene into offscreen id and depth targets and reads back
/// the texel under the cursor to identify the hovered object and its
/// world position.
///
/// The picker is idle until a cursor position is armed with
/// [`GpuPicker::set_cursor`]; each call to [`GpuPicker::pick`] then runs
/// at most one pick, rate-limited by the throttle interval.
pub struct GpuPicker {
    enabled: bool,
    select_mode: SelectMode,
    cursor: Option<(u32, u32)>,
    throttle: Duration,
    last_pick_time: Option<Instant>,

    width: u32,
    height: u32,

    id_pipeline: wgpu::RenderPipeline,
    depth_pipeline: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    object_buffer: DynamicBuffer,
    object_bind_group: wgpu::BindGroup,

    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    staging_buffer: wgpu::Buffer,

    allocator: PickIdAllocator,
    mesh_cache: MeshCache,
}

impl GpuPicker {
    /// Create a picker with targets sized to the context.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::Shader`] if either pick shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, StagehandError> {
        let device = &context.device;
        let (width, height) = (context.width, context.height);

        let camera_bind_group_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Pick Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let object_bind_group_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Pick Object Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ObjectUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            },
        );

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Pick Camera Bind Group"),
                layout: &camera_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let object_buffer = DynamicBuffer::new(
            device,
            "Pick Object Buffer",
            OBJECT_STRIDE * 64,
            wgpu::BufferUsages::UNIFORM,
        );
        let object_bind_group = create_object_bind_group(
            device,
            &object_bind_group_layout,
            object_buffer.buffer(),
        );

        let id_shader = composer.compose(device, Shader::PickId)?;
        let depth_shader = composer.compose(device, Shader::PickDepth)?;
        let pipeline_layout = device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Pick Pipeline Layout"),
                bind_group_layouts: &[
                    &camera_bind_group_layout,
                    &object_bind_group_layout,
                ],
                push_constant_ranges: &[],
            },
        );
        let id_pipeline = create_pick_pipeline(
            device,
            "Pick Id Pipeline",
            &pipeline_layout,
            &id_shader,
        );
        let depth_pipeline = create_pick_pipeline(
            device,
            "Pick Depth Pipeline",
            &pipeline_layout,
            &depth_shader,
        );

        let (color_texture, color_view) =
            create_color_texture(device, width, height);
        let (depth_texture, depth_view) =
            create_depth_texture(device, width, height);

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Staging Buffer"),
            size: 256,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            enabled: true,
            select_mode: SelectMode::default(),
            cursor: None,
            throttle: PICK_THROTTLE,
            last_pick_time: None,
            width,
            height,
            id_pipeline,
            depth_pipeline,
            camera_buffer,
            camera_bind_group,
            object_bind_group_layout,
            object_buffer,
            object_bind_group,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            staging_buffer,
            allocator: PickIdAllocator::new(),
            mesh_cache: MeshCache::new(),
        })
    }

    /// Enable or disable picking entirely. A disabled picker never runs a
    /// pass.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether picking is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether hits resolve to composite roots or exact nodes.
    pub fn set_select_mode(&mut self, mode: SelectMode) {
        self.select_mode = mode;
    }

    /// Current selection mode.
    #[must_use]
    pub fn select_mode(&self) -> SelectMode {
        self.select_mode
    }

    /// Arm the picker at a cursor position, or disarm it with `None`.
    /// Coordinates are pixels from the top-left of the viewport.
    pub fn set_cursor(&mut self, cursor: Option<(u32, u32)>) {
        self.cursor = cursor;
    }

    /// Override the minimum interval between picks.
    pub fn set_throttle(&mut self, throttle: Duration) {
        self.throttle = throttle;
    }

    /// Resize the offscreen targets. No-op if the size is unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width == self.width && height == self.height)
            || width == 0
            || height == 0
        {
            return;
        }
        self.width = width;
        self.height = height;
        let (color_texture, color_view) =
            create_color_texture(device, width, height);
        self.color_texture = color_texture;
        self.color_view = color_view;
        let (depth_texture, depth_view) =
            create_depth_texture(device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Run one pick at the armed cursor position.
    ///
    /// Returns `Ok(None)` without touching the GPU when the picker is
    /// disarmed or inside the throttle window. A disabled picker reports
    /// the ground-plane miss for the armed cursor without rendering.
    /// Otherwise returns a [`PickResult`]: a hit carries the node and its
    /// surface point, a miss carries the ground plane fallback position.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::Readback`] if a staging buffer map fails.
    pub fn pick(
        &mut self,
        context: &RenderContext,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<Option<PickResult>, StagehandError> {
        let Some(cursor) = self.cursor else {
            return Ok(None);
        };
        if self
            .last_pick_time
            .is_some_and(|t| t.elapsed() < self.throttle)
        {
            return Ok(None);
        }
        self.last_pick_time = Some(Instant::now());

        let ray = PickRay::from_camera(camera, cursor, (self.width, self.height));

        // disabled picking still reports the ground-plane point under the
        // cursor, it just never touches the GPU
        if !self.enabled {
            return Ok(Some(Self::miss_result(&ray)));
        }

        // visible meshes only; hidden subtrees never contribute pick ids
        let mut items: Vec<(NodeId, Mat4, u32)> = Vec::new();
        for (id, node) in scene.iter() {
            if node.mesh.is_none() || !scene.is_effectively_visible(id) {
                continue;
            }
            let pick_id = self.allocator.id_for(id);
            items.push((id, scene.world_matrix(id), pick_id));
        }

        if items.is_empty() {
            return Ok(Some(Self::miss_result(&ray)));
        }

        self.upload_uniforms(context, camera, &items, scene);

        let pixel = self.render_and_read(context, &self.id_pipeline, &items, cursor)?;
        let picked = self.allocator.resolve(decode_id(pixel));
        let Some(hit_node) = picked else {
            log::trace!("pick at {cursor:?}: background");
            return Ok(Some(Self::miss_result(&ray)));
        };

        let pixel =
            self.render_and_read(context, &self.depth_pipeline, &items, cursor)?;
        let view_z = decode_depth(pixel, camera.far());
        let result = Self::resolve_hit(hit_node, view_z, &ray);

        let result = match (result.node, self.select_mode) {
            (Some(node), SelectMode::Whole) => PickResult {
                node: Some(scene.composite_root_of(node)),
                ..result
            },
            _ => result,
        };

        log::trace!("pick at {cursor:?}: {result:?}");
        Ok(Some(result))
    }

    /// Drop pick ids and cached meshes for nodes no longer in the scene.
    pub fn prune(&mut self, scene: &Scene) {
        self.allocator.retain(|node| scene.node(node).is_some());
        self.mesh_cache.retain(|node| scene.node(node).is_some());
    }

    fn miss_result(ray: &PickRay) -> PickResult {
        PickResult::miss(ray.ground_plane_point().unwrap_or(Vec3::ZERO))
    }

    /// Combine the id-pass hit with the decoded depth texel. An empty
    /// depth pixel keeps the hit; the ground-plane point stands in for
    /// the surface point and the distance reads zero, as for a miss.
    fn resolve_hit(
        hit_node: NodeId,
        view_z: Option<f32>,
        ray: &PickRay,
    ) -> PickResult {
        match view_z {
            Some(view_z) => {
                let point = ray.world_point_at_view_z(view_z);
                PickResult::hit(hit_node, point, view_z.abs())
            }
            None => PickResult {
                node: Some(hit_node),
                ..Self::miss_result(ray)
            },
        }
    }

    fn upload_uniforms(
        &mut self,
        context: &RenderContext,
        camera: &Camera,
        items: &[(NodeId, Mat4, u32)],
        scene: &Scene,
    ) {
        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
        );

        let mut data = vec![0_u8; items.len() * OBJECT_STRIDE];
        for (slot, &(_, model, pick_id)) in items.iter().enumerate() {
            let uniform = ObjectUniform {
                model: model.to_cols_array_2d(),
                color: encode_id_color(pick_id),
            };
            let bytes = bytemuck::bytes_of(&uniform);
            let offset = slot * OBJECT_STRIDE;
            data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        let reallocated = self.object_buffer.write_bytes(
            &context.device,
            &context.queue,
            &data,
        );
        if reallocated {
            self.object_bind_group = create_object_bind_group(
                &context.device,
                &self.object_bind_group_layout,
                self.object_buffer.buffer(),
            );
        }

        for &(node, _, _) in items {
            if let Some(mesh) =
                scene.node(node).and_then(|n| n.mesh.as_ref())
            {
                let _ = self.mesh_cache.ensure(&context.device, node, mesh);
            }
        }
    }

    fn render_and_read(
        &self,
        context: &RenderContext,
        pipeline: &wgpu::RenderPipeline,
        items: &[(NodeId, Mat4, u32)],
        cursor: (u32, u32),
    ) -> Result<[u8; 4], StagehandError> {
        let mut encoder = context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Pick Render Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &self.color_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: 0.0,
                                    g: 0.0,
                                    b: 0.0,
                                    a: 0.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for (slot, &(node, _, _)) in items.iter().enumerate() {
                let Some(mesh) = self.mesh_cache.get(node) else {
                    continue;
                };
                pass.set_bind_group(
                    1,
                    &self.object_bind_group,
                    &[(slot * OBJECT_STRIDE) as u32],
                );
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(
                    mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        let (x, y) = clamp_to_extent(cursor, self.width, self.height);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(256),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        context.submit(encoder);
        read_pixel(&context.device, &self.staging_buffer)
    }
}

/// Clamp a cursor position into the target's pixel bounds. Saturates so
/// a zero-sized target maps everything to (0, 0).
fn clamp_to_extent(
    cursor: (u32, u32),
    width: u32,
    height: u32,
) -> (u32, u32) {
    (
        cursor.0.min(width.saturating_sub(1)),
        cursor.1.min(height.saturating_sub(1)),
    )
}

fn create_object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Pick Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(
                    std::mem::size_of::<ObjectUniform>() as u64,
                ),
            }),
        }],
    })
}

fn create_pick_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                }],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: wgpu::TextureFormat::Rgba8Unorm,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
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
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_color_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick Color Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::camera::core::Projection;

    fn test_ray() -> PickRay {
        let camera = Camera {
            eye: Vec3::new(0.0, 5.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fovy: std::f32::consts::FRAC_PI_4,
                aspect: 1.0,
                znear: 0.1,
                zfar: 100.0,
            },
        };
        PickRay::from_camera(&camera, (128, 128), (256, 256))
    }

    #[test]
    fn object_uniform_fits_its_stride() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
        assert!(std::mem::size_of::<ObjectUniform>() <= OBJECT_STRIDE);
    }

    #[test]
    fn select_mode_defaults_to_whole() {
        assert_eq!(SelectMode::default(), SelectMode::Whole);
    }

    #[test]
    fn depth_pixel_places_hit_on_surface() {
        let ray = test_ray();
        let result = GpuPicker::resolve_hit(NodeId(7), Some(-8.0), &ray);
        assert_eq!(result.node, Some(NodeId(7)));
        assert_eq!(result.distance, 8.0);
    }

    #[test]
    fn empty_depth_pixel_keeps_id_pass_hit() {
        let ray = test_ray();
        let result = GpuPicker::resolve_hit(NodeId(7), None, &ray);
        // the hit survives; only the surface point degrades
        assert_eq!(result.node, Some(NodeId(7)));
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.point, ray.ground_plane_point().unwrap());
    }

    #[test]
    fn readback_clamp_saturates_at_zero_extent() {
        assert_eq!(clamp_to_extent((300, 10), 256, 256), (255, 10));
        assert_eq!(clamp_to_extent((5, 5), 0, 0), (0, 0));
    }
}
