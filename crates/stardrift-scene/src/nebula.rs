//! Nebula planes: large flat translucent quads behind the star cloud,
//! additively blended so their glow brightens rather than occludes.

use bytemuck::{Pod, Zeroable};

use stardrift_config::NebulaPlaneConfig;
use stardrift_render::{BufferAllocator, IndexData, MeshBuffer, VertexPosition};

/// Edge length of a nebula plane in world units.
pub const NEBULA_PLANE_EXTENT: f32 = 200.0;

/// A single nebula plane: static color/opacity/depth plus its current roll.
#[derive(Clone, Debug)]
pub struct NebulaPlane {
    /// Plane color in RGB.
    pub color: [f32; 3],
    /// Plane opacity.
    pub opacity: f32,
    /// Position along the viewing axis.
    pub depth: f32,
    /// Rotation around the viewing axis in radians.
    pub roll: f32,
}

impl NebulaPlane {
    /// Build a plane from its configuration with the given initial roll.
    pub fn from_config(config: &NebulaPlaneConfig, initial_roll: f32) -> Self {
        Self {
            color: config.color_rgb(),
            opacity: config.opacity,
            depth: config.depth,
            roll: initial_roll,
        }
    }

    /// Model matrix: translation along the viewing axis, then roll.
    pub fn model_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_translation(glam::Vec3::new(0.0, 0.0, self.depth))
            * glam::Mat4::from_rotation_z(self.roll)
    }
}

/// Per-plane uniform for the nebula pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct NebulaUniform {
    /// Plane model matrix.
    pub model: [[f32; 4]; 4],
    /// Plane color.
    pub color: [f32; 3],
    /// Plane opacity.
    pub opacity: f32,
}

/// WGSL shader source for the nebula plane pass.
pub const NEBULA_SHADER_SOURCE: &str = r#"
struct NebulaUniform {
    model: mat4x4<f32>,
    color: vec3<f32>,
    opacity: f32,
};

@group(0) @binding(0)
var<uniform> camera: mat4x4<f32>;

@group(1) @binding(0)
var<uniform> nebula: NebulaUniform;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_nebula(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera * nebula.model * vec4<f32>(position, 1.0);
    return out;
}

@fragment
fn fs_nebula(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(nebula.color, nebula.opacity);
}
"#;

/// GPU renderer for a fixed set of nebula planes sharing one quad mesh.
pub struct NebulaPlaneRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_mesh: MeshBuffer,
    uniform_buffers: Vec<wgpu::Buffer>,
    uniform_bind_groups: Vec<wgpu::BindGroup>,
    /// Camera bind group layout (group 0), exposed so the owner can bind a
    /// shared camera buffer.
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
}

impl NebulaPlaneRenderer {
    /// Create a renderer with one uniform slot per plane.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, planes: &[NebulaPlane]) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("nebula-shader"),
            source: wgpu::ShaderSource::Wgsl(NEBULA_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("nebula-camera-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(64),
                    },
                    count: None,
                }],
            });

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nebula-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<NebulaUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("nebula-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &uniform_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("nebula-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_nebula"),
                buffers: &[VertexPosition::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_nebula"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        // Shared quad centered at the origin in the XY plane.
        let half = NEBULA_PLANE_EXTENT * 0.5;
        let vertices = [
            VertexPosition {
                position: [-half, -half, 0.0],
            },
            VertexPosition {
                position: [half, -half, 0.0],
            },
            VertexPosition {
                position: [half, half, 0.0],
            },
            VertexPosition {
                position: [-half, half, 0.0],
            },
        ];
        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];

        let allocator = BufferAllocator::new(device);
        let quad_mesh = allocator.create_mesh(
            "nebula-quad",
            bytemuck::cast_slice(&vertices),
            IndexData::U16(&indices),
        );

        let mut uniform_buffers = Vec::with_capacity(planes.len());
        let mut uniform_bind_groups = Vec::with_capacity(planes.len());
        for (i, plane) in planes.iter().enumerate() {
            let uniform = NebulaUniform {
                model: plane.model_matrix().to_cols_array_2d(),
                color: plane.color,
                opacity: plane.opacity,
            };
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("nebula-{i}-uniform")),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("nebula-{i}-bind-group")),
                layout: &uniform_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            uniform_buffers.push(buffer);
            uniform_bind_groups.push(bind_group);
        }

        log::debug!("Nebula renderer initialized: {} planes", planes.len());

        Self {
            pipeline,
            quad_mesh,
            uniform_buffers,
            uniform_bind_groups,
            camera_bind_group_layout,
        }
    }

    /// Upload the uniform for one plane slot.
    pub fn update_plane(&self, queue: &wgpu::Queue, index: usize, plane: &NebulaPlane) {
        let uniform = NebulaUniform {
            model: plane.model_matrix().to_cols_array_2d(),
            color: plane.color,
            opacity: plane.opacity,
        };
        queue.write_buffer(&self.uniform_buffers[index], 0, bytemuck::bytes_of(&uniform));
    }

    /// Record all plane draws into a render pass.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        self.quad_mesh.bind(render_pass);
        for bind_group in &self.uniform_bind_groups {
            render_pass.set_bind_group(1, bind_group, &[]);
            self.quad_mesh.draw(render_pass);
        }
    }

    /// Number of plane slots.
    pub fn plane_count(&self) -> usize {
        self.uniform_bind_groups.len()
    }
}
