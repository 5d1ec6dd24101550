//! Procedural starfield: deterministic star placement in a cubic volume,
//! rendered as instanced camera-facing point sprites with additive blending.

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use stardrift_render::Camera;

/// Generates a deterministic flat position buffer from a seed.
///
/// Each star contributes three consecutive entries (x, y, z), each sampled
/// uniformly in `[-spread/2, spread/2)`.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    spread: f32,
}

impl StarfieldGenerator {
    /// Create a new generator with the given seed, star count, and cube edge length.
    pub fn new(seed: u64, star_count: u32, spread: f32) -> Self {
        Self {
            seed,
            star_count,
            spread,
        }
    }

    /// Generate the position buffer. Deterministic for a given seed.
    ///
    /// The result has exactly `3 * star_count` entries.
    pub fn generate(&self) -> Vec<f32> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut positions = Vec::with_capacity(self.star_count as usize * 3);

        for _ in 0..self.star_count {
            positions.push((rng.random::<f32>() - 0.5) * self.spread);
            positions.push((rng.random::<f32>() - 0.5) * self.spread);
            positions.push((rng.random::<f32>() - 0.5) * self.spread);
        }

        positions
    }
}

/// Per-frame uniform for the star sprite pipeline.
///
/// `point_scale` is the world-space sprite diameter: a quad expanded to
/// `point_size × tan(fov_y / 2)` units projects to
/// `point_size × (viewport_height / 2) / view_depth` pixels, the classic
/// depth-attenuated point-sprite size.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StarfieldUniform {
    /// Rotation of the star cloud.
    pub model: [[f32; 4]; 4],
    /// Camera right vector in world space (billboard basis).
    pub camera_right: [f32; 3],
    /// World-space sprite diameter.
    pub point_scale: f32,
    /// Camera up vector in world space (billboard basis).
    pub camera_up: [f32; 3],
    /// Sprite opacity.
    pub opacity: f32,
    /// Sprite color.
    pub color: [f32; 3],
    /// Padding for 16-byte alignment.
    pub _padding: f32,
}

/// WGSL shader source for the star sprite pass.
pub const STARFIELD_SHADER_SOURCE: &str = r#"
struct StarfieldUniform {
    model: mat4x4<f32>,
    camera_right: vec3<f32>,
    point_scale: f32,
    camera_up: vec3<f32>,
    opacity: f32,
    color: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> camera: mat4x4<f32>;

@group(1) @binding(0)
var<uniform> stars: StarfieldUniform;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_star(
    @builtin(vertex_index) idx: u32,
    @location(0) star_position: vec3<f32>,
) -> VertexOutput {
    // Quad corners from the vertex index (triangle strip order).
    let corner = vec2<f32>(
        f32(idx & 1u) * 2.0 - 1.0,
        f32(idx >> 1u) * 2.0 - 1.0,
    );

    var world = (stars.model * vec4<f32>(star_position, 1.0)).xyz;
    let half_extent = stars.point_scale * 0.5;
    world += (stars.camera_right * corner.x + stars.camera_up * corner.y) * half_extent;

    var out: VertexOutput;
    out.clip_position = camera * vec4<f32>(world, 1.0);
    return out;
}

@fragment
fn fs_star(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(stars.color, stars.opacity);
}
"#;

/// GPU starfield renderer: one camera-facing quad per star, additively blended.
pub struct StarfieldRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    star_count: u32,
    point_size: f32,
    opacity: f32,
    /// Camera bind group layout (group 0), exposed so the owner can bind a
    /// shared camera buffer.
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
}

impl StarfieldRenderer {
    /// Create a new starfield renderer, uploading the position buffer to the GPU.
    ///
    /// `positions` is the flat buffer produced by [`StarfieldGenerator::generate`].
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        positions: &[f32],
        point_size: f32,
        opacity: f32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        debug_assert!(positions.len().is_multiple_of(3));
        let star_count = (positions.len() / 3) as u32;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfield-shader"),
            source: wgpu::ShaderSource::Wgsl(STARFIELD_SHADER_SOURCE.into()),
        });

        // Camera bind group layout (group 0): view-projection matrix
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("starfield-camera-bgl"),
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

        // Star uniform bind group layout (group 1)
        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("starfield-uniform-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<StarfieldUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("starfield-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &uniform_bgl],
            immediate_size: 0,
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 3) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("starfield-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[instance_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None, // backdrop pass has no depth attachment
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Additive: overlapping sprites brighten rather than occlude.
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

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("starfield-instances"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform = StarfieldUniform {
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            camera_right: [1.0, 0.0, 0.0],
            point_scale: point_size,
            camera_up: [0.0, 1.0, 0.0],
            opacity,
            color: [1.0, 1.0, 1.0],
            _padding: 0.0,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("starfield-uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("starfield-uniform-bind-group"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::debug!("Starfield renderer initialized: {star_count} stars");

        Self {
            pipeline,
            instance_buffer,
            uniform_buffer,
            uniform_bind_group,
            star_count,
            point_size,
            opacity,
            camera_bind_group_layout,
        }
    }

    /// Upload the per-frame uniform: cloud rotation plus billboard basis
    /// derived from the camera.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, rotation: glam::Quat) {
        let right = camera.right();
        let up = camera.up();
        let uniform = StarfieldUniform {
            model: glam::Mat4::from_quat(rotation).to_cols_array_2d(),
            camera_right: [right.x, right.y, right.z],
            point_scale: self.point_size * (camera.fov_y * 0.5).tan(),
            camera_up: [up.x, up.y, up.z],
            opacity: self.opacity,
            color: [1.0, 1.0, 1.0],
            _padding: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the starfield draw into a render pass.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        render_pass.draw(0..4, 0..self.star_count);
    }

    /// Number of stars drawn per frame.
    pub fn star_count(&self) -> u32 {
        self.star_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_has_three_entries_per_star() {
        for count in [0u32, 1, 7, 4200] {
            let generator = StarfieldGenerator::new(42, count, 320.0);
            let positions = generator.generate();
            assert_eq!(positions.len(), count as usize * 3);
        }
    }

    #[test]
    fn test_positions_within_half_spread() {
        let generator = StarfieldGenerator::new(42, 4200, 320.0);
        let positions = generator.generate();
        for (i, &v) in positions.iter().enumerate() {
            assert!(
                (-160.0..160.0).contains(&v),
                "Coordinate {i} = {v} outside [-160, 160)"
            );
        }
    }

    #[test]
    fn test_same_seed_produces_same_positions() {
        let gen_a = StarfieldGenerator::new(123, 1000, 320.0);
        let gen_b = StarfieldGenerator::new(123, 1000, 320.0);
        assert_eq!(gen_a.generate(), gen_b.generate());
    }

    #[test]
    fn test_different_seed_produces_different_positions() {
        let pos_a = StarfieldGenerator::new(1, 1000, 320.0).generate();
        let pos_b = StarfieldGenerator::new(9999, 1000, 320.0).generate();

        let differences = pos_a
            .iter()
            .zip(pos_b.iter())
            .filter(|(a, b)| (**a - **b).abs() > 0.01)
            .count();
        assert!(
            differences > 1500,
            "Expected most coordinates to differ between seeds, only {differences}/3000 differed"
        );
    }

    #[test]
    fn test_distribution_covers_all_octants() {
        let positions = StarfieldGenerator::new(42, 4200, 320.0).generate();
        let mut octant_counts = [0u32; 8];

        for star in positions.chunks_exact(3) {
            let octant = ((star[0] >= 0.0) as usize)
                | (((star[1] >= 0.0) as usize) << 1)
                | (((star[2] >= 0.0) as usize) << 2);
            octant_counts[octant] += 1;
        }

        for (i, &count) in octant_counts.iter().enumerate() {
            assert!(
                (300..=800).contains(&count),
                "Octant {i} has {count} stars, expected roughly 525 (range 300-800)"
            );
        }
    }

    #[test]
    fn test_spread_scales_coordinates() {
        let positions = StarfieldGenerator::new(7, 500, 10.0).generate();
        for &v in &positions {
            assert!((-5.0..5.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_size_and_alignment() {
        // mat4 (64) + three vec4-aligned blocks (48) = 112 bytes.
        assert_eq!(std::mem::size_of::<StarfieldUniform>(), 112);
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(STARFIELD_SHADER_SOURCE.contains("fn vs_star"));
        assert!(STARFIELD_SHADER_SOURCE.contains("fn fs_star"));
    }
}
