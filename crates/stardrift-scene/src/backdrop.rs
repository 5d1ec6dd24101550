//! The assembled backdrop: camera, star cloud, and nebula planes, owned as a
//! single scene for the lifetime of the process.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use stardrift_config::{BackdropConfig, CameraConfig};
use stardrift_render::Camera;

use crate::nebula::{NebulaPlane, NebulaPlaneRenderer};
use crate::starfield::{StarfieldGenerator, StarfieldRenderer};
use crate::state::{SceneState, camera_depth};

/// The complete backdrop scene graph plus its GPU resources.
pub struct SpaceBackdrop {
    state: SceneState,
    camera: Camera,
    camera_config: CameraConfig,
    primary: NebulaPlane,
    secondary: NebulaPlane,
    starfield: StarfieldRenderer,
    nebulae: NebulaPlaneRenderer,
    camera_buffer: wgpu::Buffer,
    star_camera_bind_group: wgpu::BindGroup,
    nebula_camera_bind_group: wgpu::BindGroup,
}

impl SpaceBackdrop {
    /// Build the full scene: generate star positions, create both renderers,
    /// and place the camera at its resting depth.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &BackdropConfig,
        aspect_ratio: f32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let seed = config.seed.unwrap_or_else(rand::random);
        let positions =
            StarfieldGenerator::new(seed, config.star_count, config.star_spread).generate();
        let starfield = StarfieldRenderer::new(
            device,
            surface_format,
            &positions,
            config.star_point_size,
            config.star_opacity,
        );

        // The primary plane starts at a random roll; the secondary at zero.
        let mut roll_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
        let primary_initial_roll = roll_rng.random::<f32>() * std::f32::consts::PI;

        let state = SceneState::new(primary_initial_roll);
        let primary = NebulaPlane::from_config(&config.nebula_primary, state.primary_roll);
        let secondary = NebulaPlane::from_config(&config.nebula_secondary, state.secondary_roll);
        let nebulae = NebulaPlaneRenderer::new(
            device,
            surface_format,
            &[primary.clone(), secondary.clone()],
        );

        let camera_config = config.camera.clone();
        let camera = Camera {
            position: glam::Vec3::new(0.0, 0.0, camera_config.base_depth),
            rotation: glam::Quat::IDENTITY,
            fov_y: camera_config.fov_y_degrees.to_radians(),
            aspect_ratio,
            near: camera_config.near,
            far: camera_config.far,
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop-camera-uniform"),
            contents: bytemuck::cast_slice(&[camera.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let star_camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop-star-camera-bind-group"),
            layout: &starfield.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let nebula_camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop-nebula-camera-bind-group"),
            layout: &nebulae.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "Backdrop initialized: {} stars (seed {seed}), {} nebula planes",
            starfield.star_count(),
            nebulae.plane_count(),
        );

        Self {
            state,
            camera,
            camera_config,
            primary,
            secondary,
            starfield,
            nebulae,
            camera_buffer,
            star_camera_bind_group,
            nebula_camera_bind_group,
        }
    }

    /// Update the camera aspect ratio after a surface resize. This is the only
    /// place the aspect ratio changes.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_aspect_ratio(width, height);
    }

    /// Advance the animation by one frame and upload all per-frame uniforms.
    ///
    /// `elapsed_ms` is wall-clock time since the loop started; it drives the
    /// camera oscillation only.
    pub fn advance_and_upload(&mut self, queue: &wgpu::Queue, elapsed_ms: f64) {
        self.state.advance_frame();
        self.primary.roll = self.state.primary_roll;
        self.secondary.roll = self.state.secondary_roll;

        self.camera.position.z = camera_depth(&self.camera_config, elapsed_ms);

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.to_uniform()]),
        );
        self.starfield
            .update(queue, &self.camera, self.state.star_rotation());
        self.nebulae.update_plane(queue, 0, &self.primary);
        self.nebulae.update_plane(queue, 1, &self.secondary);
    }

    /// Record the backdrop draws: nebula planes behind, stars in front.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        self.nebulae
            .draw(render_pass, &self.nebula_camera_bind_group);
        self.starfield
            .draw(render_pass, &self.star_camera_bind_group);
    }

    /// The pure animation state.
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// The scene camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}
