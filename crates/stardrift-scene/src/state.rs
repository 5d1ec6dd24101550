//! Pure per-frame animation state: rotation accumulators for the star cloud
//! and nebula planes, plus the wall-clock camera oscillation.
//!
//! Kept free of GPU types so the animation semantics are testable headless.

use stardrift_config::CameraConfig;

/// Star cloud yaw increment per frame (radians).
pub const STAR_YAW_RATE: f32 = 0.00095;
/// Star cloud pitch increment per frame (radians).
pub const STAR_PITCH_RATE: f32 = 0.0003;
/// Primary nebula roll increment per frame (radians).
pub const PRIMARY_ROLL_RATE: f32 = 0.00012;
/// Secondary nebula roll decrement per frame (radians).
pub const SECONDARY_ROLL_RATE: f32 = 0.00008;

/// Rotation accumulators advanced once per rendered frame.
///
/// All fields accumulate monotonically and are unconstrained floats; angle
/// wraparound is handled naturally by the rotation representation.
#[derive(Clone, Debug)]
pub struct SceneState {
    /// Star cloud rotation around +Y.
    pub star_yaw: f32,
    /// Star cloud rotation around +X.
    pub star_pitch: f32,
    /// Primary nebula rotation around +Z.
    pub primary_roll: f32,
    /// Secondary nebula rotation around +Z.
    pub secondary_roll: f32,
    /// Frames advanced so far.
    pub frame_count: u64,
}

impl SceneState {
    /// Create a fresh state. The primary nebula starts at the given roll;
    /// everything else starts at zero.
    pub fn new(primary_initial_roll: f32) -> Self {
        Self {
            star_yaw: 0.0,
            star_pitch: 0.0,
            primary_roll: primary_initial_roll,
            secondary_roll: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the accumulators by one frame.
    pub fn advance_frame(&mut self) {
        self.star_yaw += STAR_YAW_RATE;
        self.star_pitch += STAR_PITCH_RATE;
        self.primary_roll += PRIMARY_ROLL_RATE;
        self.secondary_roll -= SECONDARY_ROLL_RATE;
        self.frame_count += 1;
    }

    /// Star cloud rotation as a quaternion (pitch about X, then yaw about Y,
    /// composed in intrinsic XYZ order).
    pub fn star_rotation(&self) -> glam::Quat {
        glam::Quat::from_euler(glam::EulerRot::XYZ, self.star_pitch, self.star_yaw, 0.0)
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Camera distance along +Z at the given elapsed wall-clock time.
///
/// A pure function of time, not an accumulation: frame drops do not shift the
/// oscillation phase.
pub fn camera_depth(config: &CameraConfig, elapsed_ms: f64) -> f32 {
    config.base_depth
        + config.bob_amplitude * ((elapsed_ms * config.bob_frequency as f64).sin() as f32)
}
