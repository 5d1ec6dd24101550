//! Backdrop scene: procedural star placement, the star point-cloud renderer,
//! translucent nebula planes, and the per-frame animation state.

pub mod backdrop;
pub mod nebula;
pub mod starfield;
pub mod state;

pub use backdrop::SpaceBackdrop;
pub use nebula::{NEBULA_PLANE_EXTENT, NebulaPlane, NebulaPlaneRenderer, NebulaUniform};
pub use starfield::{StarfieldGenerator, StarfieldRenderer, StarfieldUniform};
pub use state::{
    PRIMARY_ROLL_RATE, SECONDARY_ROLL_RATE, STAR_PITCH_RATE, STAR_YAW_RATE, SceneState,
    camera_depth,
};
