//! GPU plumbing for the Stardrift backdrop: device/surface management,
//! camera, buffers, and per-frame command encoding.

pub mod buffer;
pub mod camera;
pub mod gpu;
pub mod pass;
pub mod surface;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPosition};
pub use camera::{Camera, CameraUniform};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, TRANSPARENT};
pub use surface::{SurfaceResizeEvent, SurfaceSize, SurfaceWrapper};
