//! Stardrift application framework.
//!
//! Provides window creation, event handling, and the main frame loop.

pub mod frame_loop;
pub mod window;
