//! Configuration system for the Stardrift backdrop.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BackdropConfig, CameraConfig, Config, DebugConfig, NebulaPlaneConfig, WindowConfig,
};
pub use error::ConfigError;
