//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level backdrop configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Backdrop scene settings.
    pub backdrop: BackdropConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Backdrop scene configuration.
///
/// The defaults give the intended look: 4200 stars in a 320-unit cube,
/// 1.2-unit attenuated point sprites at 92% opacity, and two additive nebula
/// planes behind them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackdropConfig {
    /// Number of stars in the point cloud. Fixed for the process lifetime.
    pub star_count: u32,
    /// Edge length of the cubic volume stars are scattered in.
    pub star_spread: f32,
    /// Star point size in world units (attenuated with view depth).
    pub star_point_size: f32,
    /// Star sprite opacity.
    pub star_opacity: f32,
    /// Cap on the device pixel ratio used for the surface.
    pub pixel_ratio_cap: f64,
    /// RNG seed for star placement. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Camera parameters.
    pub camera: CameraConfig,
    /// Primary nebula plane.
    pub nebula_primary: NebulaPlaneConfig,
    /// Secondary nebula plane.
    pub nebula_secondary: NebulaPlaneConfig,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Resting camera distance along +Z.
    pub base_depth: f32,
    /// Amplitude of the depth oscillation.
    pub bob_amplitude: f32,
    /// Oscillation frequency in radians per millisecond.
    pub bob_frequency: f32,
}

/// A single translucent nebula plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NebulaPlaneConfig {
    /// Color as 0xRRGGBB.
    pub color: u32,
    /// Plane opacity. Kept low so stars show through.
    pub opacity: f32,
    /// Position along the viewing axis (negative = behind the stars' center).
    pub depth: f32,
}

impl NebulaPlaneConfig {
    /// Unpack the 0xRRGGBB color into linear-ish RGB channel floats.
    pub fn color_rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xff) as f32 / 255.0,
            ((self.color >> 8) & 0xff) as f32 / 255.0,
            (self.color & 0xff) as f32 / 255.0,
        ]
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show per-second frame statistics in the log.
    pub log_frame_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "Stardrift".to_string(),
        }
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            star_count: 4200,
            star_spread: 320.0,
            star_point_size: 1.2,
            star_opacity: 0.92,
            pixel_ratio_cap: 2.0,
            seed: None,
            camera: CameraConfig::default(),
            nebula_primary: NebulaPlaneConfig {
                color: 0x3a7bd5,
                opacity: 0.16,
                depth: -35.0,
            },
            nebula_secondary: NebulaPlaneConfig {
                color: 0xa8d8f0,
                opacity: 0.12,
                depth: -45.0,
            },
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            base_depth: 6.0,
            bob_amplitude: 0.4,
            bob_frequency: 0.00025,
        }
    }
}

impl Default for NebulaPlaneConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            opacity: 0.1,
            depth: -40.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_frame_stats: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("star_count: 4200"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `backdrop` section entirely
        let ron_str = "(window: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.backdrop, BackdropConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        // RON with #[serde(default)] and deny_unknown_fields not set should accept this
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.window.height = 1080;
        config.backdrop.star_count = 100;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.backdrop.seed = Some(42);
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().backdrop.seed, Some(42));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_backdrop_defaults() {
        let backdrop = BackdropConfig::default();
        assert_eq!(backdrop.star_count, 4200);
        assert_eq!(backdrop.star_spread, 320.0);
        assert_eq!(backdrop.star_point_size, 1.2);
        assert_eq!(backdrop.star_opacity, 0.92);
        assert_eq!(backdrop.pixel_ratio_cap, 2.0);
        assert_eq!(backdrop.seed, None);
        assert_eq!(backdrop.nebula_primary.color, 0x3a7bd5);
        assert_eq!(backdrop.nebula_primary.opacity, 0.16);
        assert_eq!(backdrop.nebula_primary.depth, -35.0);
        assert_eq!(backdrop.nebula_secondary.color, 0xa8d8f0);
        assert_eq!(backdrop.nebula_secondary.opacity, 0.12);
        assert_eq!(backdrop.nebula_secondary.depth, -45.0);
    }

    #[test]
    fn test_camera_defaults() {
        let camera = CameraConfig::default();
        assert_eq!(camera.fov_y_degrees, 60.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.base_depth, 6.0);
        assert_eq!(camera.bob_amplitude, 0.4);
        assert_eq!(camera.bob_frequency, 0.00025);
    }

    #[test]
    fn test_nebula_color_unpacking() {
        let plane = NebulaPlaneConfig {
            color: 0x3a7bd5,
            opacity: 0.16,
            depth: -35.0,
        };
        let [r, g, b] = plane.color_rgb();
        assert!((r - 0x3a as f32 / 255.0).abs() < 1e-6);
        assert!((g - 0x7b as f32 / 255.0).abs() < 1e-6);
        assert!((b - 0xd5 as f32 / 255.0).abs() < 1e-6);
    }
}
