//! Cross-platform surface handling that normalizes platform-specific behavior.
//!
//! Handles Wayland zero-size windows, macOS Retina scaling, and Windows DPI
//! changes, and applies the backdrop's pixel-density cap: the surface is sized
//! at `logical × min(scale_factor, pixel_ratio_cap)` pixels.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Pixel dimensions of the render surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    /// Width in surface pixels.
    pub width: u32,
    /// Height in surface pixels.
    pub height: u32,
}

/// Event produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    /// New surface pixel dimensions (pixel-density cap applied).
    pub surface: SurfaceSize,
    /// New logical width (window physical / scale_factor).
    pub logical_width: f64,
    /// New logical height (window physical / scale_factor).
    pub logical_height: f64,
    /// Current window scale factor.
    pub scale_factor: f64,
    /// Scale factor actually applied to the surface (capped).
    pub effective_scale: f64,
}

/// Normalizes platform-specific surface behavior across Linux (Wayland/X11),
/// macOS (Retina), and Windows (DPI scaling).
///
/// Zero-size windows (common on Wayland) are clamped to 1×1 to prevent panics.
/// On high-density displays the surface pixel count is capped at
/// `pixel_ratio_cap` pixels per logical pixel.
pub struct SurfaceWrapper {
    /// Current surface pixel width (clamped to >= 1, cap applied).
    surface_width: u32,
    /// Current surface pixel height (clamped to >= 1, cap applied).
    surface_height: u32,
    /// Current logical width.
    logical_width: f64,
    /// Current logical height.
    logical_height: f64,
    /// Current window scale factor (physical pixels per logical pixel).
    scale_factor: f64,
    /// Maximum pixels-per-logical-pixel rendered to the surface.
    pixel_ratio_cap: f64,
    /// Whether the surface has been configured at least once with valid dimensions.
    configured: bool,
}

impl SurfaceWrapper {
    /// Creates a new `SurfaceWrapper` from initial window physical dimensions,
    /// scale factor, and pixel-density cap.
    ///
    /// If the initial dimensions are zero (common on Wayland before the compositor
    /// assigns a size), they are clamped to 1 and the wrapper is marked as unconfigured.
    pub fn new(
        physical_width: u32,
        physical_height: u32,
        scale_factor: f64,
        pixel_ratio_cap: f64,
    ) -> Self {
        let has_valid_size = physical_width > 0 && physical_height > 0;
        let mut wrapper = Self {
            surface_width: MIN_SURFACE_DIMENSION,
            surface_height: MIN_SURFACE_DIMENSION,
            logical_width: 0.0,
            logical_height: 0.0,
            scale_factor,
            pixel_ratio_cap,
            configured: has_valid_size,
        };
        wrapper.apply(physical_width, physical_height);
        wrapper
    }

    /// Recompute logical and capped surface dimensions from window physical pixels.
    fn apply(&mut self, physical_width: u32, physical_height: u32) {
        let physical_width = physical_width.max(MIN_SURFACE_DIMENSION);
        let physical_height = physical_height.max(MIN_SURFACE_DIMENSION);

        self.logical_width = physical_width as f64 / self.scale_factor;
        self.logical_height = physical_height as f64 / self.scale_factor;

        if self.scale_factor <= self.pixel_ratio_cap {
            self.surface_width = physical_width;
            self.surface_height = physical_height;
        } else {
            let ratio = self.pixel_ratio_cap / self.scale_factor;
            self.surface_width =
                ((physical_width as f64 * ratio).round() as u32).max(MIN_SURFACE_DIMENSION);
            self.surface_height =
                ((physical_height as f64 * ratio).round() as u32).max(MIN_SURFACE_DIMENSION);
        }
    }

    /// Handle a window resize event. Returns a resize event if the surface
    /// dimensions actually changed.
    ///
    /// Dimensions are clamped to a minimum of 1×1 to prevent wgpu panics.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let (old_w, old_h) = (self.surface_width, self.surface_height);
        self.apply(physical_width, physical_height);

        if self.surface_width == old_w && self.surface_height == old_h {
            return None;
        }
        self.configured = true;

        Some(SurfaceResizeEvent {
            surface: self.surface_size(),
            logical_width: self.logical_width,
            logical_height: self.logical_height,
            scale_factor: self.scale_factor,
            effective_scale: self.effective_scale(),
        })
    }

    /// Handle a scale factor change event. Returns a resize event because
    /// the surface dimensions change even if the logical size stays the same.
    ///
    /// This is triggered when a window moves between displays with different
    /// DPI settings or when the user changes display scaling.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    /// Get the current surface pixel dimensions for surface configuration.
    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.surface_width,
            height: self.surface_height,
        }
    }

    /// Get the current surface width in pixels.
    pub fn surface_width(&self) -> u32 {
        self.surface_width
    }

    /// Get the current surface height in pixels.
    pub fn surface_height(&self) -> u32 {
        self.surface_height
    }

    /// Width / height of the surface, for camera projection.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_width as f32 / self.surface_height as f32
    }

    /// Get the current logical width (window physical / scale_factor).
    pub fn logical_width(&self) -> f64 {
        self.logical_width
    }

    /// Get the current logical height (window physical / scale_factor).
    pub fn logical_height(&self) -> f64 {
        self.logical_height
    }

    /// Get the current window scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Scale factor actually applied to the surface: `min(scale_factor, cap)`.
    pub fn effective_scale(&self) -> f64 {
        self.scale_factor.min(self.pixel_ratio_cap)
    }

    /// Whether the surface has been configured at least once with valid dimensions.
    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_matches_physical_below_cap() {
        let wrapper = SurfaceWrapper::new(2880, 1800, 2.0, 2.0);
        // Scale 2.0 is within the cap, so surface pixels == window physical pixels.
        let size = wrapper.surface_size();
        assert_eq!(size.width, 2880);
        assert_eq!(size.height, 1800);
        assert!((wrapper.logical_width() - 1440.0).abs() < 0.1);
        assert!((wrapper.logical_height() - 900.0).abs() < 0.1);
    }

    #[test]
    fn test_pixel_ratio_cap_applies_above_cap() {
        // Scale 3.0 capped to 2.0: surface = logical × 2 = physical × (2/3).
        let wrapper = SurfaceWrapper::new(3840, 2160, 3.0, 2.0);
        let size = wrapper.surface_size();
        assert_eq!(size.width, 2560);
        assert_eq!(size.height, 1440);
        assert_eq!(wrapper.effective_scale(), 2.0);
    }

    #[test]
    fn test_zero_size_surface_handled_gracefully() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0, 2.0);

        // Clamped to 1x1, not yet "configured"
        assert!(!wrapper.is_configured());
        let size = wrapper.surface_size();
        assert!(size.width >= 1);
        assert!(size.height >= 1);

        // Now simulate the first real resize from the compositor
        let event = wrapper.handle_resize(1920, 1080);
        assert!(event.is_some());
        let event = event.unwrap();
        assert_eq!(event.surface.width, 1920);
        assert_eq!(event.surface.height, 1080);
        assert!(wrapper.is_configured());
    }

    #[test]
    fn test_resize_event_carries_surface_and_logical_sizes() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 2.0, 2.0);

        let event = wrapper.handle_resize(3840, 2160);
        assert!(event.is_some());
        let event = event.unwrap();

        assert_eq!(event.surface.width, 3840);
        assert_eq!(event.surface.height, 2160);
        assert!((event.logical_width - 1920.0).abs() < 0.1);
        assert!((event.logical_height - 1080.0).abs() < 0.1);
        assert_eq!(event.scale_factor, 2.0);
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0, 2.0);
        let event = wrapper.handle_resize(1920, 1080);
        assert!(event.is_none());
    }

    #[test]
    fn test_scale_factor_change_updates_surface_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0, 2.0);

        let event = wrapper.handle_scale_factor_changed(2.0, 3840, 2160);
        assert!(event.is_some());
        let event = event.unwrap();
        assert_eq!(event.surface.width, 3840);
        assert_eq!(event.surface.height, 2160);
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }

    #[test]
    fn test_scale_factor_change_beyond_cap_is_capped() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0, 2.0);

        // Moving to a 4x display: logical stays 1920×1080, surface capped at 2x.
        let event = wrapper.handle_scale_factor_changed(4.0, 7680, 4320);
        assert!(event.is_some());
        let event = event.unwrap();
        assert_eq!(event.surface.width, 3840);
        assert_eq!(event.surface.height, 2160);
        assert_eq!(event.effective_scale, 2.0);
        assert!((event.logical_width - 1920.0).abs() < 0.1);
    }

    #[test]
    fn test_zero_dimensions_clamped_to_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0, 2.0);

        let event = wrapper.handle_resize(0, 0);
        assert!(event.is_some());
        let size = wrapper.surface_size();
        assert_eq!(size.width, 1);
        assert_eq!(size.height, 1);
    }

    #[test]
    fn test_aspect_ratio_is_width_over_height() {
        let wrapper = SurfaceWrapper::new(1920, 1080, 1.0, 2.0);
        assert!((wrapper.aspect_ratio() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_successive_resizes_produce_correct_state() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0, 2.0);

        wrapper.handle_resize(1024, 768);
        assert_eq!(
            wrapper.surface_size(),
            SurfaceSize {
                width: 1024,
                height: 768
            }
        );

        wrapper.handle_resize(1920, 1080);
        assert_eq!(
            wrapper.surface_size(),
            SurfaceSize {
                width: 1920,
                height: 1080
            }
        );

        wrapper.handle_scale_factor_changed(1.5, 2880, 1620);
        assert_eq!(
            wrapper.surface_size(),
            SurfaceSize {
                width: 2880,
                height: 1620
            }
        );
        assert_eq!(wrapper.scale_factor(), 1.5);
    }
}
