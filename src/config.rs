//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! particle_count = 2500
//! formation_duration = 4.0
//!
//! [palette]
//! wing = "#1f6fd1"
//! ```

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::visuals::{DotGrid, WingPalette};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted particle count. Keeps the instance buffer well inside
/// wgpu's default `max_buffer_size`.
pub const MAX_PARTICLES: u32 = 1_000_000;

/// All tunables of the butterfly field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButterflyConfig {
    /// Number of particles, fixed for the lifetime of a field.
    pub particle_count: u32,
    /// Initial window width in logical pixels.
    pub window_width: u32,
    /// Initial window height in logical pixels.
    pub window_height: u32,
    /// Seed for shape sampling and per-particle randomness.
    /// `None` picks a fresh seed each run.
    pub seed: Option<u64>,
    /// Launch the formation as soon as the field is mounted.
    pub auto_form: bool,

    /// Total formation time in seconds.
    pub formation_duration: f32,
    /// Particles per stagger batch.
    pub batch_size: u32,
    /// Fraction of the duration spent staggering starts (0 = simultaneous).
    pub stagger: f32,
    /// Progress above which a particle counts as formed.
    pub formed_threshold: f32,
    /// Peak sideways displacement of the flight arc, in pixels.
    pub curve_amplitude: f32,
    /// Easing applied to each particle's flight.
    pub flight_easing: Easing,
    /// Easing of the aggregate progress readout.
    pub progress_easing: Easing,

    /// Idle drift amplitude range in pixels.
    pub drift_amplitude: (f32, f32),
    /// Idle drift angular speed range in radians per second.
    pub drift_speed: (f32, f32),

    /// Pointer influence radius in pixels (mouse and ripple).
    pub interaction_radius: f32,
    /// Per-move push strength; negative values attract.
    pub mouse_strength: f32,
    /// Share of the pointer force redirected toward the shape center.
    pub center_bias: f32,
    /// Peak impulse of a click ripple in pixels.
    pub ripple_strength: f32,
    /// Lifetime of a ripple ring in seconds.
    pub ripple_lifetime: f32,
    /// Maximum number of live ripple rings.
    pub max_ripples: usize,
    /// Fraction of the pointer offset removed every frame.
    pub offset_decay: f32,
    /// Largest pointer offset a particle can accumulate, in pixels.
    pub max_offset: f32,

    /// Frames between fps estimates.
    pub fps_sample_frames: u32,

    pub palette: WingPalette,
    pub dots: DotGrid,
}

impl Default for ButterflyConfig {
    fn default() -> Self {
        Self {
            particle_count: 1500,
            window_width: 1280,
            window_height: 720,
            seed: None,
            auto_form: true,
            formation_duration: 3.0,
            batch_size: 50,
            stagger: 0.4,
            formed_threshold: 0.95,
            curve_amplitude: 60.0,
            flight_easing: Easing::EaseInOutCubic,
            progress_easing: Easing::EaseOutQuad,
            drift_amplitude: (1.5, 4.0),
            drift_speed: (0.6, 1.8),
            interaction_radius: 120.0,
            mouse_strength: 6.0,
            center_bias: 0.15,
            ripple_strength: 40.0,
            ripple_lifetime: 1.0,
            max_ripples: 32,
            offset_decay: 0.08,
            max_offset: 60.0,
            fps_sample_frames: 30,
            palette: WingPalette::default(),
            dots: DotGrid::default(),
        }
    }
}

impl ButterflyConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ButterflyConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges that would otherwise produce NaNs or runaway motion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.to_string(),
            }
        }

        if self.particle_count > MAX_PARTICLES {
            return Err(invalid("particle_count", &format!("must be at most {}", MAX_PARTICLES)));
        }
        if self.formation_duration <= 0.0 || !self.formation_duration.is_finite() {
            return Err(invalid("formation_duration", "must be a positive number of seconds"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.stagger) {
            return Err(invalid("stagger", "must be in [0, 1)"));
        }
        if !(0.0..1.0).contains(&self.formed_threshold) {
            return Err(invalid("formed_threshold", "must be in [0, 1)"));
        }
        if self.offset_decay <= 0.0 || self.offset_decay >= 1.0 {
            return Err(invalid("offset_decay", "must be in (0, 1)"));
        }
        if self.interaction_radius <= 0.0 {
            return Err(invalid("interaction_radius", "must be positive"));
        }
        if self.ripple_lifetime <= 0.0 {
            return Err(invalid("ripple_lifetime", "must be positive"));
        }
        if self.max_offset < 0.0 {
            return Err(invalid("max_offset", "must not be negative"));
        }
        if self.drift_amplitude.0 > self.drift_amplitude.1 || self.drift_speed.0 > self.drift_speed.1 {
            return Err(invalid("drift_amplitude/drift_speed", "range minimum exceeds maximum"));
        }
        if self.fps_sample_frames == 0 {
            return Err(invalid("fps_sample_frames", "must be at least 1"));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid("window_width/window_height", "must be non-zero"));
        }
        Ok(())
    }

    /// Viewport size matching the configured window.
    pub fn window_viewport(&self) -> glam::Vec2 {
        glam::Vec2::new(self.window_width as f32, self.window_height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::Color;

    #[test]
    fn test_default_is_valid() {
        assert!(ButterflyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ButterflyConfig::from_toml_str(
            r##"
            particle_count = 300
            flight_easing = "ease-out-back"

            [palette]
            wing = "#1f6fd1"
            "##,
        )
        .unwrap();

        assert_eq!(config.particle_count, 300);
        assert_eq!(config.flight_easing, Easing::EaseOutBack);
        assert_eq!(config.palette.wing, Color::rgb(0x1f, 0x6f, 0xd1));
        // Untouched palette entries fall back to the default preset
        assert_eq!(config.palette.body, WingPalette::default().body);
        assert_eq!(config.formation_duration, 3.0);
    }

    #[test]
    fn test_rejects_bad_color() {
        let err = ButterflyConfig::from_toml_str("[palette]\nwing = \"orange\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_out_of_range_decay() {
        let err = ButterflyConfig::from_toml_str("offset_decay = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "offset_decay", .. }
        ));
    }

    #[test]
    fn test_rejects_huge_particle_count() {
        let at_limit = ButterflyConfig {
            particle_count: MAX_PARTICLES,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let err = ButterflyConfig::from_toml_str("particle_count = 400000000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "particle_count", .. }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ButterflyConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
