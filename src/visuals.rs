//! Colors and wing palettes.
//!
//! Wing coloring follows a tiled "polka-dot" rule: the viewport is cut into
//! square cells, and a wing point close to its cell's center takes one of two
//! dot colors (alternating by cell parity). Everything else gets the wing base
//! color. The pattern depends only on screen position, never on particle count.
//!
//! # Usage
//!
//! ```ignore
//! let palette = WingPalette::preset(PalettePreset::Morpho);
//! let color = palette.wing_color(Vec2::new(320.0, 200.0), &DotGrid::default());
//! println!("{}", color); // "#1f6fd1"
//! ```

use crate::error::ConfigError;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with 8 bits per channel.
///
/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as floats in `0.0..=1.0`.
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    /// RGBA floats for GPU upload.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        let c = self.to_vec3();
        [c.x, c.y, c.z, alpha]
    }

    /// Background clear color for wgpu.
    pub fn to_wgpu(&self) -> wgpu::Color {
        let c = self.to_vec3();
        wgpu::Color {
            r: c.x as f64,
            g: c.y as f64,
            b: c.z as f64,
            a: 1.0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Built-in wing palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PalettePreset {
    /// Orange wings, cream and umber dots.
    #[default]
    Monarch,
    /// Iridescent blue wings, white and black dots.
    Morpho,
    /// Pale wings with grey and charcoal dots.
    CabbageWhite,
    /// Magenta wings with gold and violet dots.
    Neon,
}

impl FromStr for PalettePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "monarch" => Ok(Self::Monarch),
            "morpho" => Ok(Self::Morpho),
            "cabbage-white" | "white" => Ok(Self::CabbageWhite),
            "neon" => Ok(Self::Neon),
            other => Err(ConfigError::InvalidValue {
                field: "palette",
                reason: format!("unknown preset {other:?}"),
            }),
        }
    }
}

/// Colors for every part of the butterfly plus the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingPalette {
    pub body: Color,
    pub antenna: Color,
    pub wing: Color,
    pub dot_a: Color,
    pub dot_b: Color,
    pub background: Color,
    /// Ripple ring color.
    pub ring: Color,
}

impl WingPalette {
    pub fn preset(preset: PalettePreset) -> Self {
        match preset {
            PalettePreset::Monarch => Self {
                body: Color::rgb(0x2e, 0x1f, 0x14),
                antenna: Color::rgb(0x4a, 0x35, 0x26),
                wing: Color::rgb(0xf0, 0x8a, 0x24),
                dot_a: Color::rgb(0xff, 0xf4, 0xe0),
                dot_b: Color::rgb(0x2a, 0x1a, 0x10),
                background: Color::rgb(0x0b, 0x0b, 0x14),
                ring: Color::rgb(0xff, 0xd9, 0xa0),
            },
            PalettePreset::Morpho => Self {
                body: Color::rgb(0x1a, 0x1a, 0x22),
                antenna: Color::rgb(0x33, 0x33, 0x40),
                wing: Color::rgb(0x1f, 0x6f, 0xd1),
                dot_a: Color::rgb(0xf5, 0xf8, 0xff),
                dot_b: Color::rgb(0x08, 0x0c, 0x1a),
                background: Color::rgb(0x05, 0x08, 0x12),
                ring: Color::rgb(0x9c, 0xd4, 0xff),
            },
            PalettePreset::CabbageWhite => Self {
                body: Color::rgb(0x3b, 0x3b, 0x3b),
                antenna: Color::rgb(0x55, 0x55, 0x55),
                wing: Color::rgb(0xf4, 0xf1, 0xe6),
                dot_a: Color::rgb(0x9a, 0x9a, 0x9a),
                dot_b: Color::rgb(0x22, 0x22, 0x22),
                background: Color::rgb(0x12, 0x14, 0x12),
                ring: Color::WHITE,
            },
            PalettePreset::Neon => Self {
                body: Color::rgb(0x20, 0x06, 0x2e),
                antenna: Color::rgb(0x5b, 0x16, 0x7a),
                wing: Color::rgb(0xff, 0x2e, 0xa6),
                dot_a: Color::rgb(0xff, 0xd4, 0x3b),
                dot_b: Color::rgb(0x6a, 0x2c, 0xff),
                background: Color::rgb(0x08, 0x02, 0x10),
                ring: Color::rgb(0x3b, 0xf6, 0xff),
            },
        }
    }

    /// Color for a wing point at `position` (viewport pixels).
    pub fn wing_color(&self, position: Vec2, grid: &DotGrid) -> Color {
        match grid.dot_at(position) {
            Some(DotTone::A) => self.dot_a,
            Some(DotTone::B) => self.dot_b,
            None => self.wing,
        }
    }
}

impl Default for WingPalette {
    fn default() -> Self {
        Self::preset(PalettePreset::default())
    }
}

/// Which of the two dot colors a cell uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotTone {
    A,
    B,
}

/// Square tiling of viewport space for the polka-dot rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotGrid {
    /// Cell edge length in pixels.
    pub cell_size: f32,
    /// Dot radius in pixels, measured from the cell center.
    pub dot_radius: f32,
}

impl Default for DotGrid {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            dot_radius: 8.0,
        }
    }
}

impl DotGrid {
    /// The dot tone covering `position`, or `None` between dots.
    pub fn dot_at(&self, position: Vec2) -> Option<DotTone> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let cell = (position / self.cell_size).floor();
        let center = (cell + Vec2::splat(0.5)) * self.cell_size;
        if position.distance(center) > self.dot_radius {
            return None;
        }
        let parity = (cell.x as i64 + cell.y as i64).rem_euclid(2);
        Some(if parity == 0 { DotTone::A } else { DotTone::B })
    }
}
