//! # Papillon
//!
//! A decorative particle animation: a cloud of points that drifts freely,
//! then flies into a butterfly silhouette and keeps floating there, pushed
//! around by the mouse and rippled by clicks.
//!
//! Papillon keeps the animation on the CPU (a few thousand particles) and
//! hands one instance per particle to a small wgpu renderer, so the whole
//! frame loop can be stepped and tested without a GPU.
//!
//! ## Quick Start
//!
//! ```ignore
//! use papillon::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_particle_count(1500)
//!         .with_window_size(1280, 720)
//!         .run()
//! }
//! ```
//!
//! ## Headless use
//!
//! [`ButterflyField`] owns all animation state and can be driven directly:
//!
//! ```ignore
//! let mut field = ButterflyField::new(ButterflyConfig::default(), Vec2::new(1920.0, 1080.0))?;
//! field.mount(); // starts forming when `auto_form` is set
//!
//! while field.phase() != Phase::Formed {
//!     field.frame(1.0 / 60.0);
//! }
//!
//! field.click(Vec2::new(960.0, 540.0));
//! println!("{}", field.stats());
//! ```
//!
//! ## Controls
//!
//! | Input | Effect |
//! |-------|--------|
//! | `Space` | form (only while unformed) |
//! | `R` | reset: scatter off-screen and form again |
//! | `P` | pause / resume |
//! | `Escape` | quit |
//! | mouse move | pushes nearby particles (negative strength pulls) |
//! | left click | radial ripple |
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Target points | [`shape`] |
//! | Per-particle state | [`particle`], [`spawn`] |
//! | Timing | [`timeline`], [`easing`], [`time`] |
//! | Flight to target | [`formation`] |
//! | Floating and pointer | [`interaction`] |
//! | Lifecycle and stats | [`field`] |
//! | Window and GPU | [`Simulation`] |

pub mod config;
pub mod easing;
pub mod error;
pub mod field;
pub mod formation;
mod gpu;
#[cfg(feature = "egui")]
pub mod hud;
pub mod input;
pub mod interaction;
pub mod particle;
pub mod shape;
mod simulation;
pub mod spawn;
pub mod time;
pub mod timeline;
pub mod visuals;

pub use bytemuck;
pub use config::ButterflyConfig;
pub use easing::Easing;
pub use error::{ConfigError, GpuError, SimulationError};
pub use field::{ButterflyControl, ButterflyField, Phase, Stats};
pub use glam::Vec2;
pub use gpu::{PARTICLE_SHADER, RING_SHADER};
pub use interaction::{RingInstance, Ripple};
pub use particle::{Particle, ParticleInstance};
pub use shape::{ButterflyPoint, ButterflyShape, Partition, PointKind};
pub use simulation::Simulation;
pub use spawn::SpawnContext;
pub use time::FrameClock;
pub use visuals::{Color, DotGrid, PalettePreset, WingPalette};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use papillon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ButterflyConfig;
    pub use crate::easing::Easing;
    pub use crate::error::SimulationError;
    pub use crate::field::{ButterflyControl, ButterflyField, Phase, Stats};
    pub use crate::input::{Command, Input, KeyCode, MouseButton};
    pub use crate::shape::{ButterflyShape, PointKind};
    pub use crate::simulation::Simulation;
    pub use crate::time::FrameClock;
    pub use crate::visuals::{Color, PalettePreset, WingPalette};
    pub use crate::Vec2;
    #[cfg(feature = "egui")]
    pub use egui;
}
