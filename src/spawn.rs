//! Spawn context for particle initialization.
//!
//! Bundles a per-particle RNG with helpers for the random placements the
//! field needs: off-screen start points, points inside wing lobes, and drift
//! parameters.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Context handed to per-particle initialization.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(i, count, viewport, seed);
/// particle.start = ctx.random_offscreen(40.0);
/// particle.phase = ctx.random_angle();
/// ```
pub struct SpawnContext {
    /// Index of the particle being spawned (0 to count-1).
    pub index: u32,
    /// Total number of particles being spawned.
    pub count: u32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context whose RNG is derived from `seed` and the particle index.
    pub fn new(index: u32, count: u32, viewport: Vec2, seed: u64) -> Self {
        let mixed = seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self {
            index,
            count,
            viewport,
            rng: SmallRng::seed_from_u64(mixed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 between `min` and `max`; returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random() * (max - min)
    }

    /// Random angle in radians.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    // ========== Position helpers ==========

    /// Random point just outside one of the four viewport edges.
    ///
    /// `margin` is how far past the edge the point may land (at least 1px).
    pub fn random_offscreen(&mut self, margin: f32) -> Vec2 {
        let margin = margin.max(1.0);
        let Vec2 { x: w, y: h } = self.viewport;
        let depth = self.random_range(1.0, margin);
        match self.rng.gen_range(0..4u8) {
            0 => Vec2::new(self.random() * w, -depth),
            1 => Vec2::new(w + depth, self.random() * h),
            2 => Vec2::new(self.random() * w, h + depth),
            _ => Vec2::new(-depth, self.random() * h),
        }
    }

    /// Random point inside the viewport.
    pub fn random_in_viewport(&mut self) -> Vec2 {
        Vec2::new(self.random() * self.viewport.x, self.random() * self.viewport.y)
    }

    /// Uniform random point inside an axis-aligned ellipse at the origin.
    pub fn random_in_ellipse(&mut self, radii: Vec2) -> Vec2 {
        let theta = self.random_angle();
        // sqrt for uniform area distribution
        let r = self.random().sqrt();
        Vec2::new(theta.cos() * radii.x * r, theta.sin() * radii.y * r)
    }

    /// Random point on the outline of an axis-aligned ellipse at the origin.
    pub fn random_on_ellipse(&mut self, radii: Vec2) -> Vec2 {
        let theta = self.random_angle();
        Vec2::new(theta.cos() * radii.x, theta.sin() * radii.y)
    }

    /// Small random displacement within `radius`.
    pub fn jitter(&mut self, radius: f32) -> Vec2 {
        self.random_in_ellipse(Vec2::splat(radius))
    }
}

/// Fresh seed for runs without a configured one.
pub fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}
