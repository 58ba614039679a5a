//! Floating motion and pointer interaction for formed particles.
//!
//! Formed particles render at `target + drift + offset`:
//!
//! - `drift` is a per-particle sine wobble (see [`Particle::drift`]), so the
//!   butterfly breathes without every point moving in lockstep.
//! - `offset` accumulates pointer pushes and click ripples and shrinks by a
//!   fixed fraction every frame, so any disturbance heals by itself.
//!
//! Unformed particles are never touched here; the formation animator owns them.

use crate::config::ButterflyConfig;
use crate::easing::Easing;
use crate::particle::Particle;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Offsets shorter than this snap to zero.
pub const OFFSET_EPSILON: f32 = 1e-3;

/// Expanding ring spawned by a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub max_radius: f32,
}

impl Ripple {
    fn t(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn radius(&self) -> f32 {
        Easing::EaseOutCubic.apply(self.t()) * self.max_radius
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.t()
    }

    pub fn is_done(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// GPU instance data for one ripple ring. 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RingInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

impl From<&Ripple> for RingInstance {
    fn from(r: &Ripple) -> Self {
        Self {
            center: r.center.to_array(),
            radius: r.radius(),
            alpha: r.alpha(),
        }
    }
}

/// Pointer and ripple tuning, lifted from [`ButterflyConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionParams {
    pub radius: f32,
    pub mouse_strength: f32,
    pub center_bias: f32,
    pub ripple_strength: f32,
    pub ripple_lifetime: f32,
    pub max_ripples: usize,
    pub decay: f32,
    pub max_offset: f32,
}

impl From<&ButterflyConfig> for InteractionParams {
    fn from(c: &ButterflyConfig) -> Self {
        Self {
            radius: c.interaction_radius,
            mouse_strength: c.mouse_strength,
            center_bias: c.center_bias,
            ripple_strength: c.ripple_strength,
            ripple_lifetime: c.ripple_lifetime,
            max_ripples: c.max_ripples,
            decay: c.offset_decay,
            max_offset: c.max_offset,
        }
    }
}

/// Pointer tuning plus live ripples.
#[derive(Debug, Clone)]
pub struct Interaction {
    params: InteractionParams,
    /// Shape centroid the pointer force leans toward.
    center: Vec2,
    ripples: Vec<Ripple>,
}

impl Interaction {
    pub fn new(params: InteractionParams, center: Vec2) -> Self {
        Self {
            params,
            center,
            ripples: Vec::new(),
        }
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    /// Apply a pointer move. Returns how many particles were pushed.
    pub fn pointer_moved(&mut self, pointer: Vec2, particles: &mut [Particle]) -> usize {
        let InteractionParams {
            radius,
            mouse_strength,
            center_bias,
            max_offset,
            ..
        } = self.params;

        let mut touched = 0;
        for p in particles.iter_mut().filter(|p| p.formed) {
            let Some(falloff) = falloff(p.position, pointer, radius) else {
                continue;
            };
            let away = (p.position - pointer).normalize_or_zero();
            let home = (self.center - p.target).normalize_or_zero();
            let push = away * falloff * mouse_strength;
            let pull = home * falloff * mouse_strength.abs() * center_bias;
            p.offset = (p.offset + push + pull).clamp_length_max(max_offset);
            touched += 1;
        }
        touched
    }

    /// Apply a click: radial impulse to nearby formed particles and a new ring.
    ///
    /// The ring spawns even when no particle is in range.
    pub fn click(&mut self, at: Vec2, particles: &mut [Particle]) -> usize {
        let InteractionParams {
            radius,
            ripple_strength,
            max_offset,
            ..
        } = self.params;

        let mut touched = 0;
        for p in particles.iter_mut().filter(|p| p.formed) {
            let Some(falloff) = falloff(p.position, at, radius) else {
                continue;
            };
            let impulse = (p.position - at).normalize_or_zero() * falloff * ripple_strength;
            p.offset = (p.offset + impulse).clamp_length_max(max_offset);
            touched += 1;
        }

        if self.params.max_ripples > 0 {
            if self.ripples.len() >= self.params.max_ripples {
                self.ripples.remove(0);
            }
            self.ripples.push(Ripple {
                center: at,
                age: 0.0,
                lifetime: self.params.ripple_lifetime,
                max_radius: radius,
            });
        }
        log::debug!("Ripple at ({:.0}, {:.0}) moved {} particles", at.x, at.y, touched);
        touched
    }

    /// One floating step at animation time `t`: decay offsets, place formed particles.
    pub fn float(&self, t: f32, particles: &mut [Particle]) {
        let keep = 1.0 - self.params.decay;
        for p in particles.iter_mut().filter(|p| p.formed) {
            p.offset = decay_offset(p.offset, keep);
            p.position = p.target + p.drift(t) + p.offset;
        }
    }

    /// Age ripples by `dt` and drop finished ones.
    pub fn age_ripples(&mut self, dt: f32) {
        for ripple in &mut self.ripples {
            ripple.age += dt.max(0.0);
        }
        self.ripples.retain(|r| !r.is_done());
    }

    pub fn ring_instances(&self) -> Vec<RingInstance> {
        self.ripples.iter().map(RingInstance::from).collect()
    }
}

/// Linear falloff `1 - d / radius` inside the radius, `None` outside it.
fn falloff(position: Vec2, source: Vec2, radius: f32) -> Option<f32> {
    let distance = position.distance(source);
    (distance < radius).then(|| 1.0 - distance / radius)
}

/// Shrink an offset geometrically, snapping tiny remainders to zero.
pub fn decay_offset(offset: Vec2, keep: f32) -> Vec2 {
    let next = offset * keep;
    if next.length() < OFFSET_EPSILON {
        Vec2::ZERO
    } else {
        next
    }
}
