//! Particle types: CPU animation state and GPU instance data.

use crate::config::ButterflyConfig;
use crate::shape::{ButterflyPoint, PointKind};
use crate::spawn::SpawnContext;
use crate::visuals::Color;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// How far past the viewport edge off-screen starts may land.
pub const OFFSCREEN_MARGIN: f32 = 60.0;

/// CPU-side particle state.
///
/// `kind` and `index` never change after creation. Everything else is
/// rewritten in place by formation, floating and reset.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Slot of this particle's sprite in the instance buffer.
    pub index: u32,
    pub kind: PointKind,
    pub color: Color,
    pub radius: f32,
    /// Coordinate assigned by the shape generator.
    pub home: Vec2,
    /// Where the current formation run starts from.
    pub start: Vec2,
    /// Where the current formation run ends.
    pub target: Vec2,
    /// Rendered position.
    pub position: Vec2,
    /// Formation progress in `[0, 1]`.
    pub progress: f32,
    pub formed: bool,
    /// Idle drift phase, radians.
    pub phase: f32,
    /// Idle drift angular speed, radians per second.
    pub speed: f32,
    /// Idle drift amplitude, pixels.
    pub amplitude: f32,
    /// Pointer and ripple displacement; decays every frame.
    pub offset: Vec2,
}

impl Particle {
    /// Create a particle headed for `point`, starting at a random spot in the viewport.
    pub fn spawn(point: &ButterflyPoint, ctx: &mut SpawnContext, config: &ButterflyConfig) -> Self {
        let start = ctx.random_in_viewport();
        let (amp_min, amp_max) = config.drift_amplitude;
        let (speed_min, speed_max) = config.drift_speed;
        Self {
            index: ctx.index,
            kind: point.kind,
            color: point.color,
            radius: point.kind.base_radius() * ctx.random_range(0.8, 1.25),
            home: point.position,
            start,
            target: point.position,
            position: start,
            progress: 0.0,
            formed: false,
            phase: ctx.random_angle(),
            speed: ctx.random_range(speed_min, speed_max),
            amplitude: ctx.random_range(amp_min, amp_max),
            offset: Vec2::ZERO,
        }
    }

    /// Put the particle back off-screen, ready for a fresh formation run.
    pub fn scatter(&mut self, ctx: &mut SpawnContext) {
        self.start = ctx.random_offscreen(OFFSCREEN_MARGIN);
        self.target = self.home;
        self.position = self.start;
        self.progress = 0.0;
        self.formed = false;
        self.offset = Vec2::ZERO;
    }

    /// Idle drift displacement at animation time `t`.
    pub fn drift(&self, t: f32) -> Vec2 {
        Vec2::new(
            (t * self.speed + self.phase).sin() * self.amplitude,
            (t * self.speed * 0.8 + self.phase).cos() * self.amplitude * 0.6,
        )
    }
}

/// GPU instance data, matches the WGSL vertex inputs of the particle pipeline.
/// 32 bytes: position, radius, padding, rgba.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle) -> Self {
        // Unformed particles in flight are drawn slightly translucent
        let alpha = if p.formed { 1.0 } else { 0.55 + 0.45 * p.progress };
        Self {
            position: p.position.to_array(),
            radius: p.radius,
            _pad: 0.0,
            color: p.color.to_rgba(alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ButterflyShape;

    fn sample() -> Particle {
        let viewport = Vec2::new(800.0, 600.0);
        let point = ButterflyShape::new(viewport).generate(10)[0];
        let mut ctx = SpawnContext::new(0, 10, viewport, 3);
        Particle::spawn(&point, &mut ctx, &ButterflyConfig::default())
    }

    #[test]
    fn test_spawn_targets_home() {
        let p = sample();
        assert_eq!(p.target, p.home);
        assert_eq!(p.position, p.start);
        assert_eq!(p.progress, 0.0);
        assert!(!p.formed);
        assert!(p.amplitude >= 1.5 && p.amplitude <= 4.0);
    }

    #[test]
    fn test_scatter_clears_state() {
        let mut p = sample();
        p.progress = 1.0;
        p.formed = true;
        p.offset = Vec2::new(5.0, 5.0);
        p.target = Vec2::new(1.0, 1.0);

        let mut ctx = SpawnContext::new(0, 10, Vec2::new(800.0, 600.0), 4);
        p.scatter(&mut ctx);

        assert_eq!(p.progress, 0.0);
        assert!(!p.formed);
        assert_eq!(p.offset, Vec2::ZERO);
        assert_eq!(p.target, p.home);
        assert_eq!(p.position, p.start);
    }

    #[test]
    fn test_drift_is_bounded() {
        let p = sample();
        for i in 0..100 {
            let d = p.drift(i as f32 * 0.37);
            assert!(d.x.abs() <= p.amplitude + 1e-4);
            assert!(d.y.abs() <= p.amplitude * 0.6 + 1e-4);
        }
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
        let p = sample();
        let inst = ParticleInstance::from_particle(&p);
        assert_eq!(inst.position, p.position.to_array());
        assert!((inst.color[3] - 0.55).abs() < 1e-6);
    }
}
