//! Formation animator.
//!
//! Drives every particle's `progress` from 0 to 1 along a [`StaggerSchedule`]
//! and converts progress into a curved flight path: an eased lerp from start
//! to target, pushed sideways by a sine arc whose amplitude shrinks to zero as
//! the particle lands. A particle is marked `formed` once its progress passes
//! the threshold; from then on the floating updater owns its position.
//!
//! A separate [`Tween`] of the same total duration drives the aggregate
//! progress readout, so the percentage shown to the user is smooth regardless
//! of individual particle timings.

use crate::config::ButterflyConfig;
use crate::easing::Easing;
use crate::particle::Particle;
use crate::timeline::{StaggerSchedule, Tween};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::PI;

/// Result of advancing a formation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationStatus {
    Running,
    Complete,
}

/// One formation run over the whole particle set.
#[derive(Debug, Clone)]
pub struct Formation {
    schedule: StaggerSchedule,
    aggregate: Tween,
    elapsed: f32,
    /// +1 or -1 per particle: which side of the straight line the arc bulges to.
    arc_side: Vec<f32>,
    curve_amplitude: f32,
    flight_easing: Easing,
    formed_threshold: f32,
}

impl Formation {
    /// Start a run. Particles keep their current `start`; progress is zeroed.
    pub fn launch<R: Rng + ?Sized>(
        particles: &mut [Particle],
        config: &ButterflyConfig,
        rng: &mut R,
    ) -> Self {
        let schedule = StaggerSchedule::build(
            particles.len(),
            config.formation_duration,
            config.batch_size as usize,
            config.stagger,
            rng,
        );

        for p in particles.iter_mut() {
            p.progress = 0.0;
            p.formed = false;
        }

        let arc_side = (0..particles.len())
            .map(|_| if rng.gen::<bool>() { 1.0 } else { -1.0 })
            .collect();

        Self {
            schedule,
            aggregate: Tween::new(config.formation_duration, config.progress_easing),
            elapsed: 0.0,
            arc_side,
            curve_amplitude: config.curve_amplitude,
            flight_easing: config.flight_easing,
            formed_threshold: config.formed_threshold,
        }
    }

    /// Advance the run by `dt` seconds.
    pub fn advance(&mut self, dt: f32, particles: &mut [Particle]) -> FormationStatus {
        self.elapsed += dt.max(0.0);
        self.aggregate.advance(dt);

        let complete = self.elapsed >= self.schedule.duration();

        for (i, p) in particles.iter_mut().enumerate() {
            let scheduled = if complete {
                1.0
            } else {
                self.schedule.progress_at(i, self.elapsed)
            };
            p.progress = p.progress.max(scheduled);

            if !p.formed {
                let side = self.arc_side.get(i).copied().unwrap_or(1.0);
                p.position = self.flight_position(p, side);
                if p.progress > self.formed_threshold {
                    p.formed = true;
                }
            }
        }

        if complete {
            FormationStatus::Complete
        } else {
            FormationStatus::Running
        }
    }

    fn flight_position(&self, p: &Particle, side: f32) -> Vec2 {
        curved_lerp(
            p.start,
            p.target,
            self.flight_easing.apply(p.progress),
            self.curve_amplitude * side,
            p.progress,
        )
    }

    /// Seconds since launch.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Aggregate progress as a percentage in `[0, 100]`.
    pub fn percent(&self) -> f32 {
        (self.aggregate.value() * 100.0).clamp(0.0, 100.0)
    }
}

/// Eased interpolation bent into an arc.
///
/// `eased` positions the particle along the chord; the sideways bulge is
/// `sin(π·eased) · amplitude · (1 − progress)` so it vanishes on landing.
/// Returns `target` exactly once `progress` reaches 1.
pub fn curved_lerp(start: Vec2, target: Vec2, eased: f32, amplitude: f32, progress: f32) -> Vec2 {
    if progress >= 1.0 {
        return target;
    }
    let chord = target - start;
    let normal = chord.perp().normalize_or_zero();
    let bulge = (PI * eased).sin() * amplitude * (1.0 - progress);
    start.lerp(target, eased) + normal * bulge
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ButterflyShape;
    use crate::spawn::SpawnContext;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn particles(count: u32) -> Vec<Particle> {
        let viewport = Vec2::new(800.0, 600.0);
        let config = ButterflyConfig::default();
        ButterflyShape::new(viewport)
            .generate(count)
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let mut ctx = SpawnContext::new(i as u32, count, viewport, 9);
                Particle::spawn(point, &mut ctx, &config)
            })
            .collect()
    }

    #[test]
    fn test_curved_lerp_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert_eq!(curved_lerp(a, b, 0.0, 50.0, 0.0), a);
        assert_eq!(curved_lerp(a, b, 1.0, 50.0, 1.0), b);
    }

    #[test]
    fn test_curved_lerp_bulges_sideways() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        let mid = curved_lerp(a, b, 0.5, 40.0, 0.5);
        assert!((mid.x - 50.0).abs() < 1e-4);
        assert!((mid.y.abs() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_curved_lerp_same_point() {
        let a = Vec2::new(5.0, 5.0);
        assert_eq!(curved_lerp(a, a, 0.3, 40.0, 0.3), a);
    }

    #[test]
    fn test_run_completes_with_everyone_formed() {
        let mut ps = particles(300);
        let config = ButterflyConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut run = Formation::launch(&mut ps, &config, &mut rng);

        let mut status = FormationStatus::Running;
        let mut frames = 0;
        while status == FormationStatus::Running {
            status = run.advance(1.0 / 60.0, &mut ps);
            frames += 1;
            assert!(frames < 1000);
        }

        assert!(ps.iter().all(|p| p.formed && p.progress == 1.0));
        assert_eq!(run.percent(), 100.0);
    }

    #[test]
    fn test_unformed_particles_land_on_target() {
        let mut ps = particles(50);
        let mut config = ButterflyConfig::default();
        // Nobody counts as formed early, so the animator places every particle
        config.formed_threshold = 0.999;
        let mut rng = SmallRng::seed_from_u64(2);
        let mut run = Formation::launch(&mut ps, &config, &mut rng);
        run.advance(config.formation_duration + 0.1, &mut ps);
        for p in &ps {
            assert_eq!(p.position, p.target);
        }
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut ps = particles(200);
        let config = ButterflyConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut run = Formation::launch(&mut ps, &config, &mut rng);
        let mut last: Vec<f32> = ps.iter().map(|p| p.progress).collect();
        for _ in 0..200 {
            run.advance(1.0 / 60.0, &mut ps);
            for (p, prev) in ps.iter().zip(last.iter_mut()) {
                assert!(p.progress >= *prev);
                *prev = p.progress;
            }
        }
    }

    #[test]
    fn test_aggregate_percent_rises() {
        let mut ps = particles(10);
        let config = ButterflyConfig::default();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut run = Formation::launch(&mut ps, &config, &mut rng);
        assert_eq!(run.percent(), 0.0);
        run.advance(1.0, &mut ps);
        let early = run.percent();
        run.advance(1.0, &mut ps);
        assert!(run.percent() > early && early > 0.0);
    }
}
