//! The butterfly field: owned animation state and its lifecycle.
//!
//! # Phases
//!
//! ```text
//!            trigger()                 run complete
//! Unformed ───────────► Forming ─────────────────────► Formed
//!    ▲                                                   │
//!    │ (transient)        reset()                        │
//!    └──────────────── Resetting ◄───────────────────────┘
//!                          │      run complete
//!                          └──────────────────────────► Formed
//! ```
//!
//! `trigger()` only does something in `Unformed`; `reset()` is accepted in
//! every phase except `Resetting`, so a reset during the first formation
//! restarts it from off-screen.
//!
//! # Frame loop
//!
//! The host calls [`ButterflyField::update`] once per redraw (wall clock) or
//! [`ButterflyField::frame`] with an explicit delta. Input is forwarded with
//! [`ButterflyField::pointer_moved`] and [`ButterflyField::click`].

use crate::config::ButterflyConfig;
use crate::error::ConfigError;
use crate::formation::{Formation, FormationStatus};
use crate::interaction::{Interaction, InteractionParams, RingInstance, Ripple};
use crate::particle::{Particle, ParticleInstance};
use crate::shape::{centroid, ButterflyShape};
use crate::spawn::{entropy_seed, SpawnContext};
use crate::time::FrameClock;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fmt;

/// Mixed into the seed once per reset so every reset scatters differently.
const RESET_SALT: u64 = 0xA24B_AED4_963E_E407;

/// Lifecycle phase of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Particles drift around their start points.
    Unformed,
    /// First formation run in progress.
    Forming,
    /// Shape complete; floating and interactive.
    Formed,
    /// Formation run after a reset in progress.
    Resetting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unformed => "unformed",
            Phase::Forming => "forming",
            Phase::Formed => "formed",
            Phase::Resetting => "resetting",
        };
        f.write_str(name)
    }
}

/// Read-only snapshot of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub particle_count: u32,
    pub formed_count: u32,
    /// Aggregate formation progress in percent, `[0, 100]`.
    pub formation_progress: f32,
    pub fps: f32,
    pub phase: Phase,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} particles | {:.0}% formed | {:.0} fps",
            self.particle_count, self.formation_progress, self.fps
        )
    }
}

/// Control surface exposed to hosts.
///
/// Both commands are best effort: a request that does not apply in the
/// current phase is ignored and reported as `false`.
pub trait ButterflyControl {
    /// Start the formation. Only applies while unformed.
    fn trigger(&mut self) -> bool;
    /// Scatter all particles off-screen and form again.
    fn reset(&mut self) -> bool;
    fn stats(&self) -> Stats;
}

/// Owns the particles and everything that moves them.
pub struct ButterflyField {
    config: ButterflyConfig,
    viewport: Vec2,
    seed: u64,
    particles: Vec<Particle>,
    formation: Option<Formation>,
    interaction: Interaction,
    phase: Phase,
    clock: FrameClock,
    rng: SmallRng,
    /// Animation time driving idle drift.
    time: f32,
    resets: u64,
    mounted: bool,
}

impl ButterflyField {
    /// Build the particle set for `viewport`. Nothing moves until [`mount`](Self::mount).
    pub fn new(config: ButterflyConfig, viewport: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = viewport.max(Vec2::ONE);
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let count = config.particle_count;

        let shape = Self::shape_for(&config, viewport, seed);
        let points = shape.generate(count);
        let center = centroid(&points, shape.center());

        let particles = points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                // Inverted seed keeps start points independent of the shape sampler
                let mut ctx = SpawnContext::new(i as u32, count, viewport, !seed);
                Particle::spawn(point, &mut ctx, &config)
            })
            .collect();

        log::debug!("Generated {} particles for {}x{} (seed {})", count, viewport.x, viewport.y, seed);

        Ok(Self {
            interaction: Interaction::new(InteractionParams::from(&config), center),
            clock: FrameClock::new(config.fps_sample_frames),
            rng: SmallRng::seed_from_u64(seed),
            config,
            viewport,
            seed,
            particles,
            formation: None,
            phase: Phase::Unformed,
            time: 0.0,
            resets: 0,
            mounted: false,
        })
    }

    fn shape_for(config: &ButterflyConfig, viewport: Vec2, seed: u64) -> ButterflyShape {
        ButterflyShape::new(viewport)
            .with_palette(config.palette)
            .with_dots(config.dots)
            .with_seed(seed)
    }

    /// Attach the field to its host. Starts the formation when `auto_form` is set.
    pub fn mount(&mut self) {
        if self.mounted {
            log::debug!("Field already mounted");
            return;
        }
        self.mounted = true;
        log::info!(
            "Mounted butterfly field: {} particles, {}x{} viewport",
            self.particles.len(),
            self.viewport.x,
            self.viewport.y
        );
        if self.config.auto_form {
            self.trigger();
        }
    }

    /// Advance by the wall-clock time since the previous call.
    pub fn update(&mut self) {
        let dt = self.clock.tick();
        self.frame(dt);
    }

    /// Advance by exactly `dt` seconds of animation time. Does nothing while paused.
    pub fn frame(&mut self, dt: f32) {
        if self.clock.is_paused() {
            return;
        }
        let dt = dt.max(0.0);
        self.time += dt;

        match self.phase {
            Phase::Unformed => {
                for p in &mut self.particles {
                    p.position = p.start + p.drift(self.time);
                }
            }
            Phase::Forming | Phase::Resetting => {
                let status = match self.formation.as_mut() {
                    Some(run) => run.advance(dt, &mut self.particles),
                    None => FormationStatus::Complete,
                };
                self.interaction.float(self.time, &mut self.particles);
                if status == FormationStatus::Complete {
                    self.finish_formation();
                }
            }
            Phase::Formed => {
                self.interaction.float(self.time, &mut self.particles);
            }
        }

        self.interaction.age_ripples(dt);
    }

    fn launch(&mut self) {
        self.formation = Some(Formation::launch(&mut self.particles, &self.config, &mut self.rng));
    }

    fn finish_formation(&mut self) {
        let elapsed = self.formation.take().map_or(0.0, |run| run.elapsed());
        log::info!("Formation complete after {:.2}s ({})", elapsed, self.phase);
        self.phase = Phase::Formed;
    }

    /// Forward a cursor position. Returns how many particles were pushed.
    pub fn pointer_moved(&mut self, pointer: Vec2) -> usize {
        if self.clock.is_paused() {
            return 0;
        }
        self.interaction.pointer_moved(pointer, &mut self.particles)
    }

    /// Forward a click. Spawns a ripple ring unless paused.
    pub fn click(&mut self, at: Vec2) -> usize {
        if self.clock.is_paused() {
            log::debug!("Ignoring click while paused");
            return 0;
        }
        self.interaction.click(at, &mut self.particles)
    }

    /// Re-layout the shape for a new viewport. Kinds and indices stay put.
    pub fn resize(&mut self, viewport: Vec2) {
        if viewport.x < 1.0 || viewport.y < 1.0 || viewport == self.viewport {
            return;
        }
        self.viewport = viewport;

        let shape = Self::shape_for(&self.config, viewport, self.seed);
        let points = shape.generate(self.config.particle_count);
        for (p, point) in self.particles.iter_mut().zip(&points) {
            debug_assert_eq!(p.kind, point.kind);
            p.home = point.position;
            p.target = point.position;
            p.color = point.color;
        }
        self.interaction.set_center(centroid(&points, shape.center()));
        log::debug!("Resized field to {}x{}", viewport.x, viewport.y);
    }

    /// Toggle the frame clock. Returns whether the field is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        log::info!("Animation {}", if paused { "paused" } else { "resumed" });
        paused
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ripples(&self) -> &[Ripple] {
        self.interaction.ripples()
    }

    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(ParticleInstance::from_particle).collect()
    }

    pub fn ring_instances(&self) -> Vec<RingInstance> {
        self.interaction.ring_instances()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn config(&self) -> &ButterflyConfig {
        &self.config
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

}

impl ButterflyControl for ButterflyField {
    fn trigger(&mut self) -> bool {
        if self.phase != Phase::Unformed {
            log::debug!("Ignoring form request while {}", self.phase);
            return false;
        }
        for p in &mut self.particles {
            p.start = p.position;
        }
        self.launch();
        self.phase = Phase::Forming;
        log::info!(
            "Formation started: {} particles over {:.1}s",
            self.particles.len(),
            self.config.formation_duration
        );
        true
    }

    fn reset(&mut self) -> bool {
        if self.phase == Phase::Resetting {
            log::debug!("Ignoring reset request while resetting");
            return false;
        }
        self.resets += 1;
        let seed = self.seed ^ self.resets.wrapping_mul(RESET_SALT);
        let count = self.config.particle_count;
        for p in &mut self.particles {
            let mut ctx = SpawnContext::new(p.index, count, self.viewport, seed);
            p.scatter(&mut ctx);
        }
        self.phase = Phase::Unformed;

        self.launch();
        self.phase = Phase::Resetting;
        log::info!("Reset: re-forming {} particles from off-screen", count);
        true
    }

    fn stats(&self) -> Stats {
        let formation_progress = match (&self.formation, self.phase) {
            (Some(run), _) => run.percent(),
            (None, Phase::Formed) => 100.0,
            (None, _) => 0.0,
        };
        Stats {
            particle_count: self.particles.len() as u32,
            formed_count: self.particles.iter().filter(|p| p.formed).count() as u32,
            formation_progress,
            fps: self.clock.fps(),
            phase: self.phase,
        }
    }
}
