//! Timelines: a single eased tween and a staggered, batched schedule.
//!
//! The schedule hands every particle its own `(delay, span)` window inside a
//! fixed total duration. Particles are shuffled into batches; batches start
//! one after another across the first part of the run, and each particle
//! adds a little random jitter on top of its batch offset:
//!
//! ```text
//! duration |---------------------------------------------|
//! spread   |<---- stagger * duration ---->|
//! batch 0  [j]====================================|
//! batch 1      [ j ]==================================|
//! batch 2             [j]=================================|
//! ```
//!
//! Every window ends no later than `duration`, so all particles finish
//! together with the aggregate progress tween.

use crate::easing::Easing;
use rand::seq::SliceRandom;
use rand::Rng;

/// Share of the stagger spread taken up by batch offsets; the rest is jitter.
const BATCH_SHARE: f32 = 0.7;

/// A single eased timeline from 0 to 1.
#[derive(Debug, Clone)]
pub struct Tween {
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds and return the eased value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Eased progress.
    pub fn value(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Timing window of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Seconds after launch before the particle starts moving.
    pub delay: f32,
    /// Seconds the particle takes once started.
    pub span: f32,
}

impl Slot {
    /// Linear progress at `elapsed` seconds after launch.
    pub fn progress_at(&self, elapsed: f32) -> f32 {
        ((elapsed - self.delay) / self.span).clamp(0.0, 1.0)
    }
}

/// Per-particle timing for one formation run.
#[derive(Debug, Clone)]
pub struct StaggerSchedule {
    slots: Vec<Slot>,
    duration: f32,
}

impl StaggerSchedule {
    /// Build a schedule for `count` particles.
    ///
    /// `stagger` is the fraction of `duration` over which start times are
    /// spread; `0.0` starts everything at once.
    pub fn build<R: Rng + ?Sized>(
        count: usize,
        duration: f32,
        batch_size: usize,
        stagger: f32,
        rng: &mut R,
    ) -> Self {
        let duration = duration.max(f32::EPSILON);
        let spread = duration * stagger.clamp(0.0, 0.99);
        let span = duration - spread;
        let batch_size = batch_size.max(1);
        let batches = count.div_ceil(batch_size).max(1);

        let mut order: Vec<usize> = (0..count).collect();
        order.shuffle(rng);

        let mut slots = vec![Slot { delay: 0.0, span }; count];
        for (position, &index) in order.iter().enumerate() {
            let batch = position / batch_size;
            let batch_offset = batch as f32 / batches as f32 * spread * BATCH_SHARE;
            let jitter = rng.gen::<f32>() * spread * (1.0 - BATCH_SHARE);
            slots[index].delay = batch_offset + jitter;
        }

        Self { slots, duration }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    /// Linear progress of particle `index` at `elapsed`; 1.0 once the run is over.
    pub fn progress_at(&self, index: usize, elapsed: f32) -> f32 {
        if elapsed >= self.duration {
            return 1.0;
        }
        self.slots
            .get(index)
            .map_or(1.0, |slot| slot.progress_at(elapsed))
    }
}
