//! Frame timing for the animation loop.
//!
//! [`FrameClock`] turns wall-clock instants into per-frame delta times and
//! keeps a frame counter plus an fps estimate that is refreshed every
//! `sample_frames` frames.
//!
//! ```ignore
//! use papillon::time::FrameClock;
//!
//! let mut clock = FrameClock::new(30);
//!
//! // In the redraw handler:
//! let dt = clock.tick();
//! field.frame(dt);
//!
//! println!("Frame {} at {:.1} fps", clock.frame(), clock.fps());
//! ```
//!
//! Tests drive the clock with [`FrameClock::advance`] instead, which takes an
//! explicit raw delta and never looks at the system clock.

use std::time::Instant;

/// Largest delta handed to the animation, in seconds.
///
/// A frame that took longer (window drag, debugger pause) is treated as if
/// it took this long so the formation does not jump to the end.
pub const MAX_DELTA: f32 = 0.1;

/// Per-frame time source.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Instant of the previous wall-clock tick.
    last_frame: Option<Instant>,
    /// Scaled animation time in seconds.
    elapsed_secs: f32,
    /// Scaled delta of the last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Most recent fps estimate.
    fps: f32,
    /// Frames per fps estimate.
    sample_frames: u32,
    /// Raw seconds accumulated in the current sample.
    sample_secs: f32,
    /// Frames accumulated in the current sample.
    sample_count: u32,
    paused: bool,
    time_scale: f32,
}

impl FrameClock {
    /// Create a clock that re-estimates fps every `sample_frames` frames.
    pub fn new(sample_frames: u32) -> Self {
        Self {
            last_frame: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            sample_frames: sample_frames.max(1),
            sample_secs: 0.0,
            sample_count: 0,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Tick against the system clock. Returns the animation delta.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Tick at a given instant. The first tick reports a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_frame = Some(now);
        self.advance(raw)
    }

    /// Advance by an explicit raw delta in seconds. Returns the animation delta.
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        let raw_delta = raw_delta.max(0.0);
        self.frame_count += 1;

        self.sample_secs += raw_delta;
        self.sample_count += 1;
        if self.sample_count >= self.sample_frames {
            if self.sample_secs > 0.0 {
                self.fps = self.sample_count as f32 / self.sample_secs;
            }
            self.sample_secs = 0.0;
            self.sample_count = 0;
        }

        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        self.delta_secs = raw_delta.min(MAX_DELTA) * self.time_scale;
        self.elapsed_secs += self.delta_secs;
        self.delta_secs
    }

    /// Scaled animation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Scaled delta of the last frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames ticked, paused frames included.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Latest fps estimate; 0.0 until the first sample completes.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether a sample period ended on the last tick.
    #[inline]
    pub fn sample_ready(&self) -> bool {
        self.frame_count > 0 && self.sample_count == 0
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// While paused, `delta()` is 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state. Returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = slow motion
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(30)
    }
}
