//! Easing curves.
//!
//! Every curve satisfies `apply(0) == 0` and `apply(1) == 1`; inputs outside
//! `[0, 1]` are clamped first. Only [`Easing::EaseOutBack`] leaves the unit
//! range in between.

use serde::{Deserialize, Serialize};

/// Progress-to-value mapping used by timelines and tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseOutQuad,
    EaseOutCubic,
    /// Smooth S-curve, used for particle flight.
    #[default]
    EaseInOutCubic,
    EaseInOutQuad,
    /// Slight overshoot before settling.
    EaseOutBack,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseOutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInOutQuad,
        Easing::EaseOutBack,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{:?} at 0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(2.0), 1.0);
    }

    #[test]
    fn test_ease_out_is_ahead_of_linear() {
        assert!(Easing::EaseOutQuad.apply(0.5) > 0.5);
        assert!(Easing::EaseOutCubic.apply(0.5) > Easing::EaseOutQuad.apply(0.5));
    }

    #[test]
    fn test_in_out_is_symmetric() {
        let a = Easing::EaseInOutCubic.apply(0.25);
        let b = Easing::EaseInOutCubic.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_monotonic_except_back() {
        for easing in ALL.iter().filter(|e| **e != Easing::EaseOutBack) {
            let mut last = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= last, "{:?} decreased at {}", easing, i);
                last = v;
            }
        }
    }
}
