//! Integration tests for the butterfly field.
//!
//! These drive the public API headlessly with fixed frame deltas, so every
//! run is deterministic for a given seed.

use glam::Vec2;
use papillon::interaction::decay_offset;
use papillon::{
    ButterflyConfig, ButterflyControl, ButterflyField, ButterflyShape, Partition, Phase, PointKind,
};

const DT: f32 = 1.0 / 60.0;

fn config(count: u32) -> ButterflyConfig {
    ButterflyConfig {
        particle_count: count,
        seed: Some(7),
        ..Default::default()
    }
}

fn field(count: u32, viewport: Vec2) -> ButterflyField {
    ButterflyField::new(config(count), viewport).unwrap()
}

fn run_until_formed(field: &mut ButterflyField) -> u32 {
    for frame in 1..=1000 {
        field.frame(DT);
        if field.phase() == Phase::Formed {
            return frame;
        }
    }
    panic!("formation never completed");
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Shape generation
// ============================================================================

#[test]
fn test_shape_yields_exactly_n_points() {
    let viewport = Vec2::new(1280.0, 720.0);
    for count in [0, 1, 2, 7, 19, 20, 100, 1500, 4096] {
        let points = ButterflyShape::new(viewport).with_seed(3).generate(count);
        assert_eq!(points.len(), count as usize);
        for point in &points {
            assert!(point.position.is_finite());
            assert!(is_hex_color(&point.color.to_hex()), "{}", point.color);
        }
    }
}

#[test]
fn test_partition_matches_fractions() {
    for n in 20..2000u32 {
        let p = Partition::new(n);
        let wings = (p.upper_wing + p.lower_wing) as f32;
        assert!((wings - n as f32 * 0.8).abs() <= 1.0, "n={}", n);
        assert!((p.body as f32 - n as f32 * 0.15).abs() <= 1.0, "n={}", n);
        assert!((p.antenna as f32 - n as f32 * 0.05).abs() <= 1.0, "n={}", n);
        assert!((p.upper_wing as f32 - wings * 0.6).abs() <= 1.0, "n={}", n);
        assert!((p.lower_wing as f32 - wings * 0.4).abs() <= 1.0, "n={}", n);
        assert_eq!(p.total(), n);
    }
}

#[test]
fn test_reference_scenario_full_hd() {
    let points = ButterflyShape::new(Vec2::new(1920.0, 1080.0))
        .with_seed(1)
        .generate(1500);
    let count = |kind| points.iter().filter(|p| p.kind == kind).count();

    assert_eq!(count(PointKind::Body), 225);
    assert_eq!(count(PointKind::Antenna), 75);
    assert_eq!(count(PointKind::UpperWing), 720);
    assert_eq!(count(PointKind::LowerWing), 480);
}

// ============================================================================
// Formation
// ============================================================================

#[test]
fn test_progress_is_monotonic_and_completes() {
    let mut f = field(600, Vec2::new(1280.0, 720.0));
    f.mount();

    let mut last: Vec<f32> = f.particles().iter().map(|p| p.progress).collect();
    while f.phase() == Phase::Forming {
        f.frame(DT);
        for (p, prev) in f.particles().iter().zip(last.iter_mut()) {
            assert!(p.progress >= *prev, "progress went backwards");
            *prev = p.progress;
        }
    }

    assert_eq!(f.phase(), Phase::Formed);
    assert!(f.particles().iter().all(|p| p.progress == 1.0 && p.formed));
    assert_eq!(f.stats().formation_progress, 100.0);
}

#[test]
fn test_double_trigger_is_noop() {
    let viewport = Vec2::new(1280.0, 720.0);
    let mut once = ButterflyField::new(
        ButterflyConfig {
            auto_form: false,
            ..config(400)
        },
        viewport,
    )
    .unwrap();
    let mut twice = ButterflyField::new(
        ButterflyConfig {
            auto_form: false,
            ..config(400)
        },
        viewport,
    )
    .unwrap();

    assert!(once.trigger());
    assert!(twice.trigger());
    for _ in 0..30 {
        once.frame(DT);
        twice.frame(DT);
    }
    assert!(!twice.trigger());
    assert_eq!(twice.phase(), Phase::Forming);

    let frames_once = run_until_formed(&mut once);
    let frames_twice = run_until_formed(&mut twice);
    assert_eq!(frames_once, frames_twice);
    for (a, b) in once.particles().iter().zip(twice.particles()) {
        assert_eq!(a.position, b.position);
    }
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_round_trip_returns_home() {
    let mut f = field(800, Vec2::new(1920.0, 1080.0));
    f.mount();
    run_until_formed(&mut f);
    let homes: Vec<Vec2> = f.particles().iter().map(|p| p.home).collect();

    assert!(f.reset());
    let viewport = f.viewport();
    for p in f.particles() {
        let outside = p.position.x < 0.0
            || p.position.y < 0.0
            || p.position.x > viewport.x
            || p.position.y > viewport.y;
        assert!(outside, "reset start {:?} is on screen", p.position);
        assert_eq!(p.progress, 0.0);
        assert!(!p.formed);
    }

    run_until_formed(&mut f);
    for (p, home) in f.particles().iter().zip(&homes) {
        assert_eq!(p.target, *home);
        assert_eq!(p.offset, Vec2::ZERO);
        // Rendered position is the target plus idle drift only
        assert!(p.position.distance(*home) <= p.amplitude * 1.2 + 1e-3);
    }
}

// ============================================================================
// Interaction
// ============================================================================

#[test]
fn test_offsets_decay_to_zero() {
    let mut f = field(500, Vec2::new(1280.0, 720.0));
    f.mount();
    run_until_formed(&mut f);

    let center = Vec2::new(640.0, 360.0);
    for i in 0..20 {
        f.pointer_moved(center + Vec2::new(i as f32 * 3.0, 0.0));
        f.click(center);
    }
    assert!(f.particles().iter().any(|p| p.offset != Vec2::ZERO));

    for _ in 0..200 {
        f.frame(DT);
    }
    assert!(f.particles().iter().all(|p| p.offset == Vec2::ZERO));
}

#[test]
fn test_decay_is_bounded_for_any_magnitude() {
    let keep = 1.0 - ButterflyConfig::default().offset_decay;
    for magnitude in [1e-2_f32, 1.0, 60.0, 1e4, 1e6] {
        let bound = ((magnitude / 1e-3).ln() / -keep.ln()).ceil() as u32 + 1;
        let mut offset = Vec2::new(magnitude, 0.0);
        let mut frames = 0;
        while offset != Vec2::ZERO {
            offset = decay_offset(offset, keep);
            frames += 1;
            assert!(frames <= bound, "{} not settled in {} frames", magnitude, bound);
        }
    }
}

#[test]
fn test_far_click_only_spawns_ripple() {
    let mut f = field(1500, Vec2::new(1920.0, 1080.0));
    f.mount();
    run_until_formed(&mut f);

    let far = Vec2::new(10.0, 10.0);
    assert!(f.particles().iter().all(|p| p.position.distance(far) > 120.0));

    let before: Vec<Vec2> = f.particles().iter().map(|p| p.offset).collect();
    assert_eq!(f.click(far), 0);
    let after: Vec<Vec2> = f.particles().iter().map(|p| p.offset).collect();
    assert_eq!(before, after);
    assert_eq!(f.ripples().len(), 1);
    assert_eq!(f.ring_instances().len(), 1);

    for _ in 0..55 {
        f.frame(DT);
    }
    assert_eq!(f.ripples().len(), 1);
    for _ in 0..10 {
        f.frame(DT);
    }
    assert!(f.ripples().is_empty());
}

#[test]
fn test_pointer_only_moves_nearby_particles() {
    let mut f = field(1500, Vec2::new(1920.0, 1080.0));
    f.mount();
    run_until_formed(&mut f);

    let pointer = f.particles()[400].position;
    let pushed = f.pointer_moved(pointer);
    assert!(pushed > 0);
    for p in f.particles() {
        if p.position.distance(pointer) >= 120.0 {
            assert_eq!(p.offset, Vec2::ZERO);
        }
    }
}

// ============================================================================
// Instances
// ============================================================================

#[test]
fn test_one_instance_per_particle() {
    let mut f = field(300, Vec2::new(800.0, 600.0));
    f.mount();
    f.frame(DT);
    let instances = f.instances();
    assert_eq!(instances.len(), 300);
    for (inst, p) in instances.iter().zip(f.particles()) {
        assert_eq!(inst.position, p.position.to_array());
        assert!(inst.color.iter().all(|c| (0.0..=1.0).contains(c)));
    }
}
