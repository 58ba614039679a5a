//! Butterfly shape generation.
//!
//! Produces one target point per particle, laid out as a butterfly centered in
//! the viewport. The particle budget is split into fixed shares:
//!
//! | Part | Share |
//! |------|-------|
//! | Body | 15% |
//! | Antennae | 5% |
//! | Upper wings | 60% of the remainder |
//! | Lower wings | 40% of the remainder |
//!
//! Points are emitted in that order, so the [`PointKind`] of a given index
//! depends only on the particle count.

use crate::spawn::SpawnContext;
use crate::visuals::{Color, DotGrid, WingPalette};
use glam::Vec2;
use std::f32::consts::PI;

/// Which part of the butterfly a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    Body,
    Antenna,
    UpperWing,
    LowerWing,
}

impl PointKind {
    /// Base sprite radius in pixels.
    pub fn base_radius(&self) -> f32 {
        match self {
            PointKind::Body => 2.6,
            PointKind::Antenna => 1.6,
            PointKind::UpperWing | PointKind::LowerWing => 2.1,
        }
    }

    pub fn is_wing(&self) -> bool {
        matches!(self, PointKind::UpperWing | PointKind::LowerWing)
    }
}

/// A target point of the butterfly silhouette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterflyPoint {
    pub position: Vec2,
    pub kind: PointKind,
    pub color: Color,
}

/// How a particle count is divided between the parts of the butterfly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub body: u32,
    pub antenna: u32,
    pub upper_wing: u32,
    pub lower_wing: u32,
}

impl Partition {
    /// Body 15%, antennae 5%, wings the rest split 60/40. Each share is
    /// rounded to nearest so every part stays within one point of its fraction.
    pub fn new(count: u32) -> Self {
        let body = percent_of(count, 15);
        let antenna = percent_of(count, 5);
        let wings = count - body - antenna;
        let upper_wing = percent_of(wings, 60);
        Self {
            body,
            antenna,
            upper_wing,
            lower_wing: wings - upper_wing,
        }
    }

    pub fn total(&self) -> u32 {
        self.body + self.antenna + self.upper_wing + self.lower_wing
    }

    /// Part owning the particle at `index`.
    pub fn kind_of(&self, index: u32) -> PointKind {
        if index < self.body {
            PointKind::Body
        } else if index < self.body + self.antenna {
            PointKind::Antenna
        } else if index < self.body + self.antenna + self.upper_wing {
            PointKind::UpperWing
        } else {
            PointKind::LowerWing
        }
    }
}

/// Builder for butterfly point clouds.
///
/// ```ignore
/// let points = ButterflyShape::new(Vec2::new(1920.0, 1080.0))
///     .with_seed(7)
///     .generate(1500);
/// ```
#[derive(Debug, Clone)]
pub struct ButterflyShape {
    viewport: Vec2,
    palette: WingPalette,
    dots: DotGrid,
    seed: u64,
}

/// Wing lobe, described for the right-hand wing and mirrored for the left.
struct Lobe {
    center: Vec2,
    radii: Vec2,
    rotation: f32,
}

const UPPER_LOBE: Lobe = Lobe {
    center: Vec2::new(0.58, -0.28),
    radii: Vec2::new(0.62, 0.42),
    rotation: -0.35,
};

const LOWER_LOBE: Lobe = Lobe {
    center: Vec2::new(0.40, 0.32),
    radii: Vec2::new(0.42, 0.32),
    rotation: 0.5,
};

/// Share of wing points placed on the lobe outline rather than inside it.
const OUTLINE_SHARE: f32 = 0.3;

impl ButterflyShape {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            palette: WingPalette::default(),
            dots: DotGrid::default(),
            seed: 0,
        }
    }

    pub fn with_palette(mut self, palette: WingPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_dots(mut self, dots: DotGrid) -> Self {
        self.dots = dots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Center of the silhouette in viewport pixels.
    pub fn center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Length unit all part proportions are expressed in.
    fn unit(&self) -> f32 {
        self.viewport.x.min(self.viewport.y).max(1.0) * 0.32
    }

    /// Generate exactly `count` points.
    pub fn generate(&self, count: u32) -> Vec<ButterflyPoint> {
        let partition = Partition::new(count);
        let mut points = Vec::with_capacity(count as usize);

        let mut offset = 0;
        for (kind, n) in [
            (PointKind::Body, partition.body),
            (PointKind::Antenna, partition.antenna),
            (PointKind::UpperWing, partition.upper_wing),
            (PointKind::LowerWing, partition.lower_wing),
        ] {
            for local in 0..n {
                let mut ctx = SpawnContext::new(offset + local, count, self.viewport, self.seed);
                let position = match kind {
                    PointKind::Body => self.body_point(local, n, &mut ctx),
                    PointKind::Antenna => self.antenna_point(local, n, &mut ctx),
                    PointKind::UpperWing => self.wing_point(&UPPER_LOBE, local, &mut ctx),
                    PointKind::LowerWing => self.wing_point(&LOWER_LOBE, local, &mut ctx),
                };
                points.push(ButterflyPoint {
                    position,
                    kind,
                    color: self.color_for(kind, position),
                });
            }
            offset += n;
        }

        points
    }

    fn color_for(&self, kind: PointKind, position: Vec2) -> Color {
        match kind {
            PointKind::Body => self.palette.body,
            PointKind::Antenna => self.palette.antenna,
            PointKind::UpperWing | PointKind::LowerWing => {
                self.palette.wing_color(position, &self.dots)
            }
        }
    }

    /// Tapered vertical segment: round head, thorax, then a thinning abdomen.
    fn body_point(&self, local: u32, n: u32, ctx: &mut SpawnContext) -> Vec2 {
        let s = self.unit();
        let t = segment_fraction(local, n);
        let top = self.center().y - 0.45 * s;
        let y = top + t * 1.1 * s;

        let half_width = if t < 0.12 {
            0.055 * s * (0.6 + 0.4 * (PI * t / 0.12).sin())
        } else {
            0.05 * s * (1.0 - 0.7 * (t - 0.12) / 0.88)
        };

        let x = self.center().x + (ctx.random() * 2.0 - 1.0) * half_width;
        Vec2::new(x, y) + ctx.jitter(0.004 * s)
    }

    /// Two curled feelers rising from the head, ending in small clubs.
    fn antenna_point(&self, local: u32, n: u32, ctx: &mut SpawnContext) -> Vec2 {
        let s = self.unit();
        let left = n - n / 2;
        let (side, j, per_side) = if local < left {
            (-1.0, local, left)
        } else {
            (1.0, local - left, n / 2)
        };

        let t = segment_fraction(j, per_side);
        let head = Vec2::new(self.center().x, self.center().y - 0.45 * s);
        let curl = (t * PI).sin() * 0.04 * s;
        let mut p = head
            + Vec2::new(
                side * (0.03 * s + t * 0.28 * s + curl),
                -t * 0.45 * s,
            );
        if t > 0.85 {
            p += ctx.jitter(0.02 * s);
        }
        p
    }

    /// Mirrored wing lobe; even indices go right, odd indices go left.
    fn wing_point(&self, lobe: &Lobe, local: u32, ctx: &mut SpawnContext) -> Vec2 {
        let s = self.unit();
        let side = if local % 2 == 0 { 1.0 } else { -1.0 };

        let q = if ctx.random() < OUTLINE_SHARE {
            let scale = ctx.random_range(0.96, 1.0);
            ctx.random_on_ellipse(lobe.radii * scale)
        } else {
            ctx.random_in_ellipse(lobe.radii)
        };
        let q = Vec2::from_angle(lobe.rotation).rotate(q) + lobe.center;

        self.center() + Vec2::new(side * q.x, q.y) * s
    }
}

/// `count * percent / 100`, rounded half up.
fn percent_of(count: u32, percent: u32) -> u32 {
    ((count as u64 * percent as u64 + 50) / 100) as u32
}

/// `i / (n - 1)`, with counts of 0 or 1 mapping to 0.
fn segment_fraction(i: u32, n: u32) -> f32 {
    i as f32 / n.saturating_sub(1).max(1) as f32
}

/// Mean position of a point cloud, or `fallback` when empty.
pub fn centroid(points: &[ButterflyPoint], fallback: Vec2) -> Vec2 {
    if points.is_empty() {
        return fallback;
    }
    points.iter().map(|p| p.position).sum::<Vec2>() / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hd() -> ButterflyShape {
        ButterflyShape::new(Vec2::new(1920.0, 1080.0)).with_seed(11)
    }

    #[test]
    fn test_partition_reference_count() {
        let p = Partition::new(1500);
        assert_eq!(p.body, 225);
        assert_eq!(p.antenna, 75);
        assert_eq!(p.upper_wing, 720);
        assert_eq!(p.lower_wing, 480);
    }

    #[test]
    fn test_partition_rounds_to_nearest() {
        // 26 * 0.15 = 3.9 and 26 * 0.05 = 1.3
        let p = Partition::new(26);
        assert_eq!(p.body, 4);
        assert_eq!(p.antenna, 1);
        assert_eq!(p.upper_wing + p.lower_wing, 21);

        for n in 20..5000u32 {
            let p = Partition::new(n);
            let wings = (p.upper_wing + p.lower_wing) as f32;
            assert!((wings - n as f32 * 0.8).abs() <= 1.0, "n={}", n);
        }
    }

    #[test]
    fn test_partition_always_sums() {
        for count in 0..500 {
            assert_eq!(Partition::new(count).total(), count);
        }
    }

    #[test]
    fn test_kind_of_follows_partition_order() {
        let p = Partition::new(100);
        assert_eq!(p.kind_of(0), PointKind::Body);
        assert_eq!(p.kind_of(14), PointKind::Body);
        assert_eq!(p.kind_of(15), PointKind::Antenna);
        assert_eq!(p.kind_of(20), PointKind::UpperWing);
        assert_eq!(p.kind_of(99), PointKind::LowerWing);
    }

    #[test]
    fn test_generate_matches_partition() {
        let points = full_hd().generate(1500);
        let partition = Partition::new(1500);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.kind, partition.kind_of(i as u32));
        }
    }

    #[test]
    fn test_degenerate_counts() {
        assert!(full_hd().generate(0).is_empty());
        let one = full_hd().generate(1);
        assert_eq!(one.len(), 1);
        assert!(one[0].position.is_finite());
        let two = full_hd().generate(2);
        assert!(two.iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        assert_eq!(full_hd().generate(400), full_hd().generate(400));
    }

    #[test]
    fn test_points_stay_near_center() {
        let shape = full_hd();
        let unit = 1080.0 * 0.32;
        for point in shape.generate(1500) {
            let d = point.position - shape.center();
            assert!(d.x.abs() < 1.4 * unit && d.y.abs() < 1.2 * unit, "{:?}", point);
        }
    }

    #[test]
    fn test_wings_are_mirrored() {
        let points = full_hd().generate(1000);
        let cx = 960.0;
        let right = points.iter().filter(|p| p.kind.is_wing() && p.position.x > cx).count();
        let left = points.iter().filter(|p| p.kind.is_wing() && p.position.x < cx).count();
        assert!((right as i64 - left as i64).abs() < 60, "{} vs {}", left, right);
    }

    #[test]
    fn test_body_and_antenna_colors() {
        let palette = WingPalette::default();
        for point in full_hd().generate(300) {
            match point.kind {
                PointKind::Body => assert_eq!(point.color, palette.body),
                PointKind::Antenna => assert_eq!(point.color, palette.antenna),
                _ => assert!(
                    [palette.wing, palette.dot_a, palette.dot_b].contains(&point.color)
                ),
            }
        }
    }

    #[test]
    fn test_centroid() {
        let pts = [
            ButterflyPoint { position: Vec2::new(0.0, 0.0), kind: PointKind::Body, color: Color::WHITE },
            ButterflyPoint { position: Vec2::new(10.0, 4.0), kind: PointKind::Body, color: Color::WHITE },
        ];
        assert_eq!(centroid(&pts, Vec2::ZERO), Vec2::new(5.0, 2.0));
        assert_eq!(centroid(&[], Vec2::ONE), Vec2::ONE);
    }
}
