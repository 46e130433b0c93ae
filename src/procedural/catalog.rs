//! Built-in shapes the printer can produce.
//!
//! Revolution profiles (`A1`–`A4`) are chains of cubic Bézier segments given
//! as `(radius, height)` control points. Sweep outlines (`B1`, `B2`, `B4`,
//! `B5`) are closed planar polygons, most of them smoothed by a closed
//! Catmull-Rom spline.

use super::curves::{self, CubicBezier};
use glamx::Vec2;
use std::f32::consts::{PI, TAU};
use std::fmt;

/// Number of samples taken along each Bézier segment of a profile.
pub const PROFILE_SAMPLES: u32 = 20;

const A1: [CubicBezier; 4] = [
    CubicBezier::new([0.0185, 0.0], [0.009, 0.03], [0.0, 0.06], [0.0, 0.085]),
    CubicBezier::new([0.0, 0.085], [0.15, 0.25], [0.25, 0.4], [0.3704, 0.549]),
    CubicBezier::new([0.3704, 0.549], [0.25, 0.7], [0.1, 0.85], [0.0, 0.9085]),
    CubicBezier::new([0.0, 0.9085], [0.05, 0.95], [0.15, 0.98], [0.2778, 1.0]),
];

const A2: [CubicBezier; 4] = [
    CubicBezier::new([0.0, 0.0], [0.2, 0.0], [0.5, 0.0], [0.65, 0.0]),
    CubicBezier::new([0.65, 0.0], [0.8, 0.0], [0.7, 0.5], [0.75, 0.5]),
    CubicBezier::new([0.75, 0.5], [0.8, 0.5], [0.6, 1.5], [0.65, 1.5]),
    CubicBezier::new([0.65, 1.5], [0.7, 1.5], [0.3, 2.0], [0.0, 2.0]),
];

const A3: [CubicBezier; 5] = [
    CubicBezier::new([0.0, 0.0], [0.2, 0.0], [0.5, 0.0], [0.75, 0.0]),
    CubicBezier::new([0.75, 0.0], [1.0, 0.0], [0.5, 1.0], [0.35, 1.0]),
    CubicBezier::new([0.35, 1.0], [0.2, 1.0], [0.35, 1.3], [0.35, 1.3]),
    CubicBezier::new([0.35, 1.3], [0.35, 1.3], [0.7, 1.6], [0.9, 1.6]),
    CubicBezier::new([0.9, 1.6], [1.1, 1.6], [1.0, 2.0], [0.0, 2.0]),
];

const A4: [CubicBezier; 7] = [
    CubicBezier::new([0.0, 0.0], [0.2, 0.0], [0.4, 0.0], [0.6, 0.0]),
    CubicBezier::new([0.6, 0.0], [0.8, 0.0], [0.65, 0.6], [0.7, 0.6]),
    CubicBezier::new([0.7, 0.6], [0.75, 0.6], [0.9, 0.8], [1.1, 0.8]),
    CubicBezier::new([1.1, 0.8], [1.3, 0.8], [1.0, 1.4], [1.05, 1.4]),
    CubicBezier::new([1.05, 1.4], [1.1, 1.4], [0.8, 1.6], [0.7, 1.6]),
    CubicBezier::new([0.7, 1.6], [0.6, 1.6], [0.6, 1.8], [0.6, 1.8]),
    CubicBezier::new([0.6, 1.8], [0.6, 1.8], [0.3, 1.8], [0.0, 1.8]),
];

/// A revolution profile.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Profile {
    /// Wavy silhouette.
    #[default]
    A1,
    /// Stylized "S" contour.
    A2,
    /// Pointed base with a curved top.
    A3,
    /// Double "s" profile.
    A4,
}

impl Profile {
    /// Every profile, in menu order.
    pub const ALL: [Profile; 4] = [Profile::A1, Profile::A2, Profile::A3, Profile::A4];

    /// The Bézier segments of this profile.
    pub fn segments(self) -> &'static [CubicBezier] {
        match self {
            Profile::A1 => &A1,
            Profile::A2 => &A2,
            Profile::A3 => &A3,
            Profile::A4 => &A4,
        }
    }

    /// Sampled `(radius, height)` points, bottom to top.
    pub fn points(self) -> Vec<Vec2> {
        curves::sample_bezier_chain(self.segments(), PROFILE_SAMPLES)
    }
}

/// A sweep outline.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outline {
    /// Equilateral triangle.
    #[default]
    B1,
    /// Smooth eight-pointed star.
    B2,
    /// Upright capsule.
    B4,
    /// Square cross.
    B5,
}

impl Outline {
    /// Every outline, in menu order.
    pub const ALL: [Outline; 4] = [Outline::B1, Outline::B2, Outline::B4, Outline::B5];

    /// The closed outline polygon, without a repeated closing point.
    pub fn points(self) -> Vec<Vec2> {
        match self {
            Outline::B1 => triangle(0.9),
            Outline::B2 => curves::sample_closed_catmull_rom(&star(8, 0.85, 0.35), 100),
            Outline::B4 => curves::sample_closed_catmull_rom(&dedup_closed(capsule(0.9, 2.0, 12)), 120),
            Outline::B5 => curves::sample_closed_catmull_rom(&cross(0.32, 0.7), 180),
        }
    }
}

fn triangle(r: f32) -> Vec<Vec2> {
    (0..3)
        .map(|i| {
            let theta = PI / 2.0 + i as f32 * TAU / 3.0;
            Vec2::new(r * theta.cos(), r * theta.sin())
        })
        .collect()
}

fn star(tips: u32, outer: f32, inner: f32) -> Vec<Vec2> {
    let mut res = Vec::with_capacity(tips as usize * 2);

    for i in 0..tips {
        let theta_o = i as f32 * TAU / tips as f32;
        let theta_i = theta_o + PI / tips as f32;
        res.push(Vec2::new(outer * theta_o.cos(), outer * theta_o.sin()));
        res.push(Vec2::new(inner * theta_i.cos(), inner * theta_i.sin()));
    }

    res
}

fn capsule(width: f32, height: f32, nsubdiv: u32) -> Vec<Vec2> {
    let r = width / 2.0;
    let c = height / 2.0 - r;
    let mut res = Vec::new();

    for i in 0..=nsubdiv {
        let theta = PI * i as f32 / nsubdiv as f32;
        res.push(Vec2::new(r * theta.cos(), c + r * theta.sin()));
    }
    res.push(Vec2::new(-r, -c));

    for i in 0..=nsubdiv {
        let theta = PI + PI * i as f32 / nsubdiv as f32;
        res.push(Vec2::new(r * theta.cos(), -c + r * theta.sin()));
    }
    res.push(Vec2::new(r, c));

    res
}

fn cross(half_width: f32, arm: f32) -> Vec<Vec2> {
    let (t, w) = (half_width, arm);
    [
        [-t, w],
        [t, w],
        [t, t],
        [w, t],
        [w, -t],
        [t, -t],
        [t, -w],
        [-t, -w],
        [-t, -t],
        [-w, -t],
        [-w, t],
        [-t, t],
    ]
    .iter()
    .map(|p| Vec2::new(p[0], p[1]))
    .collect()
}

/// Drops consecutive duplicates, the wrap-around pair included.
fn dedup_closed(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.dedup_by(|a, b| a.distance(*b) < 1.0e-6);
    while points.len() > 1 && points[0].distance(points[points.len() - 1]) < 1.0e-6 {
        points.pop();
    }
    points
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
