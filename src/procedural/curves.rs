//! Curve sampling: cubic Bézier segments and closed centripetal Catmull-Rom splines.

use glamx::Vec2;

/// A planar cubic Bézier segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    /// Creates a segment from its four control points given as `[x, y]` pairs.
    pub const fn new(p0: [f32; 2], p1: [f32; 2], p2: [f32; 2], p3: [f32; 2]) -> CubicBezier {
        CubicBezier {
            p0: Vec2::new(p0[0], p0[1]),
            p1: Vec2::new(p1[0], p1[1]),
            p2: Vec2::new(p2[0], p2[1]),
            p3: Vec2::new(p3[0], p3[1]),
        }
    }

    /// The point at parameter `t` in `[0, 1]`.
    #[inline]
    pub fn point(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }
}

/// Samples a chain of Bézier segments with `samples + 1` evenly spaced
/// parameters per segment.
///
/// Junction points are emitted twice, once as the end of a segment and once
/// as the start of the next.
pub fn sample_bezier_chain(segments: &[CubicBezier], samples: u32) -> Vec<Vec2> {
    let samples = samples.max(1);
    let mut out = Vec::with_capacity(segments.len() * (samples as usize + 1));

    for seg in segments {
        for i in 0..=samples {
            out.push(seg.point(i as f32 / samples as f32));
        }
    }

    out
}

/// Samples `divisions` points of the closed centripetal Catmull-Rom spline
/// through `points`, evenly spaced in curve parameter.
///
/// The closing point (equal to the first one) is not repeated.
pub fn sample_closed_catmull_rom(points: &[Vec2], divisions: u32) -> Vec<Vec2> {
    let n = points.len();
    if n < 2 || divisions == 0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(divisions as usize);

    for d in 0..divisions {
        let p = n as f32 * (d as f32 / divisions as f32);
        let seg = (p.floor() as usize).min(n - 1);
        let weight = p - seg as f32;

        let p0 = points[(seg + n - 1) % n];
        let p1 = points[seg];
        let p2 = points[(seg + 1) % n];
        let p3 = points[(seg + 2) % n];

        out.push(centripetal_segment(p0, p1, p2, p3, weight));
    }

    out
}

/// Evaluates the non-uniform (centripetal) Catmull-Rom segment between `p1` and `p2`.
fn centripetal_segment(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mut dt0 = p0.distance(p1).sqrt();
    let mut dt1 = p1.distance(p2).sqrt();
    let mut dt2 = p2.distance(p3).sqrt();

    // Coincident control points.
    if dt1 < 1.0e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1.0e-4 {
        dt0 = dt1;
    }
    if dt2 < 1.0e-4 {
        dt2 = dt1;
    }

    let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    // Cubic Hermite between p1 and p2 with tangents t1 and t2.
    let c0 = p1;
    let c1 = t1;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
    let c3 = 2.0 * p1 - 2.0 * p2 + t1 + t2;

    c0 + c1 * t + c2 * (t * t) + c3 * (t * t * t)
}
