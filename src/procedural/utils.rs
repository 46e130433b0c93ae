//! Index and vertex helpers shared by the mesh generators.

use glamx::{Vec2, Vec3};

/// Pushes a discretized counterclockwise circle of the `xz` plane at height `y`.
#[inline]
pub fn push_circle(radius: f32, nsubdiv: u32, dtheta: f32, y: f32, out: &mut Vec<Vec3>) {
    let mut curr_theta = 0.0f32;

    for _ in 0..nsubdiv {
        out.push(Vec3::new(
            curr_theta.cos() * radius,
            y,
            curr_theta.sin() * radius,
        ));
        curr_theta += dtheta;
    }
}

/// Pushes a planar outline lifted to height `y` and rotated by `angle` around the `y` axis.
///
/// The outline lives on the `xz` plane: `outline[i].x` maps to `x` and
/// `outline[i].y` maps to `-z`, the orientation an outline drawn on the `xy`
/// plane gets once tipped over to lie on the floor.
#[inline]
pub fn push_twisted_outline(outline: &[Vec2], y: f32, angle: f32, out: &mut Vec<Vec3>) {
    let (s, c) = angle.sin_cos();

    for p in outline {
        let x = p.x;
        let z = -p.y;
        out.push(Vec3::new(x * c - z * s, y, x * s + z * c));
    }
}

/// Faces joining two closed rings with the same number of vertices.
#[inline]
pub fn push_ring_indices(base_lower: u32, base_upper: u32, nsubdiv: u32, out: &mut Vec<[u32; 3]>) {
    push_open_ring_indices(base_lower, base_upper, nsubdiv, out);

    // Close the seam between the last and the first vertex.
    push_rectangle_indices(
        base_upper,
        base_upper + nsubdiv - 1,
        base_lower,
        base_lower + nsubdiv - 1,
        out,
    );
}

/// Faces joining two open rings with the same number of vertices.
#[inline]
pub fn push_open_ring_indices(base_lower: u32, base_upper: u32, nsubdiv: u32, out: &mut Vec<[u32; 3]>) {
    assert!(nsubdiv > 0);

    for i in 0..nsubdiv - 1 {
        let bl_i = base_lower + i;
        let bu_i = base_upper + i;
        push_rectangle_indices(bu_i + 1, bu_i, bl_i + 1, bl_i, out);
    }
}

/// Fans a closed ring around a single shared vertex (a cap).
#[inline]
pub fn push_fan_indices(base_ring: u32, center: u32, nsubdiv: u32, out: &mut Vec<[u32; 3]>) {
    assert!(nsubdiv > 0);

    for i in 0..nsubdiv - 1 {
        out.push([base_ring + i, center, base_ring + i + 1]);
    }

    out.push([base_ring + nsubdiv - 1, center, base_ring]);
}

/// Two counterclockwise triangles from four corner points.
#[inline]
pub fn push_rectangle_indices(ul: u32, ur: u32, dl: u32, dr: u32, out: &mut Vec<[u32; 3]>) {
    out.push([ul, dl, dr]);
    out.push([dr, ur, ul]);
}

/// Flips the winding of a set of faces.
#[inline]
pub fn reverse_clockwising(indices: &mut [[u32; 3]]) {
    for i in indices.iter_mut() {
        i.swap(0, 1);
    }
}

/// Area-agnostic averaged vertex normals.
///
/// Vertices referenced by no face get a zero normal.
pub fn compute_normals(coordinates: &[Vec3], faces: &[[u32; 3]], normals: &mut Vec<Vec3>) {
    let mut divisor: Vec<f32> = vec![0.0; coordinates.len()];

    normals.clear();
    normals.resize(coordinates.len(), Vec3::ZERO);

    for f in faces.iter() {
        let edge1 = coordinates[f[1] as usize] - coordinates[f[0] as usize];
        let edge2 = coordinates[f[2] as usize] - coordinates[f[0] as usize];
        let normal = edge1.cross(edge2).normalize_or_zero();

        for &v in f {
            normals[v as usize] += normal;
            divisor[v as usize] += 1.0;
        }
    }

    for (n, divisor) in normals.iter_mut().zip(divisor.iter()) {
        if *divisor > 0.0 {
            *n /= *divisor
        }
    }
}

/// Centroid of a set of points (the origin for an empty set).
#[inline]
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }

    points.iter().fold(Vec2::ZERO, |acc, p| acc + *p) / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_ring_has_two_faces_per_quad() {
        let mut idx = Vec::new();
        push_ring_indices(0, 8, 8, &mut idx);
        assert_eq!(idx.len(), 16);
        assert!(idx.iter().flatten().all(|i| *i < 16));
    }

    #[test]
    fn fan_closes_the_ring() {
        let mut idx = Vec::new();
        push_fan_indices(0, 5, 5, &mut idx);
        assert_eq!(idx.len(), 5);
        assert_eq!(idx[4], [4, 5, 0]);
    }

    #[test]
    fn twisted_outline_quarter_turn() {
        let mut out = Vec::new();
        push_twisted_outline(&[Vec2::new(1.0, 0.0)], 2.0, std::f32::consts::FRAC_PI_2, &mut out);
        assert!((out[0] - Vec3::new(0.0, 2.0, 1.0)).length() < 1.0e-6);
    }

    #[test]
    fn normals_of_a_flat_quad_point_up() {
        let coords = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(5.0, 5.0, 5.0),
        ];
        let faces = [[0, 1, 2], [0, 2, 3]];
        let mut normals = Vec::new();
        compute_normals(&coords, &faces, &mut normals);

        for n in &normals[..4] {
            assert!((*n - Vec3::Y).length() < 1.0e-6);
        }
        assert_eq!(normals[4], Vec3::ZERO);
    }
}
