use super::render_mesh::RenderMesh;
use super::utils;
use glamx::{Vec2, Vec3};

/// Extrudes a closed planar outline along `+y`, twisting it on the way up.
///
/// The outline is laid on the floor (`outline.y` maps to `-z`), repeated on
/// `steps + 1` levels between `y = 0` and `y = height`, and rotated around the
/// `y` axis by `twist · y / height` radians at each level. Both ends are closed
/// by a fan around the outline centroid, which is correct for star-shaped
/// outlines.
pub fn sweep(outline: &[Vec2], height: f32, steps: u32, twist: f32) -> RenderMesh {
    let mut ring: Vec<Vec2> = outline.to_vec();

    // Side faces come out facing outward only for clockwise outlines.
    if signed_area(&ring) > 0.0 {
        ring.reverse();
    }

    let n = ring.len() as u32;
    if n < 3 {
        return RenderMesh::new(Vec::new(), None, None, Some(Vec::new()));
    }

    let steps = steps.max(1);
    let mut coords = Vec::with_capacity((n * (steps + 3) + 2) as usize);
    let mut indices = Vec::new();

    /*
     * Sides.
     */
    for k in 0..=steps {
        let y = height * k as f32 / steps as f32;
        utils::push_twisted_outline(&ring, y, angle_at(y, height, twist), &mut coords);
    }

    for k in 1..=steps {
        utils::push_ring_indices((k - 1) * n, k * n, n, &mut indices);
    }

    let mut res = RenderMesh::new(coords, None, None, Some(indices));
    res.recompute_normals();

    /*
     * Caps, with their own vertices so they stay flat shaded.
     */
    let center = [utils::centroid(&ring)];
    let mut caps = RenderMesh::new(Vec::new(), None, None, Some(Vec::new()));

    for (y, up) in [(0.0, false), (height, true)] {
        let angle = angle_at(y, height, twist);
        let base = caps.coords.len() as u32;
        utils::push_twisted_outline(&ring, y, angle, &mut caps.coords);
        utils::push_twisted_outline(&center, y, angle, &mut caps.coords);

        let mut fan = Vec::new();
        utils::push_fan_indices(base, base + n, n, &mut fan);
        if !up {
            utils::reverse_clockwising(&mut fan);
        }
        caps.indices.extend(fan);

        let normal = if up { Vec3::Y } else { -Vec3::Y };
        caps.normals
            .get_or_insert_with(Vec::new)
            .extend(std::iter::repeat_n(normal, n as usize + 1));
    }

    append(&mut res, caps);
    res
}

fn angle_at(y: f32, height: f32, twist: f32) -> f32 {
    if height.abs() > f32::EPSILON {
        twist * y / height
    } else {
        0.0
    }
}

/// Signed area of a closed polygon, positive when counterclockwise.
fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

fn append(mesh: &mut RenderMesh, other: RenderMesh) {
    let offset = mesh.coords.len() as u32;
    mesh.coords.extend(other.coords);
    mesh.indices
        .extend(other.indices.into_iter().map(|t| t.map(|i| i + offset)));

    if let (Some(normals), Some(other_normals)) = (mesh.normals.as_mut(), other.normals) {
        normals.extend(other_normals);
    }
}
