use super::render_mesh::RenderMesh;
use super::utils;
use glamx::Vec2;

/// Generates a surface of revolution around the `y` axis.
///
/// Each point of `profile` is a `(radius, height)` pair; consecutive points are
/// joined by a band of quads and every point is swept into a closed ring of
/// `nsubdiv` vertices. The profile is expected to go upward: the faces then
/// point away from the axis. No caps are added.
pub fn lathe(profile: &[Vec2], nsubdiv: u32) -> RenderMesh {
    let nsubdiv = nsubdiv.max(3);
    let dtheta = std::f32::consts::TAU / nsubdiv as f32;

    let mut coords = Vec::with_capacity(profile.len() * nsubdiv as usize);
    let mut uvs = Vec::with_capacity(coords.capacity());
    let mut indices = Vec::new();

    let last = profile.len().saturating_sub(1).max(1) as f32;

    for (j, p) in profile.iter().enumerate() {
        utils::push_circle(p.x, nsubdiv, dtheta, p.y, &mut coords);

        for i in 0..nsubdiv {
            uvs.push(Vec2::new(i as f32 / nsubdiv as f32, j as f32 / last));
        }
    }

    for j in 1..profile.len() as u32 {
        utils::push_ring_indices((j - 1) * nsubdiv, j * nsubdiv, nsubdiv, &mut indices);
    }

    let mut res = RenderMesh::new(coords, None, Some(uvs), Some(indices));
    res.recompute_normals();
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use glamx::Vec3;

    fn ring_radius(p: Vec3) -> f32 {
        Vec2::new(p.x, p.z).length()
    }

    #[test]
    fn cylinder_like_profile() {
        let profile = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 2.0)];
        let mesh = lathe(&profile, 16);

        assert_eq!(mesh.coords.len(), 32);
        assert_eq!(mesh.num_triangles(), 32);

        let b = mesh.bounds().unwrap();
        assert!((b.min.y - 0.0).abs() < 1.0e-6);
        assert!((b.max.y - 2.0).abs() < 1.0e-6);
        assert!(mesh.coords.iter().all(|c| (ring_radius(*c) - 1.0).abs() < 1.0e-5));
    }

    #[test]
    fn side_normals_point_outward() {
        let profile = [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        let mesh = lathe(&profile, 32);
        let normals = mesh.normals.as_ref().unwrap();

        for (c, n) in mesh.coords.iter().zip(normals.iter()) {
            let radial = Vec3::new(c.x, 0.0, c.z).normalize();
            assert!(n.dot(radial) > 0.9);
        }
    }
}
