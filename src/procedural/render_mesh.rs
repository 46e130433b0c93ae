use super::utils;
use crate::spatial::SpatialBox;
use glamx::{Pose3, Vec2, Vec3};

/// Geometric description of a procedural mesh.
///
/// Vertices, normals and texture coordinates share one index buffer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderMesh {
    /// Coordinates of the mesh vertices.
    pub coords: Vec<Vec3>,
    /// Coordinates of the mesh normals.
    pub normals: Option<Vec<Vec3>>,
    /// Textures coordinates of the mesh.
    pub uvs: Option<Vec<Vec2>>,
    /// Index buffer of the mesh.
    pub indices: Vec<[u32; 3]>,
}

impl RenderMesh {
    /// Creates a new mesh.
    ///
    /// If no `indices` is provided, every three consecutive vertices form a triangle.
    pub fn new(
        coords: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
        indices: Option<Vec<[u32; 3]>>,
    ) -> RenderMesh {
        let indices = indices.unwrap_or_else(|| {
            (0..coords.len() as u32 / 3)
                .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
                .collect()
        });

        RenderMesh {
            coords,
            normals,
            uvs,
            indices,
        }
    }

    /// Whether or not this mesh has normals.
    #[inline]
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// The number of triangles on this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The local bounding box of the vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<SpatialBox> {
        SpatialBox::from_points(&self.coords)
    }

    /// Translates each vertex of this mesh.
    #[inline]
    pub fn translate_by(&mut self, t: Vec3) {
        for c in self.coords.iter_mut() {
            *c += t;
        }
    }

    /// Transforms each vertex and rotates each normal of this mesh.
    #[inline]
    pub fn transform_by(&mut self, t: Pose3) {
        for c in self.coords.iter_mut() {
            *c = t * *c;
        }

        if let Some(normals) = self.normals.as_mut() {
            for n in normals.iter_mut() {
                *n = t.rotation * *n;
            }
        }
    }

    /// Scales each vertex of this mesh.
    ///
    /// Normals are scaled by the inverse factors then renormalized so they
    /// stay perpendicular to the scaled surface.
    #[inline]
    pub fn scale_by(&mut self, s: Vec3) {
        for c in self.coords.iter_mut() {
            *c *= s;
        }

        if let Some(normals) = self.normals.as_mut() {
            let inv_scale = Vec3::ONE / s;
            for n in normals.iter_mut() {
                *n = (*n * inv_scale).normalize_or_zero();
            }
        }
    }

    /// Recomputes the mesh normals from its vertex coordinates and the index buffer.
    #[inline]
    pub fn recompute_normals(&mut self) {
        let mut new_normals = Vec::new();
        utils::compute_normals(&self.coords, &self.indices, &mut new_normals);
        self.normals = Some(new_normals);
    }

    /// Flips the orientation of every triangle and normal of this mesh.
    pub fn flip(&mut self) {
        utils::reverse_clockwising(&mut self.indices);

        if let Some(normals) = self.normals.as_mut() {
            for n in normals.iter_mut() {
                *n = -*n;
            }
        }
    }
}
