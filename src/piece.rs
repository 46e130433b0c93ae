//! Printed pieces and the arena that owns them.
//!
//! Pieces are never shared: the printer, the forklift and the shelf slots
//! each hold at most a [`PieceId`], and a hand-off moves the id from one
//! owner to the next.

use crate::color::Color;
use crate::printer::PrintShape;
use crate::procedural::RenderMesh;
use crate::shelf::SlotId;
use crate::spatial::SpatialBox;
use glamx::{Pose3, Vec3};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle of a piece stored in [`Pieces`].
    pub struct PieceId;
}

/// The arena of every live piece.
pub type Pieces = SlotMap<PieceId, Piece>;

/// Anything that can be printed, carried or stored.
///
/// The simulation only ever moves transferables around through their world
/// pose and reasons about them through their bounding box.
pub trait Transferable {
    /// Current world pose.
    fn world_pose(&self) -> Pose3;
    /// Moves the object to `pose`.
    fn set_world_pose(&mut self, pose: Pose3);
    /// Bounding box in the object's local frame, scale not applied.
    fn local_bounds(&self) -> SpatialBox;
    /// Scale factors applied before the pose.
    fn scale(&self) -> Vec3 {
        Vec3::ONE
    }

    /// World position of the object origin.
    fn world_position(&self) -> Vec3 {
        self.world_pose().translation
    }

    /// Dimensions of the object once scaled, ignoring its rotation.
    fn scaled_size(&self) -> Vec3 {
        self.local_bounds().size() * self.scale().abs()
    }

    /// Conservative world-space bounding box.
    fn world_bounds(&self) -> SpatialBox {
        let b = self.local_bounds();
        let s = self.scale();
        SpatialBox::new(b.min * s, b.max * s).transformed(self.world_pose())
    }
}

/// A printed piece.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pose: Pose3,
    scale: Vec3,
    mesh: RenderMesh,
    local_bounds: SpatialBox,
    color: Color,
    shape: PrintShape,
    slot: Option<SlotId>,
}

impl Piece {
    /// Creates a piece from its mesh, resting at `pose`.
    ///
    /// The mesh is expected in the piece's local frame: its origin is the
    /// point that follows the fork and lands on the slot board.
    pub fn new(mesh: RenderMesh, color: Color, shape: PrintShape, pose: Pose3) -> Piece {
        let local_bounds = mesh
            .bounds()
            .unwrap_or_else(|| SpatialBox::new(Vec3::ZERO, Vec3::ZERO));

        Piece {
            pose,
            scale: Vec3::ONE,
            mesh,
            local_bounds,
            color,
            shape,
            slot: None,
        }
    }

    /// The piece geometry in its local frame.
    #[inline]
    pub fn mesh(&self) -> &RenderMesh {
        &self.mesh
    }

    /// The piece color.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// What the piece was printed as.
    #[inline]
    pub fn shape(&self) -> PrintShape {
        self.shape
    }

    /// The shelf slot holding this piece, if it is stored.
    #[inline]
    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    pub(crate) fn set_slot(&mut self, slot: Option<SlotId>) {
        self.slot = slot;
    }

    /// Sets the scale factors.
    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Model matrix of the piece, scale included.
    pub fn transformation(&self) -> glamx::Mat4 {
        self.pose.to_mat4() * glamx::Mat4::from_scale(self.scale)
    }
}

impl Transferable for Piece {
    fn world_pose(&self) -> Pose3 {
        self.pose
    }

    fn set_world_pose(&mut self, pose: Pose3) {
        self.pose = pose;
    }

    fn local_bounds(&self) -> SpatialBox {
        self.local_bounds
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::procedural::{self, Profile};
    use glamx::Quat;

    fn piece() -> Piece {
        let pts: Vec<_> = [[0.5, 0.0], [0.5, 1.0]]
            .iter()
            .map(|p| glamx::Vec2::new(p[0], p[1]))
            .collect();
        Piece::new(
            procedural::lathe(&pts, 8),
            color::PIECE_STEEL,
            PrintShape::Revolution(Profile::A1),
            Pose3::IDENTITY,
        )
    }

    #[test]
    fn arena_hands_out_distinct_ids() {
        let mut pieces = Pieces::with_key();
        let a = pieces.insert(piece());
        let b = pieces.insert(piece());
        assert_ne!(a, b);

        pieces.remove(a);
        assert!(!pieces.contains_key(a));
        assert!(pieces.contains_key(b));
    }

    #[test]
    fn world_bounds_follow_pose_and_scale() {
        let mut p = piece();
        p.set_scale(Vec3::splat(2.0));

        let mut pose = Pose3::from(Quat::from_rotation_y(0.3));
        pose.translation = Vec3::new(3.0, 1.0, 0.0);
        p.set_world_pose(pose);

        let b = p.world_bounds();
        assert!((b.min.y - 1.0).abs() < 1.0e-5);
        assert!((b.max.y - 3.0).abs() < 1.0e-5);
        assert!(b.contains_point(Vec3::new(3.0, 2.0, 0.0)));
        assert!((p.scaled_size().y - 2.0).abs() < 1.0e-5);
        assert_eq!(p.world_position(), Vec3::new(3.0, 1.0, 0.0));
        assert!(p.slot().is_none());
    }
}
