//! Axis-aligned bounding boxes.
//!
//! [`SpatialBox`] is the only collision primitive of the simulation. Obstacles
//! (printer, shelf, walls) are reduced to one box each when the forklift
//! environment is bound, and the forklift chassis is tested against them as a
//! center plus half-extents footprint on the ground plane.

use glamx::{Pose3, Vec3};

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialBox {
    /// Corner with the smallest coordinates.
    pub min: Vec3,
    /// Corner with the largest coordinates.
    pub max: Vec3,
}

impl SpatialBox {
    /// Creates a box from its two corners.
    ///
    /// The corners are re-ordered component-wise so `min <= max` always holds.
    #[inline]
    pub fn new(a: Vec3, b: Vec3) -> SpatialBox {
        SpatialBox {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centered at `center` with the given half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> SpatialBox {
        let he = half_extents.abs();
        SpatialBox {
            min: center - he,
            max: center + he,
        }
    }

    /// The smallest box containing all the given points.
    ///
    /// Returns `None` if `points` is empty.
    pub fn from_points(points: &[Vec3]) -> Option<SpatialBox> {
        let (first, rest) = points.split_first()?;
        let mut res = SpatialBox {
            min: *first,
            max: *first,
        };

        for p in rest {
            res.min = res.min.min(*p);
            res.max = res.max.max(*p);
        }

        Some(res)
    }

    /// The smallest box containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &SpatialBox) -> SpatialBox {
        SpatialBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box dimensions.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full box dimensions.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `p` lies inside the box (boundary included).
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Whether the two boxes intersect (touching counts).
    #[inline]
    pub fn intersects(&self, other: &SpatialBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Tests a ground footprint against this box, ignoring the Y axis.
    ///
    /// The footprint is the rectangle `[center.x - hx, center.x + hx] × [center.z - hz, center.z + hz]`.
    /// The box is shrunk by `skin` on each side, so a footprint resting against a
    /// face (or penetrating it by less than `skin`) does not count as overlapping.
    #[inline]
    pub fn overlaps_footprint(&self, center: Vec3, hx: f32, hz: f32, skin: f32) -> bool {
        center.x + hx > self.min.x + skin
            && center.x - hx < self.max.x - skin
            && center.z + hz > self.min.z + skin
            && center.z - hz < self.max.z - skin
    }

    /// Area of the intersection between a ground footprint and this box shrunk by `skin`.
    ///
    /// Zero whenever [`overlaps_footprint`](Self::overlaps_footprint) is `false`.
    #[inline]
    pub fn footprint_overlap_area(&self, center: Vec3, hx: f32, hz: f32, skin: f32) -> f32 {
        let ox = (center.x + hx).min(self.max.x - skin) - (center.x - hx).max(self.min.x + skin);
        let oz = (center.z + hz).min(self.max.z - skin) - (center.z - hz).max(self.min.z + skin);

        if ox > 0.0 && oz > 0.0 {
            ox * oz
        } else {
            0.0
        }
    }

    /// Translates the box by `t`.
    #[inline]
    pub fn translated(&self, t: Vec3) -> SpatialBox {
        SpatialBox {
            min: self.min + t,
            max: self.max + t,
        }
    }

    /// The axis-aligned box enclosing this box once transformed by `pose`.
    ///
    /// This is conservative: rotating a box and re-fitting an AABB around it
    /// generally grows it.
    pub fn transformed(&self, pose: Pose3) -> SpatialBox {
        let corners = self.corners().map(|c| pose * c);
        let mut res = SpatialBox {
            min: corners[0],
            max: corners[0],
        };

        for c in &corners[1..] {
            res.min = res.min.min(*c);
            res.max = res.max.max(*c);
        }

        res
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

/// Anything the forklift chassis can collide with.
///
/// The box is read once, when the environment is bound, so implementors are
/// assumed static for the session.
pub trait Obstacle {
    /// World-space bounding box of the obstacle.
    fn obstacle_box(&self) -> SpatialBox;
}

impl Obstacle for SpatialBox {
    fn obstacle_box(&self) -> SpatialBox {
        *self
    }
}
