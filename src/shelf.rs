//! The shelving unit: a fixed grid of storage slots.

use crate::color::{self, Color};
use crate::error::ConfigError;
use crate::piece::{PieceId, Pieces, Transferable};
use crate::spatial::{Obstacle, SpatialBox};
use glamx::{Pose3, Quat, Vec3};
use log::debug;
use std::fmt;

/// Shelf geometry and placement rules.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShelfConfig {
    /// World position of the shelf root (center of the unit, on the floor).
    pub position: Vec3,
    /// Rotation of the shelf around the vertical axis, in radians.
    pub yaw: f32,
    /// Number of slots per level.
    pub columns: u32,
    /// Number of boards.
    pub levels: u32,
    /// Width of one slot along the shelf.
    pub slot_width: f32,
    /// Vertical distance between boards.
    pub level_height: f32,
    /// Depth of the boards.
    pub depth: f32,
    /// Thickness of the posts.
    pub post_thickness: f32,
    /// Height above a board at which stored pieces rest.
    pub rest_lift: f32,
    /// Height above a board at which the highlight is drawn.
    pub highlight_lift: f32,
    /// Fraction of the slot envelope a piece may fill.
    pub fit_fraction: f32,
    /// Duration of the slide-in animation of a placed piece, in seconds.
    pub placement_duration: f32,
    /// Color of the slot highlight.
    pub highlight_color: Color,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        ShelfConfig {
            position: Vec3::new(8.0, 0.0, -3.0),
            yaw: 0.0,
            columns: 8,
            levels: 2,
            slot_width: 2.5,
            level_height: 2.5,
            depth: 2.0,
            post_thickness: 0.14,
            rest_lift: 0.1,
            highlight_lift: 0.18,
            fit_fraction: 0.9,
            placement_duration: 1.0 / 3.0,
            highlight_color: color::HIGHLIGHT_GREEN,
        }
    }
}

impl ShelfConfig {
    /// Moves the shelf.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the grid size.
    pub fn with_grid(mut self, levels: u32, columns: u32) -> Self {
        self.levels = levels;
        self.columns = columns;
        self
    }

    /// Checks the grid size and every dimension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("shelf columns", self.columns as f32)?;
        ConfigError::check_positive("shelf levels", self.levels as f32)?;
        ConfigError::check_positive("shelf slot width", self.slot_width)?;
        ConfigError::check_positive("shelf level height", self.level_height)?;
        ConfigError::check_positive("shelf depth", self.depth)?;
        ConfigError::check_positive("shelf placement duration", self.placement_duration)?;
        ConfigError::check_range("shelf fit fraction", self.fit_fraction, f32::EPSILON, 1.0)
    }
}

/// Address of a slot.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId {
    /// Board index, from the bottom.
    pub level: u32,
    /// Column index, from the shelf's local `-x` side.
    pub column: u32,
}

impl SlotId {
    /// Creates a slot address.
    pub fn new(level: u32, column: u32) -> SlotId {
        SlotId { level, column }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} column {}", self.level, self.column)
    }
}

/// One storage position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Address of the slot.
    pub id: SlotId,
    /// The stored piece.
    pub occupant: Option<PieceId>,
}

impl Slot {
    /// Whether a piece is stored here.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// The `levels × columns` grid of slots, level-major.
#[derive(Clone, Debug)]
pub struct SlotTable {
    levels: u32,
    columns: u32,
    slots: Vec<Slot>,
}

impl SlotTable {
    /// A table with every slot free.
    pub fn new(levels: u32, columns: u32) -> SlotTable {
        let slots = (0..levels)
            .flat_map(|level| {
                (0..columns).map(move |column| Slot {
                    id: SlotId::new(level, column),
                    occupant: None,
                })
            })
            .collect();

        SlotTable {
            levels,
            columns,
            slots,
        }
    }

    /// Number of boards.
    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Number of slots per board.
    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slot at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index(&self, id: SlotId) -> Option<usize> {
        (id.level < self.levels && id.column < self.columns)
            .then(|| (id.level * self.columns + id.column) as usize)
    }

    /// The slot at `id`.
    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.index(id).map(|i| &self.slots[i])
    }

    fn get_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.index(id).map(move |i| &mut self.slots[i])
    }

    /// Every slot, level by level.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }
}

/// Result of a free-slot lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotMatch {
    /// The slot found.
    pub slot: SlotId,
    /// World position of the slot.
    pub position: Vec3,
    /// Distance from the query point.
    pub distance: f32,
}

/// Result of an occupied-slot lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectMatch {
    /// The stored piece.
    pub piece: PieceId,
    /// Its slot.
    pub slot: SlotId,
    /// Distance from the query point to the slot.
    pub distance: f32,
}

/// What the highlight shows.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum HighlightMode {
    /// The nearest free slot, while carrying.
    Placing,
    /// The slot of the nearest stored piece, while empty-handed.
    Picking,
}

/// The single slot highlight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Highlight {
    /// Why the slot is highlighted.
    pub mode: HighlightMode,
    /// The highlighted slot.
    pub slot: SlotId,
    /// World position of the highlight marker.
    pub position: Vec3,
    /// Color of the highlight marker.
    pub color: Color,
}

/// A piece sliding into its slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementAnimation {
    /// The moving piece.
    pub piece: PieceId,
    /// World position when placed.
    pub start: Vec3,
    /// World position of the slot.
    pub target: Vec3,
    /// Time spent so far.
    pub elapsed: f32,
    /// Total duration.
    pub duration: f32,
}

impl PlacementAnimation {
    /// Advances by `dt` and returns the new position.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.position()
    }

    /// Position at the current time, eased out.
    pub fn position(&self) -> Vec3 {
        if self.is_finished() {
            return self.target;
        }

        let t = self.elapsed / self.duration;
        let k = 1.0 - (1.0 - t).powi(3);
        self.start.lerp(self.target, k)
    }

    /// Whether the piece reached its slot.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// A shelving unit.
#[derive(Clone, Debug)]
pub struct Shelf {
    config: ShelfConfig,
    pose: Pose3,
    table: SlotTable,
    highlight: Option<Highlight>,
    animations: Vec<PlacementAnimation>,
}

impl Shelf {
    /// Creates an empty shelf.
    pub fn new(config: ShelfConfig) -> Shelf {
        let mut pose = Pose3::from(Quat::from_rotation_y(config.yaw));
        pose.translation = config.position;

        Shelf {
            config,
            pose,
            table: SlotTable::new(config.levels, config.columns),
            highlight: None,
            animations: Vec::new(),
        }
    }

    /// The shelf configuration.
    #[inline]
    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    /// World pose of the shelf root.
    #[inline]
    pub fn pose(&self) -> Pose3 {
        self.pose
    }

    /// World position of the shelf root.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.pose.translation
    }

    /// The slot table.
    #[inline]
    pub fn slots(&self) -> &SlotTable {
        &self.table
    }

    /// Number of stored pieces.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.table.occupied_count()
    }

    /// Where a piece stored in `slot` rests, in shelf-local coordinates.
    pub fn slot_local_position(&self, slot: SlotId) -> Vec3 {
        self.slot_local_point(slot, self.config.rest_lift)
    }

    /// Where a piece stored in `slot` rests, in world coordinates.
    pub fn slot_world_position(&self, slot: SlotId) -> Vec3 {
        self.pose * self.slot_local_position(slot)
    }

    fn slot_local_point(&self, slot: SlotId, lift: f32) -> Vec3 {
        let c = &self.config;
        Vec3::new(
            (slot.column as f32 + 0.5) * c.slot_width - c.columns as f32 * c.slot_width / 2.0,
            (slot.level + 1) as f32 * c.level_height + lift,
            0.0,
        )
    }

    /// The free slot nearest to `world_pos`.
    ///
    /// Ties go to the first slot in table order.
    pub fn find_nearest_free_slot(&self, world_pos: Vec3) -> Option<SlotMatch> {
        let mut best: Option<SlotMatch> = None;

        for slot in self.table.iter().filter(|s| !s.is_occupied()) {
            let position = self.slot_world_position(slot.id);
            let distance = position.distance(world_pos);

            if best.is_none_or(|b| distance < b.distance) {
                best = Some(SlotMatch {
                    slot: slot.id,
                    position,
                    distance,
                });
            }
        }

        best
    }

    /// The stored piece whose slot is nearest to `world_pos`.
    ///
    /// Ties go to the first slot in table order.
    pub fn find_nearest_occupied_object(&self, world_pos: Vec3) -> Option<ObjectMatch> {
        let mut best: Option<ObjectMatch> = None;

        for slot in self.table.iter() {
            let Some(piece) = slot.occupant else {
                continue;
            };
            let distance = self.slot_world_position(slot.id).distance(world_pos);

            if best.is_none_or(|b| distance < b.distance) {
                best = Some(ObjectMatch {
                    piece,
                    slot: slot.id,
                    distance,
                });
            }
        }

        best
    }

    /// Whether a piece of the given size fits in a slot.
    pub fn fits(&self, size: Vec3) -> bool {
        let c = &self.config;
        size.x <= c.slot_width * c.fit_fraction
            && size.z <= c.depth * c.fit_fraction
            && size.y <= c.level_height * c.fit_fraction
    }

    /// Stores `piece` in the free slot nearest to `world_pos`.
    ///
    /// Fails if the piece is unknown or already stored, if no free slot lies
    /// within `reach` of `world_pos`, or if the piece does not fit. On success the piece takes
    /// the shelf orientation, its scale is reset and it starts sliding into
    /// the slot; the highlight is hidden.
    pub fn add_object(
        &mut self,
        piece: PieceId,
        world_pos: Vec3,
        reach: f32,
        pieces: &mut Pieces,
    ) -> bool {
        let Some(p) = pieces.get_mut(piece) else {
            return false;
        };
        if p.slot().is_some() {
            return false;
        }

        let Some(found) = self.find_nearest_free_slot(world_pos) else {
            debug!("Shelf is full.");
            return false;
        };
        if found.distance > reach {
            debug!(
                "Nearest free slot ({}) is out of reach: {:.2}.",
                found.slot, found.distance
            );
            return false;
        }
        if !self.fits(p.local_bounds().size()) {
            debug!("Piece does not fit in slot {}.", found.slot);
            return false;
        }

        let start = p.world_position();
        let mut pose = Pose3::from(self.pose.rotation);
        pose.translation = start;
        p.set_world_pose(pose);
        p.set_scale(Vec3::ONE);
        p.set_slot(Some(found.slot));

        if let Some(slot) = self.table.get_mut(found.slot) {
            slot.occupant = Some(piece);
        }

        self.animations.push(PlacementAnimation {
            piece,
            start,
            target: found.position,
            elapsed: 0.0,
            duration: self.config.placement_duration,
        });
        self.hide_highlight();

        debug!("Stored piece in slot {}.", found.slot);
        true
    }

    /// Takes `piece` off the shelf, freeing its slot.
    ///
    /// The slot is found through the piece's own slot reference. A piece
    /// still sliding in is snapped to its slot first.
    pub fn remove_object(&mut self, piece: PieceId, pieces: &mut Pieces) -> bool {
        let Some(p) = pieces.get_mut(piece) else {
            return false;
        };
        let Some(slot_id) = p.slot() else {
            return false;
        };
        let Some(slot) = self.table.get_mut(slot_id) else {
            return false;
        };
        if slot.occupant != Some(piece) {
            return false;
        }

        if let Some(i) = self.animations.iter().position(|a| a.piece == piece) {
            let anim = self.animations.swap_remove(i);
            let mut pose = p.world_pose();
            pose.translation = anim.target;
            p.set_world_pose(pose);
        }

        slot.occupant = None;
        p.set_slot(None);

        debug!("Freed slot {}.", slot_id);
        true
    }

    /// Points the highlight at the slot relevant for `mode` near `reference`.
    ///
    /// The highlight is hidden when no qualifying slot is within `reach`.
    pub fn refresh_highlight(
        &mut self,
        mode: HighlightMode,
        reference: Vec3,
        reach: f32,
    ) -> Option<Highlight> {
        let slot = match mode {
            HighlightMode::Placing => self
                .find_nearest_free_slot(reference)
                .filter(|m| m.distance <= reach)
                .map(|m| m.slot),
            HighlightMode::Picking => self
                .find_nearest_occupied_object(reference)
                .filter(|m| m.distance <= reach)
                .map(|m| m.slot),
        };

        self.highlight = slot.map(|slot| Highlight {
            mode,
            slot,
            position: self.pose * self.slot_local_point(slot, self.config.highlight_lift),
            color: self.config.highlight_color,
        });

        self.highlight
    }

    /// Hides the highlight.
    #[inline]
    pub fn hide_highlight(&mut self) {
        self.highlight = None;
    }

    /// The visible highlight, if any.
    #[inline]
    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    /// Advances the placement animations and moves their pieces.
    pub fn animate(&mut self, dt: f32, pieces: &mut Pieces) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.animations.retain_mut(|anim| {
            let Some(p) = pieces.get_mut(anim.piece) else {
                return false;
            };

            let mut pose = p.world_pose();
            pose.translation = anim.advance(dt);
            p.set_world_pose(pose);

            !anim.is_finished()
        });
    }

    /// Placement animations still running.
    #[inline]
    pub fn animations(&self) -> &[PlacementAnimation] {
        &self.animations
    }

    /// Bounding box of boards and posts, in shelf-local coordinates.
    pub fn local_bounds(&self) -> SpatialBox {
        let c = &self.config;
        let half_len = c.columns as f32 * c.slot_width / 2.0 + c.post_thickness / 2.0;

        SpatialBox::new(
            Vec3::new(-half_len, 0.0, -c.depth / 2.0),
            Vec3::new(
                half_len,
                (c.levels + 1) as f32 * c.level_height + 0.2,
                c.depth / 2.0 + c.post_thickness,
            ),
        )
    }
}

impl Obstacle for Shelf {
    fn obstacle_box(&self) -> SpatialBox {
        self.local_bounds().transformed(self.pose)
    }
}
