//! The forklift: driving, collision, lifting and the pick/place protocol.

use crate::color::{self, Color};
use crate::error::ConfigError;
use crate::input::{Controls, EdgeTrigger, Input, KeyBindings};
use crate::piece::{PieceId, Pieces, Transferable};
use crate::printer::PieceSource;
use crate::shelf::{HighlightMode, Shelf, SlotId};
use crate::spatial::{Obstacle, SpatialBox};
use glamx::{Pose3, Quat, Vec3};
use log::{debug, trace, warn};
use std::f32::consts::{PI, TAU};

/// Forklift dimensions, speeds and interaction distances.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ForkliftConfig {
    /// Starting position on the floor. The root always rides at `wheel_radius`.
    pub start_position: Vec3,
    /// Starting heading, in radians.
    pub start_heading: f32,
    /// Wheel radius; also the height of the root above the floor.
    pub wheel_radius: f32,
    /// Driving speed, in units per second.
    pub speed: f32,
    /// Turning speed, in radians per second.
    pub turn_speed: f32,
    /// Highest fork position.
    pub fork_max: f32,
    /// Lifting speed, in units per second.
    pub lift_speed: f32,
    /// Half of the chassis width (local `x`).
    pub half_width: f32,
    /// Half of the chassis length (local `z`).
    pub half_depth: f32,
    /// Slack removed from the footprint along world `x`.
    pub margin_x: f32,
    /// Slack removed from the footprint along world `z`.
    pub margin_z: f32,
    /// Tolerance subtracted from every obstacle box.
    pub collision_skin: f32,
    /// Largest fork tip distance for picking, placing and the shelf highlight.
    pub pickup_radius: f32,
    /// Mast mount point in the chassis frame.
    pub mast_offset: Vec3,
    /// Fork tip in the fork frame.
    pub fork_tip_offset: Vec3,
    /// Where a carried piece sits in the fork frame.
    pub carry_offset: Vec3,
    /// Chassis color.
    pub body_color: Color,
}

impl Default for ForkliftConfig {
    fn default() -> Self {
        ForkliftConfig {
            start_position: Vec3::ZERO,
            start_heading: 0.0,
            wheel_radius: 0.55,
            speed: 10.0,
            turn_speed: PI,
            fork_max: 2.5,
            lift_speed: 1.0,
            half_width: 1.2,
            half_depth: 1.4,
            margin_x: 0.15,
            margin_z: 0.4,
            collision_skin: 0.1,
            pickup_radius: 2.4,
            mast_offset: Vec3::new(0.0, 0.7, 1.6),
            fork_tip_offset: Vec3::new(0.0, 0.0, 1.4),
            carry_offset: Vec3::new(0.0, 0.15, 0.7),
            body_color: color::FORKLIFT_YELLOW,
        }
    }
}

impl ForkliftConfig {
    /// Sets the starting position and heading.
    pub fn with_start(mut self, position: Vec3, heading: f32) -> Self {
        self.start_position = position;
        self.start_heading = heading;
        self
    }

    /// Sets the pickup radius.
    pub fn with_pickup_radius(mut self, radius: f32) -> Self {
        self.pickup_radius = radius;
        self
    }

    /// Sets the driving and lifting speeds.
    pub fn with_speeds(mut self, speed: f32, turn_speed: f32, lift_speed: f32) -> Self {
        self.speed = speed;
        self.turn_speed = turn_speed;
        self.lift_speed = lift_speed;
        self
    }

    /// Checks that speeds and dimensions are positive and the footprint is not empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("forklift wheel radius", self.wheel_radius)?;
        ConfigError::check_positive("forklift speed", self.speed)?;
        ConfigError::check_positive("forklift turn speed", self.turn_speed)?;
        ConfigError::check_positive("forklift fork max", self.fork_max)?;
        ConfigError::check_positive("forklift lift speed", self.lift_speed)?;
        ConfigError::check_positive("forklift half width", self.half_width)?;
        ConfigError::check_positive("forklift half depth", self.half_depth)?;
        ConfigError::check_positive("forklift pickup radius", self.pickup_radius)?;
        ConfigError::check_range("forklift collision skin", self.collision_skin, 0.0, f32::MAX)?;

        // The smallest footprint extent is reached along an axis.
        let min_extent = self.half_width.min(self.half_depth);
        if min_extent <= self.margin_x.max(self.margin_z) {
            return Err(ConfigError::Inconsistent {
                name: "forklift margins",
                reason: format!(
                    "margins ({}, {}) swallow the chassis footprint",
                    self.margin_x, self.margin_z
                ),
            });
        }

        Ok(())
    }
}

/// The collaborators a forklift works with during one update.
pub struct Environment<'a> {
    /// Where pieces are picked from first.
    pub printer: &'a mut dyn PieceSource,
    /// Where pieces are stored.
    pub shelf: &'a mut Shelf,
    /// Every live piece.
    pub pieces: &'a mut Pieces,
}

/// A successful pick or place.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// A finished piece was taken off the printer.
    PickedFromPrinter(PieceId),
    /// A stored piece was taken off the shelf.
    PickedFromShelf {
        /// The piece now carried.
        piece: PieceId,
        /// The slot it left.
        slot: SlotId,
    },
    /// The carried piece was stored.
    Placed {
        /// The stored piece.
        piece: PieceId,
        /// The slot it went to.
        slot: SlotId,
    },
}

/// A drivable forklift.
///
/// The forklift reads polled controls once per frame in [`update`](Forklift::update)
/// and does, in order: turn, translate with collision against the obstacle
/// boxes cached by [`set_environment`](Forklift::set_environment), lift, carry,
/// highlight and finally pick or place on the press edge of the interact key.
#[derive(Clone, Debug)]
pub struct Forklift {
    config: ForkliftConfig,
    bindings: KeyBindings,
    position: Vec3,
    heading: f32,
    fork_height: f32,
    carried: Option<PieceId>,
    wheel_rotation: f32,
    obstacles: Vec<SpatialBox>,
    environment_bound: bool,
    warned_unbound: bool,
    interact: EdgeTrigger,
}

impl Forklift {
    /// Creates a forklift at its configured start, fork down, empty-handed.
    pub fn new(config: ForkliftConfig, bindings: KeyBindings) -> Forklift {
        let mut position = config.start_position;
        position.y = config.wheel_radius;

        Forklift {
            config,
            bindings,
            position,
            heading: config.start_heading,
            fork_height: 0.0,
            carried: None,
            wheel_rotation: 0.0,
            obstacles: Vec::new(),
            environment_bound: false,
            warned_unbound: false,
            interact: EdgeTrigger::default(),
        }
    }

    /// Caches the bounding box of every static obstacle.
    ///
    /// Must be called before the first [`update`](Forklift::update); obstacles
    /// are assumed not to move afterwards.
    pub fn set_environment(&mut self, obstacles: &[&dyn Obstacle]) {
        self.obstacles = obstacles.iter().map(|o| o.obstacle_box()).collect();
        self.environment_bound = true;
        debug!("Forklift bound to {} obstacles.", self.obstacles.len());
    }

    /// Advances the forklift by one frame using the bound keys of `input`.
    pub fn update(&mut self, input: &Input, dt: f32, env: &mut Environment) -> Option<Interaction> {
        let controls = self.bindings.sample(input);
        self.update_controls(controls, dt, env)
    }

    /// Advances the forklift by one frame with already sampled controls.
    pub fn update_controls(
        &mut self,
        controls: Controls,
        dt: f32,
        env: &mut Environment,
    ) -> Option<Interaction> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if !self.environment_bound && !self.warned_unbound {
            warn!("Forklift updated before set_environment: collisions are disabled.");
            self.warned_unbound = true;
        }

        /*
         * Turn.
         */
        let turn = controls.axis(Controls::TURN_RIGHT, Controls::TURN_LEFT);
        self.heading -= self.config.turn_speed * turn * dt;

        /*
         * Translate.
         */
        let v = self.config.speed * controls.axis(Controls::FORWARD, Controls::BACKWARD) * dt;
        if v != 0.0 {
            self.translate(v);
        }

        /*
         * Lift.
         */
        let lift = controls.axis(Controls::LIFT_UP, Controls::LIFT_DOWN);
        self.fork_height = (self.fork_height + lift * self.config.lift_speed * dt)
            .clamp(0.0, self.config.fork_max);

        self.sync_carried(env.pieces);

        /*
         * Highlight.
         */
        let mode = if self.is_carrying() {
            HighlightMode::Placing
        } else {
            HighlightMode::Picking
        };
        env.shelf
            .refresh_highlight(mode, self.fork_tip(), self.config.pickup_radius);

        /*
         * Interact.
         */
        if !self.interact.update(controls.contains(Controls::INTERACT)) {
            return None;
        }

        if self.is_carrying() {
            self.place(env)
        } else {
            self.pick(env)
        }
    }

    fn translate(&mut self, v: f32) {
        let disp = Vec3::new(self.heading.sin() * v, 0.0, self.heading.cos() * v);
        let start = self.position;

        if self.is_clear(start, start + disp) {
            self.position += disp;
        } else {
            let mut p = start;
            let dx = Vec3::new(disp.x, 0.0, 0.0);
            let dz = Vec3::new(0.0, 0.0, disp.z);

            if disp.x != 0.0 && self.is_clear(p, p + dx) {
                p += dx;
            }
            if disp.z != 0.0 && self.is_clear(p, p + dz) {
                p += dz;
            }

            trace!(
                "Move blocked, slid from {:?} to {:?} instead of {:?}.",
                start,
                p,
                start + disp
            );
            self.position = p;
        }

        let moved = (self.position - start).length() * v.signum();
        self.wheel_rotation -= moved / self.config.wheel_radius;
    }

    /// Whether moving the chassis from `from` to `to` does not push it deeper
    /// into any obstacle.
    fn is_clear(&self, from: Vec3, to: Vec3) -> bool {
        let (hx, hz) = self.half_extents();
        let skin = self.config.collision_skin;

        self.obstacles.iter().all(|b| {
            b.footprint_overlap_area(to, hx, hz, skin) <= b.footprint_overlap_area(from, hx, hz, skin)
        })
    }

    /// World-axis half extents of the chassis footprint at the current heading.
    pub fn half_extents(&self) -> (f32, f32) {
        let (s, c) = self.heading.sin_cos();
        let (w, d) = (self.config.half_width, self.config.half_depth);

        (
            c.abs() * w + s.abs() * d - self.config.margin_x,
            s.abs() * w + c.abs() * d - self.config.margin_z,
        )
    }

    fn pick(&mut self, env: &mut Environment) -> Option<Interaction> {
        let tip = self.fork_tip();
        let radius = self.config.pickup_radius;

        let printed = env
            .printer
            .current_object()
            .and_then(|id| env.pieces.get(id))
            .is_some_and(|p| p.world_position().distance(tip) <= radius);

        if printed {
            if let Some(piece) = env.printer.detach_object() {
                self.carried = Some(piece);
                self.sync_carried(env.pieces);
                debug!("Picked a piece from the printer.");
                return Some(Interaction::PickedFromPrinter(piece));
            }
        }

        if let Some(found) = env.shelf.find_nearest_occupied_object(tip) {
            if found.distance <= radius && env.shelf.remove_object(found.piece, env.pieces) {
                self.carried = Some(found.piece);
                self.sync_carried(env.pieces);
                debug!("Picked a piece from slot {}.", found.slot);
                return Some(Interaction::PickedFromShelf {
                    piece: found.piece,
                    slot: found.slot,
                });
            }
        }

        debug!("Nothing to pick within reach.");
        None
    }

    fn place(&mut self, env: &mut Environment) -> Option<Interaction> {
        let piece = self.carried?;
        let tip = self.fork_tip();

        if !env
            .shelf
            .add_object(piece, tip, self.config.pickup_radius, env.pieces)
        {
            debug!("Could not place the piece.");
            return None;
        }

        self.carried = None;
        let slot = env.pieces.get(piece).and_then(|p| p.slot())?;
        debug!("Placed a piece in slot {}.", slot);
        Some(Interaction::Placed { piece, slot })
    }

    /// Slaves the carried piece to the fork frame.
    fn sync_carried(&self, pieces: &mut Pieces) {
        if let Some(p) = self.carried.and_then(|id| pieces.get_mut(id)) {
            let mut pose = self.pose();
            pose.translation = self.pose() * (self.fork_origin() + self.config.carry_offset);
            p.set_world_pose(pose);
        }
    }

    /// Fork frame origin in the chassis frame.
    fn fork_origin(&self) -> Vec3 {
        self.config.mast_offset + Vec3::new(0.0, self.fork_height, 0.0)
    }

    /// World position of the root.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Accumulated heading, in radians.
    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Heading mapped to `(-π, π]`.
    pub fn heading_normalized(&self) -> f32 {
        let h = self.heading.rem_euclid(TAU);
        if h > PI {
            h - TAU
        } else {
            h
        }
    }

    /// Unit vector the forklift drives along.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// Current fork height, in `[0, fork_max]`.
    #[inline]
    pub fn fork_height(&self) -> f32 {
        self.fork_height
    }

    /// Whether a piece is on the fork.
    #[inline]
    pub fn is_carrying(&self) -> bool {
        self.carried.is_some()
    }

    /// The piece on the fork.
    #[inline]
    pub fn carried(&self) -> Option<PieceId> {
        self.carried
    }

    /// World position of the fork tip.
    pub fn fork_tip(&self) -> Vec3 {
        self.pose() * (self.fork_origin() + self.config.fork_tip_offset)
    }

    /// World pose of the root.
    pub fn pose(&self) -> Pose3 {
        let mut pose = Pose3::from(Quat::from_rotation_y(self.heading));
        pose.translation = self.position;
        pose
    }

    /// World pose of the fork frame.
    pub fn fork_pose(&self) -> Pose3 {
        let mut pose = self.pose();
        pose.translation = self.pose() * self.fork_origin();
        pose
    }

    /// Cosmetic wheel spin, in radians.
    #[inline]
    pub fn wheel_rotation(&self) -> f32 {
        self.wheel_rotation
    }

    /// The cached obstacle boxes.
    #[inline]
    pub fn obstacles(&self) -> &[SpatialBox] {
        &self.obstacles
    }

    /// The configuration.
    #[inline]
    pub fn config(&self) -> &ForkliftConfig {
        &self.config
    }

    /// The key bindings.
    #[inline]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{Printer, PrinterConfig, PrinterParams};
    use crate::shelf::ShelfConfig;

    struct Fixture {
        printer: Printer,
        shelf: Shelf,
        pieces: Pieces,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                printer: Printer::new(PrinterConfig::default(), PrinterParams::default()),
                shelf: Shelf::new(ShelfConfig::default()),
                pieces: Pieces::with_key(),
            }
        }

        fn env(&mut self) -> Environment<'_> {
            Environment {
                printer: &mut self.printer,
                shelf: &mut self.shelf,
                pieces: &mut self.pieces,
            }
        }
    }

    fn forklift_at(position: Vec3, heading: f32) -> Forklift {
        Forklift::new(
            ForkliftConfig::default().with_start(position, heading),
            KeyBindings::default(),
        )
    }

    fn run(f: &mut Forklift, fx: &mut Fixture, controls: Controls, frames: usize, dt: f32) {
        for _ in 0..frames {
            f.update_controls(controls, dt, &mut fx.env());
        }
    }

    #[test]
    fn lift_clamps_at_fork_max() {
        let mut fx = Fixture::new();
        let mut f = forklift_at(Vec3::ZERO, 0.0);
        f.set_environment(&[]);

        // fork_max / lift_speed = 2.5 s, run 3 s.
        run(&mut f, &mut fx, Controls::LIFT_UP, 180, 1.0 / 60.0);
        assert_eq!(f.fork_height(), 2.5);

        run(&mut f, &mut fx, Controls::LIFT_DOWN, 300, 1.0 / 60.0);
        assert_eq!(f.fork_height(), 0.0);

        // Opposite lift keys cancel.
        run(&mut f, &mut fx, Controls::LIFT_UP | Controls::LIFT_DOWN, 10, 0.1);
        assert_eq!(f.fork_height(), 0.0);
    }

    #[test]
    fn turning_and_driving() {
        let mut fx = Fixture::new();
        let mut f = forklift_at(Vec3::ZERO, 0.0);
        f.set_environment(&[]);
        assert_eq!(f.position(), Vec3::new(0.0, 0.55, 0.0));

        run(&mut f, &mut fx, Controls::FORWARD, 10, 0.1);
        assert!((f.position() - Vec3::new(0.0, 0.55, 10.0)).length() < 1.0e-4);
        assert!((f.wheel_rotation() + 10.0 / 0.55).abs() < 1.0e-3);

        // Half a second of D turns by -π/2: forward becomes -x.
        run(&mut f, &mut fx, Controls::TURN_RIGHT, 5, 0.1);
        assert!((f.heading() + PI / 2.0).abs() < 1.0e-5);
        assert!((f.forward() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1.0e-5);

        run(&mut f, &mut fx, Controls::BACKWARD, 2, 0.1);
        assert!((f.position().x - 2.0).abs() < 1.0e-4);
        assert!(f.wheel_rotation() > -10.0 / 0.55);
    }

    #[test]
    fn heading_normalization() {
        let mut f = forklift_at(Vec3::ZERO, 3.0 * PI + 0.5);
        assert!((f.heading_normalized() - (-PI + 0.5)).abs() < 1.0e-4);

        f.heading = -PI;
        assert!((f.heading_normalized() - PI).abs() < 1.0e-5);
        f.heading = 0.25;
        assert!((f.heading_normalized() - 0.25).abs() < 1.0e-6);
    }

    #[test]
    fn half_extents_swap_with_heading() {
        let mut f = forklift_at(Vec3::ZERO, 0.0);
        let (hx, hz) = f.half_extents();
        assert!((hx - 1.05).abs() < 1.0e-6);
        assert!((hz - 1.0).abs() < 1.0e-6);

        f.heading = PI / 2.0;
        let (hx, hz) = f.half_extents();
        assert!((hx - 1.25).abs() < 1.0e-5);
        assert!((hz - 0.8).abs() < 1.0e-5);
    }

    #[test]
    fn wall_blocks_and_slides() {
        let mut fx = Fixture::new();
        let wall = SpatialBox::new(Vec3::new(5.0, 0.0, -10.0), Vec3::new(10.0, 4.0, 10.0));
        let mut f = forklift_at(Vec3::ZERO, PI / 4.0);
        f.set_environment(&[&wall]);

        let (hx, hz) = f.half_extents();
        for _ in 0..60 {
            f.update_controls(Controls::FORWARD, 1.0 / 60.0, &mut fx.env());
            assert_eq!(
                wall.footprint_overlap_area(f.position(), hx, hz, 0.1),
                0.0,
                "chassis entered the wall at {:?}",
                f.position()
            );
        }

        // x stopped at the wall, z kept going.
        assert!(f.position().x + hx <= 5.1 + 1.0e-4);
        assert!(f.position().x > 3.0);
        assert!((f.position().z - 10.0 * (PI / 4.0).cos()).abs() < 1.0e-3);
    }

    #[test]
    fn head_on_wall_stops() {
        let mut fx = Fixture::new();
        let wall = SpatialBox::new(Vec3::new(-10.0, 0.0, 5.0), Vec3::new(10.0, 4.0, 6.0));
        let mut f = forklift_at(Vec3::ZERO, 0.0);
        f.set_environment(&[&wall]);

        run(&mut f, &mut fx, Controls::FORWARD, 120, 1.0 / 60.0);
        let stop = f.position();
        assert!(stop.z + 1.0 <= 5.1 + 1.0e-4);
        assert!(stop.z > 3.5);
        assert_eq!(stop.x, 0.0);

        run(&mut f, &mut fx, Controls::FORWARD, 10, 1.0 / 60.0);
        assert_eq!(f.position(), stop);

        // Backing away is always allowed.
        run(&mut f, &mut fx, Controls::BACKWARD, 10, 1.0 / 60.0);
        assert!(f.position().z < stop.z);
    }

    #[test]
    fn turning_into_a_wall_does_not_trap() {
        let mut fx = Fixture::new();
        let wall = SpatialBox::new(Vec3::new(-10.0, 0.0, 5.0), Vec3::new(10.0, 4.0, 6.0));
        let mut f = forklift_at(Vec3::new(0.0, 0.0, 3.9), 0.0);
        f.set_environment(&[&wall]);

        // Turning widens the footprint along z into the wall.
        run(&mut f, &mut fx, Controls::TURN_LEFT, 10, 1.0 / 60.0);
        let (hx, hz) = f.half_extents();
        assert!(wall.footprint_overlap_area(f.position(), hx, hz, 0.1) > 0.0);

        let before = f.position();
        run(&mut f, &mut fx, Controls::BACKWARD, 20, 1.0 / 60.0);
        assert!(f.position().distance(before) > 0.5);
    }

    #[test]
    fn unbound_environment_means_no_collision() {
        let mut fx = Fixture::new();
        let mut f = forklift_at(Vec3::ZERO, 0.0);
        run(&mut f, &mut fx, Controls::FORWARD, 10, 0.5);
        assert!((f.position().z - 50.0).abs() < 1.0e-3);
        assert!(f.obstacles().is_empty());
    }

    #[test]
    fn bad_dt_is_ignored() {
        let mut fx = Fixture::new();
        let mut f = forklift_at(Vec3::ZERO, 0.0);
        f.set_environment(&[]);
        for dt in [f32::NAN, -1.0, f32::INFINITY] {
            f.update_controls(Controls::all(), dt, &mut fx.env());
        }
        assert_eq!(f.position(), Vec3::new(0.0, 0.55, 0.0));
        assert_eq!(f.heading(), 0.0);
        assert_eq!(f.fork_height(), 0.0);
    }

    #[test]
    fn fork_tip_follows_heading_and_height() {
        let mut f = forklift_at(Vec3::new(1.0, 0.0, 2.0), 0.0);
        assert!((f.fork_tip() - Vec3::new(1.0, 1.25, 5.0)).length() < 1.0e-5);

        f.fork_height = 1.0;
        f.heading = PI / 2.0;
        assert!((f.fork_tip() - Vec3::new(4.0, 2.25, 2.0)).length() < 1.0e-5);
        assert!((f.fork_pose().translation - Vec3::new(2.6, 2.25, 2.0)).length() < 1.0e-5);
    }

    #[test]
    fn pick_from_printer_is_edge_triggered() {
        let mut fx = Fixture::new();
        let id = fx.printer.generate(&mut fx.pieces);
        fx.printer.update(10.0);

        // Root 3 units east of the piece, facing west: the tip sits right over it.
        let piece_pos = fx.pieces[id].world_position();
        let mut f = forklift_at(piece_pos + Vec3::new(3.0, 0.0, 0.0), -PI / 2.0);
        f.set_environment(&[]);

        let mut interactions = Vec::new();
        for _ in 0..10 {
            interactions.extend(f.update_controls(Controls::INTERACT, 0.016, &mut fx.env()));
        }

        assert_eq!(interactions, vec![Interaction::PickedFromPrinter(id)]);
        assert_eq!(f.carried(), Some(id));
        assert!(fx.printer.current_object().is_none());

        // The piece rides on the fork.
        let expected = f.pose() * (f.fork_origin() + f.config.carry_offset);
        assert!((fx.pieces[id].world_position() - expected).length() < 1.0e-5);
    }

    #[test]
    fn unfinished_print_cannot_be_picked() {
        let mut fx = Fixture::new();
        let id = fx.printer.generate(&mut fx.pieces);
        let piece_pos = fx.pieces[id].world_position();
        let mut f = forklift_at(piece_pos + Vec3::new(3.0, 0.0, 0.0), -PI / 2.0);
        f.set_environment(&[]);

        assert!(f
            .update_controls(Controls::INTERACT, 0.016, &mut fx.env())
            .is_none());
        assert!(!f.is_carrying());
        assert_eq!(fx.printer.printing_object(), Some(id));
    }

    #[test]
    fn place_out_of_reach_keeps_the_piece() {
        let mut fx = Fixture::new();
        let id = fx.printer.generate(&mut fx.pieces);
        fx.printer.update(10.0);
        let piece_pos = fx.pieces[id].world_position();
        let mut f = forklift_at(piece_pos + Vec3::new(3.0, 0.0, 0.0), -PI / 2.0);
        f.set_environment(&[]);

        f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        f.update_controls(Controls::empty(), 0.016, &mut fx.env());
        assert!(f.is_carrying());

        // Still by the printer, far from every slot.
        assert!(f
            .update_controls(Controls::INTERACT, 0.016, &mut fx.env())
            .is_none());
        assert_eq!(f.carried(), Some(id));
        assert_eq!(fx.shelf.occupied_count(), 0);
    }

    #[test]
    fn place_then_pick_back_from_shelf() {
        let mut fx = Fixture::new();
        let id = fx.printer.generate(&mut fx.pieces);
        fx.printer.update(10.0);

        let piece_pos = fx.pieces[id].world_position();
        let mut f = forklift_at(piece_pos + Vec3::new(3.0, 0.0, 0.0), -PI / 2.0);
        f.set_environment(&[]);
        f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        assert!(f.is_carrying());

        // Teleport in front of slot (0, 3), facing the shelf, fork raised to the board.
        let slot = SlotId::new(0, 3);
        let slot_pos = fx.shelf.slot_world_position(slot);
        f.position = Vec3::new(slot_pos.x, 0.55, slot_pos.z + 3.5);
        f.heading = PI;
        f.fork_height = 1.35;
        f.update_controls(Controls::empty(), 0.016, &mut fx.env());

        let h = fx.shelf.highlight().copied().unwrap();
        assert_eq!(h.mode, HighlightMode::Placing);
        assert_eq!(h.slot, slot);

        let placed = f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        assert_eq!(placed, Some(Interaction::Placed { piece: id, slot }));
        assert!(!f.is_carrying());

        f.update_controls(Controls::empty(), 0.016, &mut fx.env());
        assert_eq!(fx.shelf.highlight().map(|h| h.mode), Some(HighlightMode::Picking));

        let picked = f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        assert_eq!(picked, Some(Interaction::PickedFromShelf { piece: id, slot }));
        assert_eq!(fx.shelf.occupied_count(), 0);

        f.update_controls(Controls::empty(), 0.016, &mut fx.env());
        let again = f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        assert_eq!(again, Some(Interaction::Placed { piece: id, slot }));

        fx.shelf.animate(1.0, &mut fx.pieces);
        assert_eq!(fx.pieces[id].world_position(), slot_pos);
    }

    #[test]
    fn one_radius_for_picking_and_placing() {
        let mut fx = Fixture::new();
        let id = fx.printer.generate(&mut fx.pieces);
        fx.printer.update(10.0);
        fx.printer.detach_object();

        let slot = SlotId::new(0, 3);
        let slot_pos = fx.shelf.slot_world_position(slot);
        assert!(fx.shelf.add_object(id, slot_pos, 1.0, &mut fx.pieces));
        fx.shelf.animate(1.0, &mut fx.pieces);

        // The fork tip ends up 3.2 in front of the slot: out of the default
        // radius, within a radius of 4.
        let config = ForkliftConfig::default()
            .with_start(Vec3::new(slot_pos.x, 0.0, slot_pos.z + 6.2), PI)
            .with_pickup_radius(4.0);
        let mut f = Forklift::new(config, KeyBindings::default());
        f.set_environment(&[]);
        f.fork_height = 1.35;
        assert!((f.fork_tip().distance(slot_pos) - 3.2).abs() < 1.0e-4);

        f.update_controls(Controls::empty(), 0.016, &mut fx.env());
        let h = fx.shelf.highlight().copied().unwrap();
        assert_eq!((h.mode, h.slot), (HighlightMode::Picking, slot));

        let picked = f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        assert_eq!(picked, Some(Interaction::PickedFromShelf { piece: id, slot }));

        f.update_controls(Controls::empty(), 0.016, &mut fx.env());
        let h = fx.shelf.highlight().copied().unwrap();
        assert_eq!((h.mode, h.slot), (HighlightMode::Placing, slot));

        let placed = f.update_controls(Controls::INTERACT, 0.016, &mut fx.env());
        assert_eq!(placed, Some(Interaction::Placed { piece: id, slot }));
        assert!(!f.is_carrying());
        assert_eq!(fx.pieces[id].slot(), Some(slot));
    }

    #[test]
    fn config_validation() {
        assert!(ForkliftConfig::default().validate().is_ok());
        assert!(ForkliftConfig::default()
            .with_speeds(0.0, 1.0, 1.0)
            .validate()
            .is_err());

        let swallowed = ForkliftConfig {
            margin_x: 2.0,
            ..ForkliftConfig::default()
        };
        assert!(matches!(
            swallowed.validate(),
            Err(ConfigError::Inconsistent { .. })
        ));
    }
}
