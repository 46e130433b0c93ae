//! The warehouse building and the context that owns every component.

use crate::camera::CameraManager;
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::forklift::{Environment, Forklift, Interaction};
use crate::hud::Hud;
use crate::input::{Controls, Input};
use crate::piece::{Piece, PieceId, Pieces};
use crate::printer::{Printer, PrinterParams};
use crate::shelf::Shelf;
use crate::spatial::{Obstacle, SpatialBox};
use glamx::Vec3;
use log::{debug, info};
use std::fmt;

/// Which side of the building a wall closes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallSide {
    /// `+z`, left of the door.
    FrontLeft,
    /// `+z`, right of the door.
    FrontRight,
    /// `-z`, left of the door.
    BackLeft,
    /// `-z`, right of the door.
    BackRight,
    /// `-x`.
    Left,
    /// `+x`.
    Right,
}

impl fmt::Display for WallSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WallSide::FrontLeft => "front-left",
            WallSide::FrontRight => "front-right",
            WallSide::BackLeft => "back-left",
            WallSide::BackRight => "back-right",
            WallSide::Left => "left",
            WallSide::Right => "right",
        };
        f.write_str(name)
    }
}

/// One solid wall section.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wall {
    side: WallSide,
    bounds: SpatialBox,
}

impl Wall {
    /// Which section this is.
    #[inline]
    pub fn side(&self) -> WallSide {
        self.side
    }

    /// World-space box of the section.
    #[inline]
    pub fn bounds(&self) -> SpatialBox {
        self.bounds
    }
}

impl Obstacle for Wall {
    fn obstacle_box(&self) -> SpatialBox {
        self.bounds
    }
}

/// Dimensions of the building, centered on the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WarehouseLayout {
    /// Floor extent along `x`.
    pub width: f32,
    /// Floor extent along `z`.
    pub depth: f32,
    /// Wall height.
    pub wall_height: f32,
    /// Wall thickness, centered on the floor edge.
    pub wall_thickness: f32,
    /// Width of the openings centered in the front and back walls.
    pub door_width: f32,
    /// Height of the door openings. Only used for drawing: the forklift
    /// drives on the floor, so an opening is an opening.
    pub door_height: f32,
}

impl Default for WarehouseLayout {
    fn default() -> Self {
        WarehouseLayout {
            width: 60.0,
            depth: 40.0,
            wall_height: 8.0,
            wall_thickness: 0.2,
            door_width: 12.0,
            door_height: 6.0,
        }
    }
}

impl WarehouseLayout {
    /// Sets the floor size.
    pub fn with_size(mut self, width: f32, depth: f32) -> Self {
        self.width = width;
        self.depth = depth;
        self
    }

    /// Sets the door opening width.
    pub fn with_door_width(mut self, door_width: f32) -> Self {
        self.door_width = door_width;
        self
    }

    /// Checks that the building is not degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("warehouse width", self.width)?;
        ConfigError::check_positive("warehouse depth", self.depth)?;
        ConfigError::check_positive("warehouse wall height", self.wall_height)?;
        ConfigError::check_positive("warehouse wall thickness", self.wall_thickness)?;
        ConfigError::check_range("warehouse door width", self.door_width, 0.0, self.width)?;
        ConfigError::check_range("warehouse door height", self.door_height, 0.0, self.wall_height)?;
        Ok(())
    }

    /// The floor rectangle, walls excluded.
    pub fn floor(&self) -> SpatialBox {
        SpatialBox::new(
            Vec3::new(-self.width / 2.0, 0.0, -self.depth / 2.0),
            Vec3::new(self.width / 2.0, 0.0, self.depth / 2.0),
        )
    }

    /// The solid wall sections. A door as wide as the building leaves no
    /// front or back section.
    pub fn walls(&self) -> Vec<Wall> {
        let (hw, hd, t) = (self.width / 2.0, self.depth / 2.0, self.wall_thickness / 2.0);
        let h = self.wall_height;
        let hdoor = self.door_width / 2.0;

        let mut res = Vec::with_capacity(6);
        let mut push = |side, min: Vec3, max: Vec3| {
            if max.x - min.x > 0.0 && max.z - min.z > 0.0 {
                res.push(Wall {
                    side,
                    bounds: SpatialBox::new(min, max),
                });
            }
        };

        push(
            WallSide::FrontLeft,
            Vec3::new(-hw, 0.0, hd - t),
            Vec3::new(-hdoor, h, hd + t),
        );
        push(
            WallSide::FrontRight,
            Vec3::new(hdoor, 0.0, hd - t),
            Vec3::new(hw, h, hd + t),
        );
        push(
            WallSide::BackLeft,
            Vec3::new(-hw, 0.0, -hd - t),
            Vec3::new(-hdoor, h, -hd + t),
        );
        push(
            WallSide::BackRight,
            Vec3::new(hdoor, 0.0, -hd - t),
            Vec3::new(hw, h, -hd + t),
        );
        push(
            WallSide::Left,
            Vec3::new(-hw - t, 0.0, -hd),
            Vec3::new(-hw + t, h, hd),
        );
        push(
            WallSide::Right,
            Vec3::new(hw - t, 0.0, -hd),
            Vec3::new(hw + t, h, hd),
        );

        res
    }
}

/// The whole simulation: building, printer, shelf, forklift, pieces and cameras.
///
/// Every frame, [`step`](Warehouse::step) advances the print, then the
/// forklift (which may pick or place), then the shelf placement animations,
/// and finally the cameras.
pub struct Warehouse {
    config: SimulationConfig,
    walls: Vec<Wall>,
    printer: Printer,
    shelf: Shelf,
    forklift: Forklift,
    pieces: Pieces,
    cameras: CameraManager,
    last_interaction: Option<Interaction>,
    elapsed: f32,
}

impl Warehouse {
    /// Validates `config`, builds every component and binds the forklift to
    /// the printer, shelf and wall obstacles.
    pub fn new(config: SimulationConfig) -> Result<Warehouse, ConfigError> {
        config.validate()?;

        let walls = config.layout.walls();
        let printer = Printer::new(config.printer, config.printer_params);
        let shelf = Shelf::new(config.shelf);
        let mut forklift = Forklift::new(config.forklift, config.bindings);
        let cameras = CameraManager::new(config.cameras, printer.center(), shelf.center());

        {
            let mut obstacles: Vec<&dyn Obstacle> = vec![&printer as &dyn Obstacle, &shelf];
            obstacles.extend(walls.iter().map(|w| w as &dyn Obstacle));
            forklift.set_environment(&obstacles);
        }

        let (hx, hz) = forklift.half_extents();
        let skin = config.forklift.collision_skin;
        if let Some(b) = forklift
            .obstacles()
            .iter()
            .find(|b| b.overlaps_footprint(forklift.position(), hx, hz, skin))
        {
            return Err(ConfigError::Inconsistent {
                name: "forklift start position",
                reason: format!(
                    "chassis at {:?} overlaps the obstacle {:?}..{:?}",
                    forklift.position(),
                    b.min,
                    b.max
                ),
            });
        }

        info!(
            "Warehouse ready: {} walls, {} shelf slots.",
            walls.len(),
            shelf.slots().len()
        );

        let mut res = Warehouse {
            config,
            walls,
            printer,
            shelf,
            forklift,
            pieces: Pieces::with_key(),
            cameras,
            last_interaction: None,
            elapsed: 0.0,
        };
        res.cameras
            .update(res.forklift.position(), res.forklift.heading());

        Ok(res)
    }

    /// Advances the simulation by one frame using the polled `input`.
    pub fn step(&mut self, input: &Input, dt: f32) -> Option<Interaction> {
        let controls = self.config.bindings.sample(input);
        self.cameras.handle_input(input, &self.config.bindings);
        self.step_controls(controls, dt)
    }

    /// Advances the simulation by one frame with already sampled forklift controls.
    pub fn step_controls(&mut self, controls: Controls, dt: f32) -> Option<Interaction> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        self.printer.update(dt);

        let mut env = Environment {
            printer: &mut self.printer,
            shelf: &mut self.shelf,
            pieces: &mut self.pieces,
        };
        let interaction = self.forklift.update_controls(controls, dt, &mut env);

        self.shelf.animate(dt, &mut self.pieces);
        self.cameras
            .update(self.forklift.position(), self.forklift.heading());

        if let Some(i) = interaction {
            debug!("Interaction at t = {:.2}s: {:?}", self.elapsed, i);
            self.last_interaction = Some(i);
        }

        interaction
    }

    /// Starts printing a piece with the current printer parameters.
    pub fn print(&mut self) -> PieceId {
        self.printer.generate(&mut self.pieces)
    }

    /// Changes the parameters used by the next [`print`](Warehouse::print).
    pub fn set_printer_params(&mut self, params: PrinterParams) {
        self.printer.set_params(params);
    }

    /// A text summary of the simulation state.
    pub fn hud(&self) -> Hud {
        Hud::new(self)
    }

    /// The configuration this warehouse was built from.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The solid wall sections.
    #[inline]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// The printer.
    #[inline]
    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// The shelf.
    #[inline]
    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    /// The forklift.
    #[inline]
    pub fn forklift(&self) -> &Forklift {
        &self.forklift
    }

    /// Every live piece.
    #[inline]
    pub fn pieces(&self) -> &Pieces {
        &self.pieces
    }

    /// The piece with the given id, if still alive.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// The cameras.
    #[inline]
    pub fn cameras(&self) -> &CameraManager {
        &self.cameras
    }

    /// The cameras, mutably (for resizing or scripted view changes).
    #[inline]
    pub fn cameras_mut(&mut self) -> &mut CameraManager {
        &mut self.cameras
    }

    /// The most recent successful pick or place.
    #[inline]
    pub fn last_interaction(&self) -> Option<Interaction> {
        self.last_interaction
    }

    /// Simulated seconds since creation.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
