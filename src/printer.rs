//! The 3-D printer: builds pieces and reveals them layer by layer.

use crate::color::{self, Color};
use crate::error::ConfigError;
use crate::piece::{Piece, PieceId, Pieces};
use crate::procedural::{self, Outline, Profile, RenderMesh};
use crate::spatial::{Obstacle, SpatialBox};
use glamx::{Pose3, Vec2, Vec3};
use log::info;
use std::fmt;

/// Smallest printable height.
pub const MIN_HEIGHT: f32 = 0.5;
/// Largest printable height.
pub const MAX_HEIGHT: f32 = 3.0;
/// Largest twist of a sweep, in degrees.
pub const MAX_TWIST_DEGREES: f32 = 360.0;

/// How a piece is generated.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrintShape {
    /// A profile revolved around the vertical axis.
    Revolution(Profile),
    /// An outline extruded upward, optionally twisted.
    Sweep(Outline),
}

impl Default for PrintShape {
    fn default() -> Self {
        PrintShape::Revolution(Profile::default())
    }
}

impl PrintShape {
    /// `"revolution"` or `"sweep"`.
    pub fn mode(self) -> &'static str {
        match self {
            PrintShape::Revolution(_) => "revolution",
            PrintShape::Sweep(_) => "sweep",
        }
    }
}

impl fmt::Display for PrintShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintShape::Revolution(p) => write!(f, "revolution {p}"),
            PrintShape::Sweep(o) => write!(f, "sweep {o}"),
        }
    }
}

/// What the next print looks like.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrinterParams {
    /// Generation mode and form.
    pub shape: PrintShape,
    /// Height of the piece, in `[MIN_HEIGHT, MAX_HEIGHT]`.
    pub height: f32,
    /// Twist of sweeps, in degrees within `[0, 360]`. Ignored by revolutions.
    pub twist_degrees: f32,
    /// Color of the piece.
    pub color: Color,
}

impl Default for PrinterParams {
    fn default() -> Self {
        PrinterParams {
            shape: PrintShape::default(),
            height: 2.0,
            twist_degrees: 0.0,
            color: color::PIECE_STEEL,
        }
    }
}

impl PrinterParams {
    /// Sets the shape.
    pub fn with_shape(mut self, shape: PrintShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the height, clamped to the printable range.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        self
    }

    /// Sets the twist in degrees, clamped to `[0, 360]`.
    pub fn with_twist(mut self, degrees: f32) -> Self {
        self.twist_degrees = degrees.clamp(0.0, MAX_TWIST_DEGREES);
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Checks the ranges of height and twist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("printer height", self.height, MIN_HEIGHT, MAX_HEIGHT)?;
        ConfigError::check_range(
            "printer twist",
            self.twist_degrees,
            0.0,
            MAX_TWIST_DEGREES,
        )
    }
}

/// Printer placement and machine constants.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrinterConfig {
    /// World position of the printer root (center of the pedestal, on the floor).
    pub position: Vec3,
    /// Radius of the pedestal base; also the half-width of the obstacle box.
    pub pedestal_radius: f32,
    /// Height of the build plate surface above the printer root.
    pub build_plate_y: f32,
    /// Height of the obstacle box (top of the column).
    pub frame_height: f32,
    /// Horizontal offset of the column and print head from the root.
    pub head_offset_z: f32,
    /// Height of the print head above the current layer.
    pub head_clearance: f32,
    /// Radial scale applied to every generated shape.
    pub radial_scale: f32,
    /// Print speed in height units per second.
    pub print_speed: f32,
    /// Ring subdivisions of revolutions.
    pub lathe_segments: u32,
    /// Height subdivisions of sweeps.
    pub sweep_steps: u32,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            position: Vec3::new(-12.0, 0.0, -6.0),
            pedestal_radius: 2.2,
            build_plate_y: 0.655,
            frame_height: 5.1,
            head_offset_z: -0.9,
            head_clearance: 0.4,
            radial_scale: 0.7,
            print_speed: 0.5,
            lathe_segments: 64,
            sweep_steps: 140,
        }
    }
}

impl PrinterConfig {
    /// Moves the printer.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the print speed.
    pub fn with_print_speed(mut self, speed: f32) -> Self {
        self.print_speed = speed;
        self
    }

    /// Checks that every dimension and speed is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("printer pedestal radius", self.pedestal_radius)?;
        ConfigError::check_positive("printer build plate height", self.build_plate_y)?;
        ConfigError::check_positive("printer frame height", self.frame_height)?;
        ConfigError::check_positive("printer radial scale", self.radial_scale)?;
        ConfigError::check_positive("printer speed", self.print_speed)?;
        ConfigError::check_positive("printer lathe segments", self.lathe_segments as f32)?;
        ConfigError::check_positive("printer sweep steps", self.sweep_steps as f32)
    }
}

/// Where the forklift takes pieces from.
pub trait PieceSource {
    /// The piece ready to be picked up, if any.
    fn current_object(&self) -> Option<PieceId>;
    /// Gives up the current piece and forgets about it.
    fn detach_object(&mut self) -> Option<PieceId>;
}

/// A stylized 3-D printer.
///
/// A print starts with [`generate`](Printer::generate) and is revealed by
/// [`update`](Printer::update): the renderer clips the piece above
/// [`layer_height`](Printer::layer_height).
#[derive(Clone, Debug)]
pub struct Printer {
    config: PrinterConfig,
    params: PrinterParams,
    current: Option<PieceId>,
    print_height: f32,
    progress: f32,
}

impl Printer {
    /// Creates an idle printer. Out-of-range parameters are clamped.
    pub fn new(config: PrinterConfig, params: PrinterParams) -> Printer {
        let params = params
            .with_height(params.height)
            .with_twist(params.twist_degrees);

        Printer {
            config,
            params,
            current: None,
            print_height: params.height,
            progress: 0.0,
        }
    }

    /// The machine configuration.
    #[inline]
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Parameters of the next print.
    #[inline]
    pub fn params(&self) -> &PrinterParams {
        &self.params
    }

    /// Replaces the parameters of the next print; a running print is unaffected.
    pub fn set_params(&mut self, params: PrinterParams) {
        self.params = params
            .with_height(params.height)
            .with_twist(params.twist_degrees);
    }

    /// Starts printing a new piece built from the current parameters.
    ///
    /// A piece still sitting on the build plate is discarded.
    pub fn generate(&mut self, pieces: &mut Pieces) -> PieceId {
        if let Some(old) = self.current.take() {
            if pieces.remove(old).is_some() {
                info!("Discarding the unpicked piece left on the printer.");
            }
        }

        let mesh = self.build_mesh();
        let min_y = mesh.bounds().map(|b| b.min.y).unwrap_or(0.0);

        let mut pose = Pose3::IDENTITY;
        pose.translation =
            self.config.position + Vec3::new(0.0, self.config.build_plate_y - min_y, 0.0);

        let piece = Piece::new(mesh, self.params.color, self.params.shape, pose);
        let id = pieces.insert(piece);

        self.current = Some(id);
        self.print_height = self.params.height;
        self.progress = 0.0;

        info!(
            "Printing a {} piece, height {:.2}, twist {:.0}°.",
            self.params.shape, self.params.height, self.params.twist_degrees
        );

        id
    }

    /// Advances the print.
    pub fn update(&mut self, dt: f32) {
        if self.current.is_none() || self.progress >= 1.0 {
            return;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.progress = (self.progress + self.config.print_speed * dt / self.print_height).min(1.0);

        if self.progress >= 1.0 {
            info!("Print finished.");
        }
    }

    /// Print progress in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether a finished piece waits on the build plate.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current.is_some() && self.progress >= 1.0
    }

    /// The piece on the build plate, finished or not.
    #[inline]
    pub fn printing_object(&self) -> Option<PieceId> {
        self.current
    }

    /// World height of the layer being printed.
    pub fn layer_height(&self) -> f32 {
        self.config.position.y + self.config.build_plate_y + self.print_height * self.progress
    }

    /// World position of the print head.
    pub fn head_position(&self) -> Vec3 {
        Vec3::new(
            self.config.position.x,
            self.layer_height() + self.config.head_clearance,
            self.config.position.z + self.config.head_offset_z,
        )
    }

    /// World position of the printer root.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.config.position
    }

    fn build_mesh(&self) -> RenderMesh {
        let s = self.config.radial_scale;
        let height = self.params.height;

        match self.params.shape {
            PrintShape::Revolution(profile) => {
                let raw = profile.points();
                let max_y = raw.iter().fold(0.0f32, |m, p| m.max(p.y));
                let max_y = if max_y > 0.0 { max_y } else { 1.0 };

                let pts: Vec<Vec2> = raw
                    .iter()
                    .map(|p| Vec2::new(p.x * s, p.y / max_y * height))
                    .collect();
                procedural::lathe(&pts, self.config.lathe_segments)
            }
            PrintShape::Sweep(outline) => {
                let pts: Vec<Vec2> = outline.points().iter().map(|p| *p * s).collect();
                procedural::sweep(
                    &pts,
                    height,
                    self.config.sweep_steps,
                    self.params.twist_degrees.to_radians(),
                )
            }
        }
    }
}

impl PieceSource for Printer {
    fn current_object(&self) -> Option<PieceId> {
        if self.progress >= 1.0 {
            self.current
        } else {
            None
        }
    }

    fn detach_object(&mut self) -> Option<PieceId> {
        let res = self.current.take();
        if res.is_some() {
            info!("Piece detached from the printer.");
        }
        res
    }
}

impl Obstacle for Printer {
    fn obstacle_box(&self) -> SpatialBox {
        let r = self.config.pedestal_radius;
        let p = self.config.position;
        SpatialBox::new(
            Vec3::new(p.x - r, p.y, p.z - r),
            Vec3::new(p.x + r, p.y + self.config.frame_height, p.z + r),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Transferable;

    fn printer(shape: PrintShape) -> Printer {
        Printer::new(
            PrinterConfig::default(),
            PrinterParams::default().with_shape(shape),
        )
    }

    #[test]
    fn object_is_available_only_once_finished() {
        let mut pieces = Pieces::with_key();
        let mut p = printer(PrintShape::default());
        assert!(p.current_object().is_none());

        let id = p.generate(&mut pieces);
        assert_eq!(p.printing_object(), Some(id));
        assert!(p.current_object().is_none());

        // Height 2 at 0.5 units per second takes 4 seconds.
        for _ in 0..39 {
            p.update(0.1);
        }
        assert!(!p.is_finished());
        assert!(p.current_object().is_none());

        p.update(0.2);
        assert!(p.is_finished());
        assert_eq!(p.progress(), 1.0);
        assert_eq!(p.current_object(), Some(id));

        assert_eq!(p.detach_object(), Some(id));
        assert!(p.current_object().is_none());
        assert!(p.detach_object().is_none());
        assert!(pieces.contains_key(id));
    }

    #[test]
    fn piece_rests_on_the_build_plate() {
        let mut pieces = Pieces::with_key();
        for shape in [
            PrintShape::Revolution(Profile::A3),
            PrintShape::Sweep(Outline::B2),
        ] {
            let mut p = printer(shape);
            let id = p.generate(&mut pieces);
            let b = pieces[id].world_bounds();
            let cfg = PrinterConfig::default();

            assert!((b.min.y - cfg.build_plate_y).abs() < 1.0e-4);
            assert!((b.size().y - 2.0).abs() < 1.0e-3);
            assert!(p.obstacle_box().contains_point(pieces[id].world_position()));
        }
    }

    #[test]
    fn revolution_scale_and_height() {
        let mut pieces = Pieces::with_key();
        let mut p = printer(PrintShape::Revolution(Profile::A2));
        p.set_params(p.params().with_height(3.0));
        let id = p.generate(&mut pieces);

        let size = pieces[id].local_bounds().size();
        assert!((size.y - 3.0).abs() < 1.0e-4);
        // A2 reaches a radius of about 0.76 before the radial scale.
        assert!(size.x < 2.0 * 0.8 * 0.7);
        assert!(size.x > 2.0 * 0.7 * 0.7);
    }

    #[test]
    fn new_print_discards_the_unpicked_piece() {
        let mut pieces = Pieces::with_key();
        let mut p = printer(PrintShape::Sweep(Outline::B5));
        let first = p.generate(&mut pieces);
        let second = p.generate(&mut pieces);

        assert_ne!(first, second);
        assert!(!pieces.contains_key(first));
        assert_eq!(pieces.len(), 1);
        assert_eq!(p.progress(), 0.0);
    }

    #[test]
    fn head_follows_the_layer() {
        let mut pieces = Pieces::with_key();
        let mut p = printer(PrintShape::default());
        p.generate(&mut pieces);
        let start = p.head_position().y;

        p.update(2.0);
        assert!((p.progress() - 0.5).abs() < 1.0e-6);
        assert!((p.head_position().y - start - 1.0).abs() < 1.0e-5);
        assert!((p.layer_height() - (0.655 + 1.0)).abs() < 1.0e-5);
    }

    #[test]
    fn params_are_clamped() {
        let mut p = printer(PrintShape::default());
        p.set_params(PrinterParams {
            height: 10.0,
            twist_degrees: -20.0,
            ..PrinterParams::default()
        });
        assert_eq!(p.params().height, MAX_HEIGHT);
        assert_eq!(p.params().twist_degrees, 0.0);
        assert!(p.params().validate().is_ok());

        let bad = PrinterParams {
            height: 0.1,
            ..PrinterParams::default()
        };
        assert!(bad.validate().is_err());
    }
}
