use crate::camera::{Camera3d, FollowCamera3d, FollowMode, OrbitCamera3d, Perspective};
use crate::error::ConfigError;
use crate::event::Key;
use crate::input::{EdgeTrigger, Input, KeyBindings};
use glamx::Vec3;
use log::debug;
use std::fmt;

/// The six selectable views, numbered like their digit keys.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraView {
    /// Orbit camera over the whole warehouse.
    #[default]
    Overview,
    /// Orbit camera around the printer.
    Printer,
    /// Orbit camera around the shelf.
    Shelf,
    /// Forklift cab.
    Driver,
    /// Behind the forklift.
    Rear,
    /// Beside the forklift.
    Side,
}

impl CameraView {
    /// Every view, in digit order.
    pub const ALL: [CameraView; 6] = [
        CameraView::Overview,
        CameraView::Printer,
        CameraView::Shelf,
        CameraView::Driver,
        CameraView::Rear,
        CameraView::Side,
    ];

    /// The view selected by digit `n`, from 1 to 6.
    pub fn from_digit(n: u32) -> Option<CameraView> {
        let i = usize::try_from(n).ok()?.checked_sub(1)?;
        CameraView::ALL.get(i).copied()
    }

    /// The digit selecting this view.
    pub fn digit(self) -> u32 {
        self as u32 + 1
    }

    /// Whether this view can zoom.
    pub fn is_orbit(self) -> bool {
        matches!(
            self,
            CameraView::Overview | CameraView::Printer | CameraView::Shelf
        )
    }
}

impl fmt::Display for CameraView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraView::Overview => "overview",
            CameraView::Printer => "printer",
            CameraView::Shelf => "shelf",
            CameraView::Driver => "driver",
            CameraView::Rear => "rear",
            CameraView::Side => "side",
        };
        write!(f, "{} ({})", name, self.digit())
    }
}

/// Camera placement and zoom settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraConfig {
    /// Projection shared by all six cameras.
    pub perspective: Perspective,
    /// Eye of the overview camera.
    pub overview_eye: Vec3,
    /// Target of the overview camera.
    pub overview_target: Vec3,
    /// Printer camera eye, relative to the printer root.
    pub printer_offset: Vec3,
    /// Shelf camera eye, relative to the shelf root.
    pub shelf_offset: Vec3,
    /// Closest orbit distance.
    pub min_distance: f32,
    /// Farthest orbit distance.
    pub max_distance: f32,
    /// Distance factor applied by the zoom-in key.
    pub zoom_in_factor: f32,
    /// Distance factor applied by the zoom-out key.
    pub zoom_out_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            perspective: Perspective::default(),
            overview_eye: Vec3::new(20.0, 15.0, 20.0),
            overview_target: Vec3::new(0.0, 2.0, 0.0),
            printer_offset: Vec3::new(8.0, 6.0, 8.0),
            shelf_offset: Vec3::new(-6.0, 3.0, 10.0),
            min_distance: 5.0,
            max_distance: 50.0,
            zoom_in_factor: 0.8,
            zoom_out_factor: 1.2,
        }
    }
}

impl CameraConfig {
    /// Sets the orbit zoom limits.
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Checks the projection and zoom settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.perspective;
        ConfigError::check_range("camera fov", p.fov, 1.0e-3, std::f32::consts::PI - 1.0e-3)?;
        ConfigError::check_positive("camera znear", p.znear)?;
        ConfigError::check_positive("camera aspect", p.aspect)?;
        ConfigError::check_positive("camera min distance", self.min_distance)?;
        ConfigError::check_positive("camera zoom-in factor", self.zoom_in_factor)?;
        ConfigError::check_positive("camera zoom-out factor", self.zoom_out_factor)?;

        if p.zfar <= p.znear {
            return Err(ConfigError::Inconsistent {
                name: "camera clip planes",
                reason: format!("zfar {} must exceed znear {}", p.zfar, p.znear),
            });
        }

        if self.max_distance < self.min_distance {
            return Err(ConfigError::Inconsistent {
                name: "camera distance limits",
                reason: format!(
                    "max {} is below min {}",
                    self.max_distance, self.min_distance
                ),
            });
        }

        Ok(())
    }
}

/// Owns the six cameras and tracks the active one.
#[derive(Clone, Debug)]
pub struct CameraManager {
    config: CameraConfig,
    orbits: [OrbitCamera3d; 3],
    follows: [FollowCamera3d; 3],
    active: CameraView,
    zoom_in: EdgeTrigger,
    zoom_out: EdgeTrigger,
}

impl CameraManager {
    /// Creates the cameras; the printer and shelf cameras are placed once
    /// relative to their targets.
    pub fn new(config: CameraConfig, printer_center: Vec3, shelf_center: Vec3) -> CameraManager {
        let orbit = |eye: Vec3, at: Vec3| {
            let mut cam = OrbitCamera3d::new_with_perspective(config.perspective, eye, at);
            cam.set_dist_limits(config.min_distance, config.max_distance);
            cam
        };
        let follow = |mode| FollowCamera3d::new_with_perspective(mode, config.perspective);

        CameraManager {
            config,
            orbits: [
                orbit(config.overview_eye, config.overview_target),
                orbit(printer_center + config.printer_offset, printer_center),
                orbit(shelf_center + config.shelf_offset, shelf_center),
            ],
            follows: [
                follow(FollowMode::Driver),
                follow(FollowMode::Rear),
                follow(FollowMode::Side),
            ],
            active: CameraView::default(),
            zoom_in: EdgeTrigger::default(),
            zoom_out: EdgeTrigger::default(),
        }
    }

    /// The camera settings.
    #[inline]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// The active view.
    #[inline]
    pub fn active_view(&self) -> CameraView {
        self.active
    }

    /// Makes `view` the active view.
    pub fn select(&mut self, view: CameraView) {
        if view != self.active {
            debug!("Switching to the {} camera.", view);
            self.active = view;
        }
    }

    /// The active camera.
    pub fn active(&self) -> &dyn Camera3d {
        self.camera(self.active)
    }

    /// The camera behind `view`.
    pub fn camera(&self, view: CameraView) -> &dyn Camera3d {
        match self.slot(view) {
            Ok(i) => &self.orbits[i],
            Err(i) => &self.follows[i],
        }
    }

    /// The orbit camera behind `view`, if `view` is an orbit view.
    pub fn orbit(&self, view: CameraView) -> Option<&OrbitCamera3d> {
        self.slot(view).ok().map(|i| &self.orbits[i])
    }

    /// Index into `orbits` (`Ok`) or `follows` (`Err`).
    fn slot(&self, view: CameraView) -> Result<usize, usize> {
        let i = view as usize;
        if view.is_orbit() {
            Ok(i)
        } else {
            Err(i - 3)
        }
    }

    /// Zooms the active orbit camera. Follow views ignore zoom.
    pub fn zoom(&mut self, factor: f32) {
        if let Ok(i) = self.slot(self.active) {
            self.orbits[i].zoom(factor);
        }
    }

    /// Reads view selection digits and the edge-triggered zoom keys.
    pub fn handle_input(&mut self, input: &Input, bindings: &KeyBindings) {
        for view in CameraView::ALL {
            if Key::digit(view.digit()).is_some_and(|k| input.key(k)) {
                self.select(view);
            }
        }

        if self.zoom_in.update(input.key(bindings.zoom_in)) {
            self.zoom(self.config.zoom_in_factor);
        }
        if self.zoom_out.update(input.key(bindings.zoom_out)) {
            self.zoom(self.config.zoom_out_factor);
        }
    }

    /// Moves the follow cameras with the forklift.
    pub fn update(&mut self, position: Vec3, heading: f32) {
        for cam in &mut self.follows {
            cam.follow(position, heading);
        }
    }

    /// Adapts every camera to a new viewport size.
    pub fn resize(&mut self, width: f32, height: f32) {
        for cam in &mut self.orbits {
            cam.resize(width, height);
        }
        for cam in &mut self.follows {
            cam.resize(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CameraManager {
        CameraManager::new(
            CameraConfig::default(),
            Vec3::new(-12.0, 0.0, -6.0),
            Vec3::new(8.0, 0.0, -3.0),
        )
    }

    #[test]
    fn digits_map_to_views() {
        assert_eq!(CameraView::from_digit(1), Some(CameraView::Overview));
        assert_eq!(CameraView::from_digit(6), Some(CameraView::Side));
        assert_eq!(CameraView::from_digit(0), None);
        assert_eq!(CameraView::from_digit(7), None);
        assert!(CameraView::ALL.iter().all(|v| CameraView::from_digit(v.digit()) == Some(*v)));
    }

    #[test]
    fn orbit_cameras_are_placed_around_their_targets() {
        let m = manager();
        let printer = m.orbit(CameraView::Printer).unwrap();
        assert_eq!(printer.at(), Vec3::new(-12.0, 0.0, -6.0));
        assert_eq!(printer.eye(), Vec3::new(-4.0, 6.0, 2.0));

        let shelf = m.camera(CameraView::Shelf);
        assert_eq!(shelf.eye(), Vec3::new(2.0, 3.0, 7.0));
        assert!(m.orbit(CameraView::Driver).is_none());
    }

    #[test]
    fn selection_and_edge_triggered_zoom() {
        let mut m = manager();
        let bindings = KeyBindings::default();
        let mut input = Input::new();

        input.on_key(Key::Key2, true);
        m.handle_input(&input, &bindings);
        input.on_key(Key::Key2, false);
        assert_eq!(m.active_view(), CameraView::Printer);

        let before = m.orbit(CameraView::Printer).unwrap().distance();
        input.on_key(Key::O, true);
        for _ in 0..5 {
            m.handle_input(&input, &bindings);
        }
        let after = m.orbit(CameraView::Printer).unwrap().distance();
        assert!((after - before * 0.8).abs() < 1.0e-4);

        // Zoom out past the limit.
        input.on_key(Key::O, false);
        for _ in 0..30 {
            input.on_key(Key::P, true);
            m.handle_input(&input, &bindings);
            input.on_key(Key::P, false);
            m.handle_input(&input, &bindings);
        }
        assert!((m.orbit(CameraView::Printer).unwrap().distance() - 50.0).abs() < 1.0e-3);

        // Other orbit cameras are untouched.
        let overview = m.orbit(CameraView::Overview).unwrap();
        assert!((overview.distance() - Vec3::new(20.0, 13.0, 20.0).length()).abs() < 1.0e-4);
    }

    #[test]
    fn follow_views_ignore_zoom_and_track_the_forklift() {
        let mut m = manager();
        m.select(CameraView::Rear);
        m.zoom(0.5);

        m.update(Vec3::new(1.0, 0.55, 1.0), 0.0);
        let rear = m.active();
        assert!((rear.eye() - Vec3::new(1.0, 2.55, -4.0)).length() < 1.0e-5);
    }

    #[test]
    fn config_validation() {
        assert!(CameraConfig::default().validate().is_ok());
        assert!(CameraConfig::default()
            .with_distance_limits(10.0, 5.0)
            .validate()
            .is_err());

        let mut bad = CameraConfig::default();
        bad.perspective.zfar = 0.05;
        assert!(bad.validate().is_err());
    }
}
