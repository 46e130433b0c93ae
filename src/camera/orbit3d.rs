use crate::camera::{Camera3d, Perspective};
use glamx::{Mat4, Pose3, Vec3};

/// A camera looking at a fixed target from an adjustable distance.
///
/// Zooming moves the eye along the target-to-eye direction and keeps the
/// distance inside `[min_dist, max_dist]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitCamera3d {
    eye: Vec3,
    at: Vec3,
    min_dist: f32,
    max_dist: f32,

    perspective: Perspective,
    proj: Mat4,
    view: Mat4,
    proj_view: Mat4,
    inverse_proj_view: Mat4,
}

impl Default for OrbitCamera3d {
    fn default() -> Self {
        OrbitCamera3d::new(Vec3::new(20.0, 15.0, 20.0), Vec3::new(0.0, 2.0, 0.0))
    }
}

impl OrbitCamera3d {
    /// Creates a camera at `eye` looking at `at`, with the default projection.
    pub fn new(eye: Vec3, at: Vec3) -> OrbitCamera3d {
        OrbitCamera3d::new_with_perspective(Perspective::default(), eye, at)
    }

    /// Creates a camera with a custom projection.
    pub fn new_with_perspective(perspective: Perspective, eye: Vec3, at: Vec3) -> OrbitCamera3d {
        let mut res = OrbitCamera3d {
            eye,
            at,
            min_dist: 5.0,
            max_dist: 50.0,
            perspective,
            proj: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            proj_view: Mat4::IDENTITY,
            inverse_proj_view: Mat4::IDENTITY,
        };

        res.update_projviews();
        res
    }

    /// Moves the camera to `eye` and points it at `at`.
    pub fn look_at(&mut self, eye: Vec3, at: Vec3) {
        self.eye = eye;
        self.at = at;
        self.update_projviews();
    }

    /// Distance between the eye and the target.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.at)
    }

    /// The zoom limits.
    #[inline]
    pub fn dist_limits(&self) -> (f32, f32) {
        (self.min_dist, self.max_dist)
    }

    /// Sets the zoom limits. The current distance is not re-clamped until the next zoom.
    pub fn set_dist_limits(&mut self, min_dist: f32, max_dist: f32) {
        self.min_dist = min_dist;
        self.max_dist = max_dist.max(min_dist);
    }

    /// Scales the eye-target distance by `factor`, within the zoom limits.
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.eye - self.at;
        let dist = offset.length();

        if dist == 0.0 || !factor.is_finite() {
            return;
        }

        let new_dist = (dist * factor).clamp(self.min_dist, self.max_dist);
        self.eye = self.at + offset * (new_dist / dist);
        self.update_projviews();
    }

    fn update_projviews(&mut self) {
        self.view = self.view_transform().to_mat4();
        self.proj = self.perspective.matrix();
        self.proj_view = self.proj * self.view;
        self.inverse_proj_view = self.proj_view.inverse();
    }
}

impl Camera3d for OrbitCamera3d {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn at(&self) -> Vec3 {
        self.at
    }

    fn view_transform(&self) -> Pose3 {
        Pose3::look_at_rh(self.eye, self.at, Vec3::Y)
    }

    fn transformation(&self) -> Mat4 {
        self.proj_view
    }

    fn inverse_transformation(&self) -> Mat4 {
        self.inverse_proj_view
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.perspective.znear, self.perspective.zfar)
    }

    #[inline]
    fn view_transform_pair(&self) -> (Pose3, Mat4) {
        (self.view_transform(), self.proj)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.perspective.resize(width, height);
        self.update_projviews();
    }
}
