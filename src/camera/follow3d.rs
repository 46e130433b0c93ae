use crate::camera::{Camera3d, Perspective};
use glamx::{Mat4, Pose3, Vec3};
use std::fmt;

/// Where a [`FollowCamera3d`] sits relative to the vehicle it follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FollowMode {
    /// In the cab, looking ahead.
    Driver,
    /// Behind and above, looking at the vehicle.
    Rear,
    /// Beside and above, looking at the vehicle.
    Side,
}

impl fmt::Display for FollowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowMode::Driver => write!(f, "driver"),
            FollowMode::Rear => write!(f, "rear"),
            FollowMode::Side => write!(f, "side"),
        }
    }
}

/// A camera rigidly attached to a moving vehicle.
///
/// Call [`follow`](FollowCamera3d::follow) every frame with the vehicle
/// root position and heading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowCamera3d {
    mode: FollowMode,
    eye: Vec3,
    at: Vec3,

    perspective: Perspective,
    proj: Mat4,
    proj_view: Mat4,
    inverse_proj_view: Mat4,
}

impl FollowCamera3d {
    /// Creates a camera following a vehicle sitting at the origin, facing `+z`.
    pub fn new(mode: FollowMode) -> FollowCamera3d {
        FollowCamera3d::new_with_perspective(mode, Perspective::default())
    }

    /// Creates a follow camera with a custom projection.
    pub fn new_with_perspective(mode: FollowMode, perspective: Perspective) -> FollowCamera3d {
        let mut res = FollowCamera3d {
            mode,
            eye: Vec3::ZERO,
            at: Vec3::Z,
            perspective,
            proj: Mat4::IDENTITY,
            proj_view: Mat4::IDENTITY,
            inverse_proj_view: Mat4::IDENTITY,
        };

        res.follow(Vec3::ZERO, 0.0);
        res
    }

    /// The camera placement.
    #[inline]
    pub fn mode(&self) -> FollowMode {
        self.mode
    }

    /// Places the camera relative to a vehicle at `position` with the given heading.
    pub fn follow(&mut self, position: Vec3, heading: f32) {
        let forward = Vec3::new(heading.sin(), 0.0, heading.cos());

        match self.mode {
            FollowMode::Driver => {
                let mut eye = position - forward * 0.3;
                eye.y = position.y + 1.6;
                let mut at = position + forward * 5.0;
                at.y = position.y + 1.6;
                self.eye = eye;
                self.at = at;
            }
            FollowMode::Rear => {
                let mut eye = position - forward * 5.0;
                eye.y = position.y + 2.0;
                self.eye = eye;
                self.at = position + Vec3::Y;
            }
            FollowMode::Side => {
                let side = forward.cross(Vec3::Y);
                let mut eye = position + side * 5.0;
                eye.y = position.y + 2.0;
                self.eye = eye;
                self.at = position + Vec3::Y;
            }
        }

        self.update_projviews();
    }

    fn update_projviews(&mut self) {
        self.proj = self.perspective.matrix();
        self.proj_view = self.proj * self.view_transform().to_mat4();
        self.inverse_proj_view = self.proj_view.inverse();
    }
}

impl Camera3d for FollowCamera3d {
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

    fn view_transform_pair(&self) -> (Pose3, Mat4) {
        (self.view_transform(), self.proj)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.perspective.resize(width, height);
        self.update_projviews();
    }
}
