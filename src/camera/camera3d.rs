use glamx::{Mat4, Pose3, Vec2, Vec3, Vec4, Vec4Swizzles};

/// Perspective projection parameters shared by every camera.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Perspective {
    /// Vertical field of view, in radians.
    pub fov: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Viewport width over height.
    pub aspect: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Perspective::new(65.0f32.to_radians(), 0.1, 500.0)
    }
}

impl Perspective {
    /// A projection with a 4:3 aspect ratio until the first resize.
    pub fn new(fov: f32, znear: f32, zfar: f32) -> Perspective {
        Perspective {
            fov,
            znear,
            zfar,
            aspect: 800.0 / 600.0,
        }
    }

    /// Updates the aspect ratio from a viewport size. Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// The OpenGL-style right-handed projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.znear, self.zfar)
    }
}

/// Trait that all camera implementations must implement.
///
/// Cameras only describe a viewpoint: the simulation drives them from the
/// frame loop and a renderer reads their matrices.
///
/// # Implementations
/// - [`OrbitCamera3d`](crate::camera::OrbitCamera3d) - Camera looking at a fixed target, with zoom
/// - [`FollowCamera3d`](crate::camera::FollowCamera3d) - Camera attached to the forklift
pub trait Camera3d {
    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Returns the point the camera looks at.
    fn at(&self) -> Vec3;

    /// Returns the camera's view transformation.
    ///
    /// This is the inverse of the camera's world transformation and is used
    /// to transform world coordinates into camera/view space.
    fn view_transform(&self) -> Pose3;

    /// Returns the combined projection and view transformation matrix.
    ///
    /// This matrix transforms points from world coordinates to normalized device coordinates (NDC).
    fn transformation(&self) -> Mat4;

    /// Returns the inverse of the combined transformation matrix.
    fn inverse_transformation(&self) -> Mat4;

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);

    /// Returns the view transformation and the projection matrix.
    fn view_transform_pair(&self) -> (Pose3, Mat4);

    /// Adapts the projection to a new viewport size, in pixels.
    fn resize(&mut self, width: f32, height: f32);

    /// Projects a 3D point in world coordinates to 2D screen coordinates.
    ///
    /// # Returns
    /// A 2D vector with screen coordinates (in pixels, origin at bottom-left)
    fn project(&self, world_coord: Vec3, size: Vec2) -> Vec2 {
        let h_world_coord = world_coord.extend(1.0);
        let h_normalized_coord = self.transformation() * h_world_coord;

        let normalized_coord = h_normalized_coord.xyz() / h_normalized_coord.w;

        Vec2::new(
            (1.0 + normalized_coord.x) * size.x / 2.0,
            (1.0 + normalized_coord.y) * size.y / 2.0,
        )
    }

    /// Unprojects a 2D screen point to a 3D ray in world space.
    ///
    /// # Returns
    /// A tuple `(origin, direction)` where `origin` lies on the near plane
    /// and `direction` is normalized.
    fn unproject(&self, window_coord: Vec2, size: Vec2) -> (Vec3, Vec3) {
        let normalized_coord = Vec2::new(
            2.0 * window_coord.x / size.x - 1.0,
            2.0 * -window_coord.y / size.y + 1.0,
        );

        let normalized_begin = Vec4::new(normalized_coord.x, normalized_coord.y, -1.0, 1.0);
        let normalized_end = Vec4::new(normalized_coord.x, normalized_coord.y, 1.0, 1.0);

        let cam = self.inverse_transformation();

        let h_unprojected_begin = cam * normalized_begin;
        let h_unprojected_end = cam * normalized_end;

        let unprojected_begin = h_unprojected_begin.xyz() / h_unprojected_begin.w;
        let unprojected_end = h_unprojected_end.xyz() / h_unprojected_end.w;

        (
            unprojected_begin,
            (unprojected_end - unprojected_begin).normalize(),
        )
    }
}
