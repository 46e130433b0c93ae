//! Camera trait with the orbit and forklift-following implementations.

pub use self::camera3d::{Camera3d, Perspective};
pub use self::follow3d::{FollowCamera3d, FollowMode};
pub use self::manager::{CameraConfig, CameraManager, CameraView};
pub use self::orbit3d::OrbitCamera3d;

mod camera3d;
mod follow3d;
mod manager;
mod orbit3d;
