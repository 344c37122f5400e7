mod point_cloud_camera;
mod vision;

pub use point_cloud_camera::*;
pub use vision::*;
