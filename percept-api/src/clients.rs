mod dummy_point_cloud_camera;
mod dummy_vision;

pub use dummy_point_cloud_camera::*;
pub use dummy_vision::*;
