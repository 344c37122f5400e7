mod error;
mod pcd_camera;
mod registry;
mod service_config;
pub mod utils;

pub use crate::{error::*, pcd_camera::*, registry::*, service_config::*};
