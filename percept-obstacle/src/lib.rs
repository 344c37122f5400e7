//! Point cloud obstacle detection.
//!
//! [`ObstacleScanner`] classifies every point of a cloud against a
//! [`Thresholds`] pair and keeps the last obstacle it sees.
//! [`ObstacleService`] exposes it as a [`percept_api::VisionService`] fed by a
//! [`percept_api::PointCloudCamera`].

mod config;
mod scanner;
mod service;

use percept_api::Model;

pub use crate::{config::*, scanner::*, service::*};

/// Registry name of [`ObstacleService`].
pub const MODEL: &str = "viamlabs:service:obstacle-detection";

pub fn model() -> Model {
    Model::new("viamlabs", "service", "obstacle-detection")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model() {
        assert_eq!(model().to_string(), MODEL);
        assert_eq!(MODEL.parse::<Model>().unwrap(), model());
    }
}
