use percept_api::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scanner::Thresholds;

/// Attributes of the obstacle detection service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ObstacleServiceConfig {
    /// Points at or beyond this distance are clear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance_mm: Option<f64>,
    /// Points whose x is below this position are clear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_position_mm: Option<f64>,
    /// Name of the point cloud camera to read from.
    #[serde(default)]
    pub camera: String,
}

impl ObstacleServiceConfig {
    pub fn new(max_distance_mm: f64, zero_position_mm: f64, camera: impl Into<String>) -> Self {
        Self {
            max_distance_mm: Some(max_distance_mm),
            zero_position_mm: Some(zero_position_mm),
            camera: camera.into(),
        }
    }

    /// Checks that every required attribute is present and returns the names
    /// of the resources this service depends on.
    ///
    /// `path` identifies the service in error messages.
    pub fn validate(&self, path: &str) -> Result<Vec<String>, Error> {
        self.thresholds(path)?;
        if self.camera.is_empty() {
            return Err(missing("camera", path));
        }
        Ok(vec![self.camera.clone()])
    }

    pub fn thresholds(&self, path: &str) -> Result<Thresholds, Error> {
        let max_distance = required(self.max_distance_mm, "max_distance_mm", path)?;
        let zero_position = required(self.zero_position_mm, "zero_position_mm", path)?;
        Thresholds::new(max_distance, zero_position).map_err(|e| match e {
            Error::InvalidAttribute {
                attribute, message, ..
            } => {
                let attribute = format!("{attribute}_mm");
                warn!(%attribute, path, %message, "rejected obstacle service config");
                Error::InvalidAttribute {
                    attribute,
                    path: path.to_owned(),
                    message,
                }
            }
            e => e,
        })
    }
}

fn required(value: Option<f64>, attribute: &str, path: &str) -> Result<f64, Error> {
    value.ok_or_else(|| missing(attribute, path))
}

fn missing(attribute: &str, path: &str) -> Error {
    warn!(attribute, path, "obstacle service config is missing an attribute");
    Error::MissingAttribute {
        attribute: attribute.to_owned(),
        path: path.to_owned(),
    }
}
