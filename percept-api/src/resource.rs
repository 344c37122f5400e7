use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use tracing::warn;

use crate::{
    error::{Error, Result},
    traits::PointCloudCamera,
};

/// API triplet of the vision service capability.
pub const VISION_API: &str = "rdk:service:vision";

/// Identifies a resource implementation as `namespace:family:name`,
/// e.g. `viamlabs:service:obstacle-detection`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Model {
    pub namespace: String,
    pub family: String,
    pub name: String,
}

impl Model {
    pub fn new(
        namespace: impl Into<String>,
        family: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            family: family.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts[..] {
            [namespace, family, name]
                if !namespace.is_empty() && !family.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(namespace, family, name))
            }
            _ => Err(Error::InvalidConfig {
                message: format!("model {s:?} must be of the form namespace:family:name"),
            }),
        }
    }
}

impl JsonSchema for Model {
    fn schema_name() -> String {
        "Model".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// Fully qualified name of a configured resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName {
    pub api: String,
    pub name: String,
}

impl ResourceName {
    pub fn vision(name: impl Into<String>) -> Self {
        Self {
            api: VISION_API.to_owned(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api, self.name)
    }
}

/// Configuration of one resource: its name, the model that implements it, and
/// model-specific attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub name: String,
    pub model: Model,
    #[serde(default)]
    #[schemars(with = "serde_json::Map<String, serde_json::Value>")]
    pub attributes: toml::value::Table,
}

impl ResourceConfig {
    /// Converts the attributes into the model's own config type.
    pub fn native_config<T: DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.attributes.clone())
            .try_into()
            .map_err(|e| Error::InvalidConfig {
                message: format!(
                    "Could not assert proper config for {} ({e})",
                    self.model.name
                ),
            })
    }
}

/// Resources a service may depend on, looked up by name.
#[derive(Clone, Default)]
pub struct Dependencies {
    cameras: HashMap<String, Arc<dyn PointCloudCamera>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_camera(&mut self, name: impl Into<String>, camera: Arc<dyn PointCloudCamera>) {
        let name = name.into();
        if self.cameras.insert(name.clone(), camera).is_some() {
            warn!(%name, "replaced camera dependency");
        }
    }

    pub fn camera(&self, name: &str) -> Result<Arc<dyn PointCloudCamera>> {
        self.cameras
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NoResource(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cameras.contains_key(name)
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("cameras", &self.cameras.keys().collect::<Vec<_>>())
            .finish()
    }
}
