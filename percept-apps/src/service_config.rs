use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use percept_api::{
    Dependencies, DummyPointCloudCamera, Point3, PointCloud, PointCloudCamera, ResourceConfig,
    VisionService,
};
use percept_tracing::Tracing;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, PcdFileCamera, Registry};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type")]
#[serde(deny_unknown_fields)]
pub enum CameraConfig {
    /// Returns the same points on every call.
    Static {
        name: String,
        #[serde(default)]
        points: Vec<[f64; 3]>,
    },
    /// Reads a PCD file on every call. Relative paths are resolved against the
    /// directory of the config file.
    Pcd { name: String, path: PathBuf },
}

impl CameraConfig {
    pub fn name(&self) -> &str {
        match self {
            CameraConfig::Static { name, .. } | CameraConfig::Pcd { name, .. } => name,
        }
    }

    fn create(&self) -> Box<dyn PointCloudCamera> {
        match self {
            CameraConfig::Static { points, .. } => {
                let cloud: PointCloud = points.iter().copied().map(Point3::from).collect();
                Box::new(DummyPointCloudCamera::new(cloud))
            }
            CameraConfig::Pcd { name, path } => Box::new(PcdFileCamera::new(name, path)),
        }
    }
}

/// Which capabilities are wrapped with [`Tracing`].
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TracingConfig {
    #[serde(default)]
    pub camera: bool,
    #[serde(default)]
    pub vision: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    // toml 0.5 rejects an empty array of tables emitted after a table.
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ResourceConfig>,
    #[serde(default)]
    pub tracing_config: TracingConfig,
}

impl ServiceConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &fs_err::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        let mut config: ServiceConfig =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        for camera in &mut config.cameras {
            if let CameraConfig::Pcd { path: pcd_path, .. } = camera {
                if pcd_path.is_relative() {
                    *pcd_path = resolve_relative_path(&path, &*pcd_path)?;
                }
            }
        }
        debug!("{:?}", config);
        Ok(config)
    }

    /// Builds every configured camera.
    pub fn create_cameras(&self) -> Result<Dependencies, Error> {
        let mut deps = Dependencies::new();
        for camera in &self.cameras {
            if deps.contains(camera.name()) {
                return Err(Error::DuplicateName(camera.name().to_owned()));
            }
            let client = camera.create();
            let client: Arc<dyn PointCloudCamera> = if self.tracing_config.camera {
                Arc::new(Tracing::new(client))
            } else {
                Arc::from(client)
            };
            deps.insert_camera(camera.name(), client);
        }
        Ok(deps)
    }

    /// Validates and constructs every configured service, in file order.
    pub fn create_services(
        &self,
        registry: &Registry,
    ) -> Result<Vec<Box<dyn VisionService>>, Error> {
        let deps = self.create_cameras()?;
        let mut names = HashSet::new();
        let mut services = Vec::with_capacity(self.services.len());
        for config in &self.services {
            if !names.insert(config.name.as_str()) {
                return Err(Error::DuplicateName(config.name.clone()));
            }
            let service = registry.create(&deps, config)?;
            services.push(if self.tracing_config.vision {
                Box::new(Tracing::new(service)) as Box<dyn VisionService>
            } else {
                service
            });
        }
        Ok(services)
    }
}

/// Convert relative path into absolute one
fn resolve_relative_path<B: AsRef<Path>, P: AsRef<Path>>(
    base_path: B,
    path: P,
) -> Result<PathBuf, Error> {
    Ok(base_path
        .as_ref()
        .parent()
        .ok_or_else(|| Error::NoParentDirectory(base_path.as_ref().to_owned()))?
        .join(path))
}
