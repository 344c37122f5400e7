use std::{collections::HashMap, fmt};

use percept_api::{Dependencies, Model, ResourceConfig, VisionService};
use percept_obstacle::ObstacleService;
use tracing::debug;

use crate::Error;

pub type ServiceConstructor =
    fn(&Dependencies, &ResourceConfig) -> Result<Box<dyn VisionService>, percept_api::Error>;

/// Maps a [`Model`] to the function that builds its service.
#[derive(Clone)]
pub struct Registry {
    constructors: HashMap<Model, ServiceConstructor>,
}

impl Registry {
    /// Creates a registry with no models.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers `constructor` for `model`, returning the one it replaces.
    pub fn register(
        &mut self,
        model: Model,
        constructor: ServiceConstructor,
    ) -> Option<ServiceConstructor> {
        self.constructors.insert(model, constructor)
    }

    pub fn contains(&self, model: &Model) -> bool {
        self.constructors.contains_key(model)
    }

    pub fn create(
        &self,
        deps: &Dependencies,
        config: &ResourceConfig,
    ) -> Result<Box<dyn VisionService>, Error> {
        let constructor = self
            .constructors
            .get(&config.model)
            .ok_or_else(|| Error::UnknownModel(config.model.clone()))?;
        debug!(name = %config.name, model = %config.model, "creating service");
        Ok(constructor(deps, config)?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(percept_obstacle::model(), |deps, config| {
            Ok(Box::new(ObstacleService::from_resource_config(deps, config)?))
        });
        registry
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use percept_api::{DummyPointCloudCamera, DummyVisionService};

    use super::*;

    fn obstacle_config(attributes: &str) -> ResourceConfig {
        ResourceConfig {
            name: "obstacles".into(),
            model: percept_obstacle::model(),
            attributes: toml::from_str(attributes).unwrap(),
        }
    }

    #[test]
    fn test_default_registers_obstacle_model() {
        let registry = Registry::default();
        assert!(registry.contains(&percept_obstacle::model()));

        let mut deps = Dependencies::new();
        deps.insert_camera("front", Arc::new(DummyPointCloudCamera::default()));
        let service = registry
            .create(
                &deps,
                &obstacle_config(
                    "max_distance_mm = 500.0\nzero_position_mm = 100.0\ncamera = \"front\"",
                ),
            )
            .unwrap();
        assert_eq!(service.name().name, "obstacles");
    }

    #[test]
    fn test_unknown_model() {
        let registry = Registry::empty();
        let Err(err) = registry.create(&Dependencies::new(), &obstacle_config("")) else {
            panic!("unknown model was accepted");
        };
        assert!(matches!(err, Error::UnknownModel(m) if m == percept_obstacle::model()));
    }

    #[test]
    fn test_constructor_errors_are_forwarded() {
        let Err(err) = Registry::default().create(
            &Dependencies::new(),
            &obstacle_config("camera = \"front\""),
        ) else {
            panic!("config without thresholds was accepted");
        };
        match err {
            Error::Api(percept_api::Error::MissingAttribute { attribute, path }) => {
                assert_eq!(attribute, "max_distance_mm");
                assert_eq!(path, "obstacles");
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = Registry::default();
        let replaced = registry.register(percept_obstacle::model(), |_, config| {
            Ok(Box::new(DummyVisionService::new(&config.name)))
        });
        assert!(replaced.is_some());
        let service = registry
            .create(&Dependencies::new(), &obstacle_config(""))
            .unwrap();
        assert_eq!(service.name().name, "obstacles");
    }
}
