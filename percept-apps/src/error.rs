use std::path::PathBuf;

use percept_api::Model;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("percept-apps: No ConfigPath is specified.")]
    NoConfigPath,
    #[error("percept-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("percept-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("percept-apps: No ParentDirectory {:?} is found.", .0)]
    NoParentDirectory(PathBuf),
    #[error("percept-apps: No constructor is registered for model {}.", .0)]
    UnknownModel(Model),
    #[error("percept-apps: No service={:?} is configured.", .0)]
    NoService(String),
    #[error("percept-apps: Resource name {:?} is used more than once.", .0)]
    DuplicateName(String),
    #[error("percept-apps: percept-api: {}", .0)]
    Api(#[from] percept_api::Error),
}
