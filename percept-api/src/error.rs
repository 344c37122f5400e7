use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("percept-api: expected {:?} attribute for {:?}", attribute, path)]
    MissingAttribute { attribute: String, path: String },
    #[error(
        "percept-api: Invalid attribute {:?} for {:?}: {}",
        attribute,
        path,
        message
    )]
    InvalidAttribute {
        attribute: String,
        path: String,
        message: String,
    },
    #[error("percept-api: Invalid config : {}", message)]
    InvalidConfig { message: String },
    #[error("percept-api: No resource={} is found.", .0)]
    NoResource(String),
    #[error("percept-api: Failed to acquire point cloud from {} : {}", camera, message)]
    Acquisition { camera: String, message: String },
    #[error("percept-api: Camera={} returned no point cloud.", .0)]
    NoPointCloud(String),
    #[error("percept-api: Unimplemented : {}", .0)]
    Unimplemented(String),
    #[error("percept-api: Canceled : {}", message)]
    Canceled { message: String },
    #[error("percept-api: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns `true` for errors raised while validating or applying a configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingAttribute { .. }
                | Error::InvalidAttribute { .. }
                | Error::InvalidConfig { .. }
                | Error::NoResource(_)
        )
    }

    /// Returns `true` for errors raised while reading from a camera.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Error::Acquisition { .. } | Error::NoPointCloud(_))
    }

    pub fn unimplemented(method: impl Into<String>) -> Self {
        Error::Unimplemented(method.into())
    }
}
