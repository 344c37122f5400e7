//! Perception service interfaces.
//!
//! [`PointCloudCamera`] is the source of point cloud snapshots and
//! [`VisionService`] is the capability exposed by perception services.
//! Implementations live in their own crates; this crate only holds the traits,
//! the shared data model, the resource model used to wire services together,
//! and dummy implementations for tests.

mod clients;
mod context;
mod error;
mod geometry;
mod point_cloud;
mod resource;
mod traits;

pub use clients::*;
pub use context::*;
pub use error::*;
pub use geometry::*;
pub use point_cloud::*;
pub use resource::*;
pub use traits::*;

// re-export
pub use image;
pub use nalgebra;
pub use nalgebra::{Point3, Vector3};
