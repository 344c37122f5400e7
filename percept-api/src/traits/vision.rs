use auto_impl::auto_impl;
use image::DynamicImage;
use serde::Serialize;

use crate::{context::Context, error::Result, geometry::Object, resource::ResourceName};

/// Free-form arguments and results passed through capability calls.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// A labeled 2D bounding box in image coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
    pub score: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

/// The vision service capability.
///
/// An implementation may support only part of it; the rest must return
/// [`Error::Unimplemented`](crate::Error::Unimplemented) immediately.
#[auto_impl(Box, Arc)]
pub trait VisionService: Send + Sync {
    fn name(&self) -> ResourceName;

    fn detections_from_camera(
        &self,
        ctx: &Context,
        camera_name: &str,
        extra: &Extra,
    ) -> Result<Vec<Detection>>;

    fn detections(&self, ctx: &Context, image: &DynamicImage, extra: &Extra)
        -> Result<Vec<Detection>>;

    fn classifications_from_camera(
        &self,
        ctx: &Context,
        camera_name: &str,
        n: usize,
        extra: &Extra,
    ) -> Result<Vec<Classification>>;

    fn classifications(
        &self,
        ctx: &Context,
        image: &DynamicImage,
        n: usize,
        extra: &Extra,
    ) -> Result<Vec<Classification>>;

    /// Segments the point cloud of `camera_name` into objects.
    fn object_point_clouds(
        &self,
        ctx: &Context,
        camera_name: &str,
        extra: &Extra,
    ) -> Result<Vec<Object>>;

    fn do_command(&self, ctx: &Context, command: &Extra) -> Result<Extra>;

    fn close(&self, ctx: &Context) -> Result<()>;
}
