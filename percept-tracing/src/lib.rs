//! Logs every call made through a percept-api capability.
//!
//! Wrap an implementation in [`Tracing`] and each call emits a `trace` event
//! whose `method` field names the capability method. Logs written in JSON
//! format can be read back with [`de::from_str`].

pub mod de;

use percept_api::{
    image::DynamicImage, Classification, Context, Detection, Error, Extra, Object, PointCloud,
    PointCloudCamera, ResourceName, VisionService,
};
use tracing::trace;

#[derive(Debug)]
pub struct Tracing<T>(T);

impl<T> Tracing<T> {
    pub fn new(v: T) -> Self {
        Self(v)
    }

    pub fn get_ref(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Tracing<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PointCloudCamera> PointCloudCamera for Tracing<T> {
    fn next_point_cloud(&self, ctx: &Context) -> Result<PointCloud, Error> {
        let point_cloud = self.0.next_point_cloud(ctx)?;
        trace!(
            method = "percept_api::PointCloudCamera::next_point_cloud",
            num_points = point_cloud.len(),
        );
        Ok(point_cloud)
    }
}

impl<T: VisionService> VisionService for Tracing<T> {
    fn name(&self) -> ResourceName {
        self.0.name()
    }

    fn detections_from_camera(
        &self,
        ctx: &Context,
        camera_name: &str,
        extra: &Extra,
    ) -> Result<Vec<Detection>, Error> {
        trace!(
            method = "percept_api::VisionService::detections_from_camera",
            camera_name,
        );
        self.0.detections_from_camera(ctx, camera_name, extra)
    }

    fn detections(
        &self,
        ctx: &Context,
        image: &DynamicImage,
        extra: &Extra,
    ) -> Result<Vec<Detection>, Error> {
        trace!(
            method = "percept_api::VisionService::detections",
            image_width = image.width(),
            image_height = image.height(),
        );
        self.0.detections(ctx, image, extra)
    }

    fn classifications_from_camera(
        &self,
        ctx: &Context,
        camera_name: &str,
        n: usize,
        extra: &Extra,
    ) -> Result<Vec<Classification>, Error> {
        trace!(
            method = "percept_api::VisionService::classifications_from_camera",
            camera_name,
            n,
        );
        self.0.classifications_from_camera(ctx, camera_name, n, extra)
    }

    fn classifications(
        &self,
        ctx: &Context,
        image: &DynamicImage,
        n: usize,
        extra: &Extra,
    ) -> Result<Vec<Classification>, Error> {
        trace!(
            method = "percept_api::VisionService::classifications",
            image_width = image.width(),
            image_height = image.height(),
            n,
        );
        self.0.classifications(ctx, image, n, extra)
    }

    fn object_point_clouds(
        &self,
        ctx: &Context,
        camera_name: &str,
        extra: &Extra,
    ) -> Result<Vec<Object>, Error> {
        let objects = self.0.object_point_clouds(ctx, camera_name, extra)?;
        trace!(
            method = "percept_api::VisionService::object_point_clouds",
            camera_name,
            num_objects = objects.len(),
        );
        Ok(objects)
    }

    fn do_command(&self, ctx: &Context, command: &Extra) -> Result<Extra, Error> {
        trace!(
            method = "percept_api::VisionService::do_command",
            command = %serde_json::Value::Object(command.clone()),
        );
        self.0.do_command(ctx, command)
    }

    fn close(&self, ctx: &Context) -> Result<(), Error> {
        trace!(method = "percept_api::VisionService::close");
        self.0.close(ctx)
    }
}
