use image::DynamicImage;

use crate::{
    context::Context,
    error::Error,
    geometry::Object,
    resource::ResourceName,
    traits::{Classification, Detection, Extra, VisionService},
};

/// Dummy VisionService for debug or tests.
///
/// Reports no detections or classifications, returns `objects` from
/// [`VisionService::object_point_clouds`] and echoes commands back.
#[derive(Debug)]
pub struct DummyVisionService {
    pub name: ResourceName,
    pub objects: Vec<Object>,
}

impl DummyVisionService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ResourceName::vision(name),
            objects: vec![],
        }
    }
}

impl Default for DummyVisionService {
    fn default() -> Self {
        Self::new("dummy")
    }
}

impl VisionService for DummyVisionService {
    fn name(&self) -> ResourceName {
        self.name.clone()
    }

    fn detections_from_camera(
        &self,
        ctx: &Context,
        _camera_name: &str,
        _extra: &Extra,
    ) -> Result<Vec<Detection>, Error> {
        ctx.check()?;
        Ok(vec![])
    }

    fn detections(
        &self,
        ctx: &Context,
        _image: &DynamicImage,
        _extra: &Extra,
    ) -> Result<Vec<Detection>, Error> {
        ctx.check()?;
        Ok(vec![])
    }

    fn classifications_from_camera(
        &self,
        ctx: &Context,
        _camera_name: &str,
        _n: usize,
        _extra: &Extra,
    ) -> Result<Vec<Classification>, Error> {
        ctx.check()?;
        Ok(vec![])
    }

    fn classifications(
        &self,
        ctx: &Context,
        _image: &DynamicImage,
        _n: usize,
        _extra: &Extra,
    ) -> Result<Vec<Classification>, Error> {
        ctx.check()?;
        Ok(vec![])
    }

    fn object_point_clouds(
        &self,
        ctx: &Context,
        _camera_name: &str,
        _extra: &Extra,
    ) -> Result<Vec<Object>, Error> {
        ctx.check()?;
        Ok(self.objects.clone())
    }

    fn do_command(&self, ctx: &Context, command: &Extra) -> Result<Extra, Error> {
        ctx.check()?;
        Ok(command.clone())
    }

    fn close(&self, _ctx: &Context) -> Result<(), Error> {
        Ok(())
    }
}
