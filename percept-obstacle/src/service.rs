use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use percept_api::{
    image::DynamicImage, Classification, Context, Dependencies, Detection, Error, Extra, Object,
    PointCloudCamera, ResourceConfig, ResourceName, VisionService,
};
use tracing::{debug, info};

use crate::{
    config::ObstacleServiceConfig,
    scanner::{ObstacleScanner, ScanResult, Thresholds},
};

// Everything a scan reads from the configuration. Replaced as a whole.
struct Snapshot {
    scanner: ObstacleScanner,
    camera_name: String,
    camera: Arc<dyn PointCloudCamera>,
}

impl Snapshot {
    fn build(
        path: &str,
        deps: &Dependencies,
        config: &ObstacleServiceConfig,
    ) -> Result<Self, Error> {
        config.validate(path)?;
        let thresholds = config.thresholds(path)?;
        let camera = deps.camera(&config.camera)?;
        Ok(Self {
            scanner: ObstacleScanner::new(thresholds),
            camera_name: config.camera.clone(),
            camera,
        })
    }
}

/// Vision service that reports the nearest-looking obstacle in a point cloud.
///
/// Only [`VisionService::object_point_clouds`] is supported. Every other
/// capability returns [`Error::Unimplemented`].
pub struct ObstacleService {
    name: ResourceName,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl ObstacleService {
    pub fn new(
        name: impl Into<String>,
        deps: &Dependencies,
        config: &ObstacleServiceConfig,
    ) -> Result<Self, Error> {
        let name = ResourceName::vision(name);
        let snapshot = Snapshot::build(&name.name, deps, config)?;
        info!(
            service = %name,
            camera = %snapshot.camera_name,
            thresholds = ?snapshot.scanner.thresholds(),
            "created obstacle service"
        );
        Ok(Self {
            name,
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Builds the service from a generic resource config.
    pub fn from_resource_config(
        deps: &Dependencies,
        config: &ResourceConfig,
    ) -> Result<Self, Error> {
        let native: ObstacleServiceConfig = config.native_config()?;
        Self::new(&config.name, deps, &native)
    }

    /// Replaces the thresholds and the camera together.
    ///
    /// On error the previous configuration stays in effect.
    pub fn reconfigure(
        &self,
        deps: &Dependencies,
        config: &ObstacleServiceConfig,
    ) -> Result<(), Error> {
        let snapshot = Snapshot::build(&self.name.name, deps, config)?;
        info!(
            service = %self.name,
            camera = %snapshot.camera_name,
            thresholds = ?snapshot.scanner.thresholds(),
            "reconfigured obstacle service"
        );
        *self.snapshot.write() = Arc::new(snapshot);
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        self.snapshot.read().scanner.thresholds()
    }

    pub fn camera_name(&self) -> String {
        self.snapshot.read().camera_name.clone()
    }

    /// Reads the next point cloud from the configured camera and scans it.
    ///
    /// Acquisition errors are returned as produced by the camera.
    pub fn scan(&self, ctx: &Context) -> Result<ScanResult, Error> {
        ctx.check()?;
        let snapshot = self.snapshot.read().clone();
        let cloud = snapshot.camera.next_point_cloud(ctx)?;
        ctx.check()?;
        let result = snapshot.scanner.scan(&cloud);
        debug!(
            service = %self.name,
            camera = %snapshot.camera_name,
            visited = result.visited,
            obstacle = ?result.obstacle,
            "scanned point cloud"
        );
        Ok(result)
    }
}

impl fmt::Debug for ObstacleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot.read();
        f.debug_struct("ObstacleService")
            .field("name", &self.name)
            .field("camera", &snapshot.camera_name)
            .field("thresholds", &snapshot.scanner.thresholds())
            .finish()
    }
}

impl VisionService for ObstacleService {
    fn name(&self) -> ResourceName {
        self.name.clone()
    }

    fn detections_from_camera(
        &self,
        _ctx: &Context,
        _camera_name: &str,
        _extra: &Extra,
    ) -> Result<Vec<Detection>, Error> {
        Err(Error::unimplemented("detections_from_camera"))
    }

    fn detections(
        &self,
        _ctx: &Context,
        _image: &DynamicImage,
        _extra: &Extra,
    ) -> Result<Vec<Detection>, Error> {
        Err(Error::unimplemented("detections"))
    }

    fn classifications_from_camera(
        &self,
        _ctx: &Context,
        _camera_name: &str,
        _n: usize,
        _extra: &Extra,
    ) -> Result<Vec<Classification>, Error> {
        Err(Error::unimplemented("classifications_from_camera"))
    }

    fn classifications(
        &self,
        _ctx: &Context,
        _image: &DynamicImage,
        _n: usize,
        _extra: &Extra,
    ) -> Result<Vec<Classification>, Error> {
        Err(Error::unimplemented("classifications"))
    }

    /// Scans the configured camera. `camera_name` is only logged.
    fn object_point_clouds(
        &self,
        ctx: &Context,
        camera_name: &str,
        _extra: &Extra,
    ) -> Result<Vec<Object>, Error> {
        debug!(service = %self.name, requested_camera = camera_name, "object_point_clouds");
        Ok(vec![self.scan(ctx)?.to_object()])
    }

    fn do_command(&self, _ctx: &Context, _command: &Extra) -> Result<Extra, Error> {
        Err(Error::unimplemented("do_command"))
    }

    fn close(&self, _ctx: &Context) -> Result<(), Error> {
        Err(Error::unimplemented("close"))
    }
}
