use std::{
    sync::{Arc, Barrier},
    thread,
};

use percept_api::{
    image::DynamicImage, Context, Dependencies, DummyPointCloudCamera, Error, Extra, Geometry,
    Point3, PointCloud, PointCloudCamera, ResourceConfig, ResourceName, VisionService,
};
use percept_obstacle::{ObstacleService, ObstacleServiceConfig, OBSTACLE_LABEL};

fn cloud(points: &[[f64; 3]]) -> PointCloud {
    points
        .iter()
        .map(|&[x, y, z]| Point3::new(x, y, z))
        .collect()
}

fn deps_with(name: &str, camera: Arc<dyn PointCloudCamera>) -> Dependencies {
    let mut deps = Dependencies::new();
    deps.insert_camera(name, camera);
    deps
}

fn obstacle_of(service: &ObstacleService) -> Point3<f64> {
    let objects = service
        .object_point_clouds(&Context::new(), "front", &Extra::new())
        .unwrap();
    assert_eq!(objects.len(), 1);
    match &objects[0].geometry {
        Some(Geometry::Point { center, label }) => {
            assert_eq!(label, OBSTACLE_LABEL);
            assert_eq!(objects[0].point_cloud.len(), 1);
            assert!(objects[0].point_cloud.contains(center));
            *center
        }
        g => panic!("unexpected geometry {g:?}"),
    }
}

struct FailingCamera(fn() -> Error);

impl PointCloudCamera for FailingCamera {
    fn next_point_cloud(&self, _ctx: &Context) -> Result<PointCloud, Error> {
        Err((self.0)())
    }
}

/// Blocks inside `next_point_cloud` until the test releases it.
struct BlockingCamera {
    point_cloud: PointCloud,
    entered: Barrier,
    release: Barrier,
}

impl PointCloudCamera for BlockingCamera {
    fn next_point_cloud(&self, _ctx: &Context) -> Result<PointCloud, Error> {
        self.entered.wait();
        self.release.wait();
        Ok(self.point_cloud.clone())
    }
}

/// Cancels the context while "acquiring".
struct CancelingCamera;

impl PointCloudCamera for CancelingCamera {
    fn next_point_cloud(&self, ctx: &Context) -> Result<PointCloud, Error> {
        ctx.cancel();
        Ok(cloud(&[[200.0, 0.0, 0.0]]))
    }
}

#[test]
fn test_reference_scenario() {
    let camera = Arc::new(DummyPointCloudCamera::new(cloud(&[
        [50.0, 0.0, 0.0],
        [200.0, 0.0, 0.0],
        [600.0, 0.0, 0.0],
    ])));
    let service = ObstacleService::new(
        "obstacles",
        &deps_with("front", camera.clone()),
        &ObstacleServiceConfig::new(500.0, 100.0, "front"),
    )
    .unwrap();

    assert_eq!(service.name(), ResourceName::vision("obstacles"));
    assert_eq!(service.camera_name(), "front");
    assert_eq!(obstacle_of(&service), Point3::new(200.0, 0.0, 0.0));
    assert_eq!(camera.call_count(), 1);
}

#[test]
fn test_empty_cloud_reports_origin() {
    let service = ObstacleService::new(
        "obstacles",
        &deps_with("front", Arc::new(DummyPointCloudCamera::default())),
        &ObstacleServiceConfig::new(500.0, 100.0, "front"),
    )
    .unwrap();
    assert_eq!(obstacle_of(&service), Point3::origin());
}

#[test]
fn test_each_scan_starts_fresh() {
    let camera = Arc::new(DummyPointCloudCamera::new(cloud(&[[200.0, 0.0, 0.0]])));
    let deps = deps_with("front", camera);
    let service = ObstacleService::new(
        "obstacles",
        &deps,
        &ObstacleServiceConfig::new(500.0, 100.0, "front"),
    )
    .unwrap();
    assert_eq!(obstacle_of(&service), Point3::new(200.0, 0.0, 0.0));

    let empty = deps_with("empty", Arc::new(DummyPointCloudCamera::default()));
    service
        .reconfigure(&empty, &ObstacleServiceConfig::new(500.0, 100.0, "empty"))
        .unwrap();
    assert_eq!(obstacle_of(&service), Point3::origin());
}

#[test]
fn test_unimplemented_capabilities() {
    let camera = Arc::new(DummyPointCloudCamera::new(cloud(&[[200.0, 0.0, 0.0]])));
    let service = ObstacleService::new(
        "obstacles",
        &deps_with("front", camera.clone()),
        &ObstacleServiceConfig::new(500.0, 100.0, "front"),
    )
    .unwrap();
    let ctx = Context::new();
    let extra = Extra::new();
    let image = DynamicImage::new_rgb8(4, 4);

    assert!(matches!(
        service.detections_from_camera(&ctx, "front", &extra),
        Err(Error::Unimplemented(_))
    ));
    assert!(matches!(
        service.detections(&ctx, &image, &extra),
        Err(Error::Unimplemented(_))
    ));
    assert!(matches!(
        service.classifications_from_camera(&ctx, "front", 5, &extra),
        Err(Error::Unimplemented(_))
    ));
    assert!(matches!(
        service.classifications(&ctx, &image, 5, &extra),
        Err(Error::Unimplemented(_))
    ));
    assert!(matches!(
        service.do_command(&ctx, &extra),
        Err(Error::Unimplemented(_))
    ));
    assert!(matches!(service.close(&ctx), Err(Error::Unimplemented(_))));
    assert_eq!(camera.call_count(), 0);

    // still usable afterwards
    assert_eq!(obstacle_of(&service), Point3::new(200.0, 0.0, 0.0));
}

#[test]
fn test_acquisition_errors_are_returned_untouched() {
    let config = ObstacleServiceConfig::new(500.0, 100.0, "front");

    let service = ObstacleService::new(
        "obstacles",
        &deps_with(
            "front",
            Arc::new(FailingCamera(|| Error::Acquisition {
                camera: "front".into(),
                message: "device unplugged".into(),
            })),
        ),
        &config,
    )
    .unwrap();
    match service.object_point_clouds(&Context::new(), "front", &Extra::new()) {
        Err(Error::Acquisition { camera, message }) => {
            assert_eq!(camera, "front");
            assert_eq!(message, "device unplugged");
        }
        r => panic!("unexpected result {r:?}"),
    }

    let service = ObstacleService::new(
        "obstacles",
        &deps_with(
            "front",
            Arc::new(FailingCamera(|| Error::NoPointCloud("front".into()))),
        ),
        &config,
    )
    .unwrap();
    let err = service.scan(&Context::new()).unwrap_err();
    assert!(err.is_acquisition());
    assert!(matches!(err, Error::NoPointCloud(name) if name == "front"));
}

#[test]
fn test_canceled_context() {
    let camera = Arc::new(DummyPointCloudCamera::new(cloud(&[[200.0, 0.0, 0.0]])));
    let config = ObstacleServiceConfig::new(500.0, 100.0, "front");
    let service =
        ObstacleService::new("obstacles", &deps_with("front", camera.clone()), &config).unwrap();

    let ctx = Context::new();
    ctx.cancel();
    assert!(matches!(
        service.object_point_clouds(&ctx, "front", &Extra::new()),
        Err(Error::Canceled { .. })
    ));
    assert_eq!(camera.call_count(), 0);

    // canceled while the camera was reading
    let service =
        ObstacleService::new("obstacles", &deps_with("front", Arc::new(CancelingCamera)), &config)
            .unwrap();
    assert!(matches!(
        service.scan(&Context::new()),
        Err(Error::Canceled { .. })
    ));
}

#[test]
fn test_configuration_errors() {
    let deps = deps_with("front", Arc::new(DummyPointCloudCamera::default()));

    let err = ObstacleService::new(
        "obstacles",
        &deps,
        &ObstacleServiceConfig::new(500.0, 100.0, "rear"),
    )
    .unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, Error::NoResource(name) if name == "rear"));

    let err = ObstacleService::new(
        "obstacles",
        &deps,
        &ObstacleServiceConfig {
            zero_position_mm: None,
            ..ObstacleServiceConfig::new(500.0, 100.0, "front")
        },
    )
    .unwrap_err();
    match err {
        Error::MissingAttribute { attribute, path } => {
            assert_eq!(attribute, "zero_position_mm");
            assert_eq!(path, "obstacles");
        }
        e => panic!("unexpected error {e:?}"),
    }
}

#[test]
fn test_failed_reconfigure_keeps_previous_config() {
    let deps = deps_with(
        "front",
        Arc::new(DummyPointCloudCamera::new(cloud(&[[200.0, 0.0, 0.0]]))),
    );
    let service = ObstacleService::new(
        "obstacles",
        &deps,
        &ObstacleServiceConfig::new(500.0, 100.0, "front"),
    )
    .unwrap();

    // valid thresholds, unknown camera
    assert!(service
        .reconfigure(&deps, &ObstacleServiceConfig::new(1.0, 0.0, "rear"))
        .is_err());
    // known camera, invalid threshold
    assert!(service
        .reconfigure(
            &deps,
            &ObstacleServiceConfig::new(f64::INFINITY, 0.0, "front")
        )
        .is_err());

    let thresholds = service.thresholds();
    assert_eq!(thresholds.max_distance, 500.0);
    assert_eq!(thresholds.zero_position, 100.0);
    assert_eq!(service.camera_name(), "front");
    assert_eq!(obstacle_of(&service), Point3::new(200.0, 0.0, 0.0));
}

#[test]
fn test_reconfigure_during_scan_uses_one_snapshot() {
    // Under the old thresholds (50, 0, 0) is cut off by the zero position and
    // (200, 0, 0) wins. Under the new ones (50, 0, 0) would be the last obstacle.
    let blocking = Arc::new(BlockingCamera {
        point_cloud: cloud(&[[200.0, 0.0, 0.0], [50.0, 0.0, 0.0]]),
        entered: Barrier::new(2),
        release: Barrier::new(2),
    });
    let service = Arc::new(
        ObstacleService::new(
            "obstacles",
            &deps_with("front", blocking.clone()),
            &ObstacleServiceConfig::new(500.0, 100.0, "front"),
        )
        .unwrap(),
    );

    let scanning = {
        let service = service.clone();
        thread::spawn(move || service.scan(&Context::new()))
    };

    blocking.entered.wait();
    let next = deps_with(
        "rear",
        Arc::new(DummyPointCloudCamera::new(cloud(&[
            [200.0, 0.0, 0.0],
            [50.0, 0.0, 0.0],
        ]))),
    );
    service
        .reconfigure(&next, &ObstacleServiceConfig::new(1000.0, 0.0, "rear"))
        .unwrap();
    blocking.release.wait();

    let result = scanning.join().unwrap().unwrap();
    assert_eq!(result.obstacle, Some(Point3::new(200.0, 0.0, 0.0)));

    let result = service.scan(&Context::new()).unwrap();
    assert_eq!(result.obstacle, Some(Point3::new(50.0, 0.0, 0.0)));
}

#[test]
fn test_concurrent_scans_do_not_share_state() {
    let near = Arc::new(DummyPointCloudCamera::new(cloud(&[
        [50.0, 0.0, 0.0],
        [200.0, 0.0, 0.0],
        [600.0, 0.0, 0.0],
    ])));
    let service = Arc::new(
        ObstacleService::new(
            "obstacles",
            &deps_with("front", near.clone()),
            &ObstacleServiceConfig::new(500.0, 100.0, "front"),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let result = service.scan(&Context::new()).unwrap();
                    assert_eq!(result.obstacle, Some(Point3::new(200.0, 0.0, 0.0)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(near.call_count(), 400);
}

#[test]
fn test_from_resource_config() {
    let config: ResourceConfig = toml::from_str(
        r#"
name = "obstacle-vision-service"
model = "viamlabs:service:obstacle-detection"

[attributes]
max_distance_mm = 500.0
zero_position_mm = 100.0
camera = "rplidar"
"#,
    )
    .unwrap();
    let deps = deps_with(
        "rplidar",
        Arc::new(DummyPointCloudCamera::new(cloud(&[[300.0, 10.0, 0.0]]))),
    );
    let service = ObstacleService::from_resource_config(&deps, &config).unwrap();
    assert_eq!(service.name().name, "obstacle-vision-service");
    assert_eq!(obstacle_of(&service), Point3::new(300.0, 10.0, 0.0));

    let mut broken = config.clone();
    broken
        .attributes
        .insert("max_distance_mm".into(), toml::Value::String("far".into()));
    let err = ObstacleService::from_resource_config(&deps, &broken).unwrap_err();
    assert!(err.is_configuration());
}
