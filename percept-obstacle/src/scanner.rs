use percept_api::{Error, Geometry, Object, Point3, PointCloud};

/// Label of the geometry attached to the scan result.
pub const OBSTACLE_LABEL: &str = "obstacle";

/// Distance limits used to decide whether a point is an obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Points at or beyond this distance are clear.
    pub max_distance: f64,
    /// Points whose x is below this position are clear.
    pub zero_position: f64,
}

impl Thresholds {
    /// Both values must be finite.
    pub fn new(max_distance: f64, zero_position: f64) -> Result<Self, Error> {
        for (attribute, value) in [
            ("max_distance", max_distance),
            ("zero_position", zero_position),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidAttribute {
                    attribute: attribute.to_owned(),
                    path: String::new(),
                    message: format!("{value} is not a finite number"),
                });
            }
        }
        Ok(Self {
            max_distance,
            zero_position,
        })
    }
}

/// Distance of `p` from the sensor as used by the near test.
///
/// Note that this is `sqrt(x² + y² + x²)`: x is counted twice and z is not
/// used at all. Detection results depend on this exact formula.
pub fn obstacle_distance(p: &Point3<f64>) -> f64 {
    (p.x.powi(2) + p.y.powi(2) + p.x.powi(2)).sqrt()
}

/// Outcome of [`ObstacleScanner::classify`] for a single point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointClass {
    /// Behind the zero position, or not near enough.
    Clear,
    /// At or past the zero position and closer than the max distance.
    Obstacle,
}

/// Result of one pass over a point cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanResult {
    /// Last point of the pass that was classified as an obstacle.
    pub obstacle: Option<Point3<f64>>,
    /// Number of points visited.
    pub visited: usize,
}

impl ScanResult {
    /// The reported obstacle position; the origin if nothing qualified.
    pub fn obstacle_point(&self) -> Point3<f64> {
        self.obstacle.unwrap_or_else(Point3::origin)
    }

    /// Wraps the obstacle position in a one-point cloud with a point geometry
    /// labeled [`OBSTACLE_LABEL`].
    pub fn to_object(&self) -> Object {
        let point = self.obstacle_point();
        let mut point_cloud = PointCloud::with_capacity(1);
        point_cloud.set(point, None);
        let mut object = Object::new(point_cloud);
        object.geometry = Some(Geometry::point(point, OBSTACLE_LABEL));
        object
    }
}

/// Classifies points against a fixed [`Thresholds`] pair.
///
/// A scanner holds no state between scans; every call to
/// [`ObstacleScanner::scan`] starts from "no obstacle".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleScanner {
    thresholds: Thresholds,
}

impl ObstacleScanner {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Applies the zero position check first, then the distance check.
    pub fn classify(&self, p: &Point3<f64>) -> PointClass {
        // Points below the zero position are never obstacles, however close.
        if p.x < self.thresholds.zero_position {
            return PointClass::Clear;
        }
        if obstacle_distance(p) < self.thresholds.max_distance {
            PointClass::Obstacle
        } else {
            PointClass::Clear
        }
    }

    /// Visits every point of `cloud` in iteration order and keeps the last
    /// obstacle. Auxiliary point data is ignored.
    pub fn scan(&self, cloud: &PointCloud) -> ScanResult {
        let (obstacle, visited) =
            cloud
                .iter()
                .fold((None, 0), |(obstacle, visited), (p, _data)| {
                    match self.classify(p) {
                        PointClass::Obstacle => (Some(*p), visited + 1),
                        PointClass::Clear => (obstacle, visited + 1),
                    }
                });
        ScanResult { obstacle, visited }
    }
}
