use nalgebra::{Point3, Vector3};
use serde::Serialize;

use crate::point_cloud::PointCloud;

/// A labeled shape in the camera frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        center: Point3<f64>,
        label: String,
    },
    /// Axis-aligned box. `dims` holds the full edge lengths.
    Box {
        center: Point3<f64>,
        dims: Vector3<f64>,
        label: String,
    },
}

impl Geometry {
    pub fn point(center: Point3<f64>, label: impl Into<String>) -> Self {
        Geometry::Point {
            center,
            label: label.into(),
        }
    }

    pub fn center(&self) -> &Point3<f64> {
        match self {
            Geometry::Point { center, .. } | Geometry::Box { center, .. } => center,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Geometry::Point { label, .. } | Geometry::Box { label, .. } => label,
        }
    }
}

/// A segmented object: the points that belong to it and a shape describing it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Object {
    pub point_cloud: PointCloud,
    pub geometry: Option<Geometry>,
}

impl Object {
    /// Wraps `point_cloud`, describing it by its bounding box.
    ///
    /// An empty cloud has no geometry.
    pub fn new(point_cloud: PointCloud) -> Self {
        let geometry = point_cloud.bounds().map(|(min, max)| Geometry::Box {
            center: nalgebra::center(&min, &max),
            dims: max - min,
            label: String::new(),
        });
        Self {
            point_cloud,
            geometry,
        }
    }
}
