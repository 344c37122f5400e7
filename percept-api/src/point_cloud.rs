use indexmap::{map, IndexMap};
use nalgebra::Point3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

/// Auxiliary per-point data, such as the color reported by an RGB-D camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PointData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl PointData {
    pub fn with_color(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: Some([r, g, b]),
            value: None,
        }
    }

    pub fn with_value(value: f64) -> Self {
        Self {
            color: None,
            value: Some(value),
        }
    }
}

// Positions are compared bitwise, with -0.0 folded into 0.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PointKey([u64; 3]);

impl PointKey {
    fn new(point: &Point3<f64>) -> Self {
        fn bits(v: f64) -> u64 {
            if v == 0.0 {
                0.0f64.to_bits()
            } else {
                v.to_bits()
            }
        }
        Self([bits(point.x), bits(point.y), bits(point.z)])
    }
}

/// A set of 3D points keyed by position, each with optional [`PointData`].
///
/// Iteration follows first-insertion order. Setting a point that is already
/// present replaces its data but keeps its position in the iteration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    points: IndexMap<PointKey, (Point3<f64>, Option<PointData>)>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inserts `point`, or replaces the data of an identical point.
    ///
    /// Returns `true` if the point was not present before.
    pub fn set(&mut self, point: Point3<f64>, data: Option<PointData>) -> bool {
        self.points
            .insert(PointKey::new(&point), (point, data))
            .is_none()
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.points.contains_key(&PointKey::new(point))
    }

    /// Returns the data stored for `point`, or `None` if the point is absent.
    pub fn get(&self, point: &Point3<f64>) -> Option<Option<&PointData>> {
        self.points
            .get(&PointKey::new(point))
            .map(|(_, data)| data.as_ref())
    }

    /// Visits every `(point, data)` pair in insertion order.
    ///
    /// Each call starts a fresh pass over the cloud.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.points.values())
    }

    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.iter().map(|(p, _)| p)
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty cloud.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut points = self.points();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point3::from(min.coords.inf(&p.coords)),
                Point3::from(max.coords.sup(&p.coords)),
            )
        }))
    }
}

#[derive(Debug, Clone)]
pub struct Iter<'a>(map::Values<'a, PointKey, (Point3<f64>, Option<PointData>)>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Point3<f64>, Option<&'a PointData>);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(p, data)| (p, data.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = (&'a Point3<f64>, Option<&'a PointData>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<(Point3<f64>, Option<PointData>)> for PointCloud {
    fn extend<I: IntoIterator<Item = (Point3<f64>, Option<PointData>)>>(&mut self, iter: I) {
        for (point, data) in iter {
            self.set(point, data);
        }
    }
}

impl FromIterator<(Point3<f64>, Option<PointData>)> for PointCloud {
    fn from_iter<I: IntoIterator<Item = (Point3<f64>, Option<PointData>)>>(iter: I) -> Self {
        let mut cloud = PointCloud::new();
        cloud.extend(iter);
        cloud
    }
}

impl FromIterator<Point3<f64>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        iter.into_iter().map(|p| (p, None)).collect()
    }
}

impl Serialize for PointCloud {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Entry<'a> {
            point: &'a Point3<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            data: Option<&'a PointData>,
        }
        serializer.collect_seq(self.iter().map(|(point, data)| Entry { point, data }))
    }
}
