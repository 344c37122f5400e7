use std::path::{Path, PathBuf};

use pcd_rs::{DynReader, Field};
use percept_api::{Context, Error, Point3, PointCloud, PointCloudCamera};
use tracing::debug;

const MAX_PREALLOCATED_POINTS: u64 = 1 << 16;

/// Point cloud camera backed by a PCD file.
///
/// The file is read again on every call, so replacing it on disk changes what
/// the next scan sees. Only the `x`, `y` and `z` fields are used.
///
/// Unlike a static camera, a file without points is an error:
/// [`Error::NoPointCloud`] is returned instead of an empty cloud.
#[derive(Debug, Clone)]
pub struct PcdFileCamera {
    name: String,
    path: PathBuf,
}

impl PcdFileCamera {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquisition_error(&self, message: impl ToString) -> Error {
        Error::Acquisition {
            camera: self.name.clone(),
            message: message.to_string(),
        }
    }

    fn read(&self) -> Result<PointCloud, Error> {
        let reader = DynReader::open(&self.path)
            .map_err(|e| self.acquisition_error(format!("{}: {e}", self.path.display())))?;
        let meta = reader.meta();
        let axis = |name: &str| {
            meta.field_defs
                .iter()
                .position(|def| def.name == name)
                .ok_or_else(|| self.acquisition_error(format!("no {name:?} field in PCD header")))
        };
        let axes = [axis("x")?, axis("y")?, axis("z")?];
        // POINTS comes from the file header and is not trusted as an allocation size.
        let capacity = meta.num_points.min(MAX_PREALLOCATED_POINTS) as usize;
        let mut cloud = PointCloud::with_capacity(capacity);

        for record in reader {
            let record = record.map_err(|e| self.acquisition_error(e))?;
            let mut coords = [0.0; 3];
            for (coord, &index) in coords.iter_mut().zip(&axes) {
                *coord = record
                    .0
                    .get(index)
                    .and_then(first_scalar)
                    .ok_or_else(|| self.acquisition_error("malformed PCD record"))?;
            }
            cloud.set(Point3::from(coords), None);
        }
        Ok(cloud)
    }
}

fn first_scalar(field: &Field) -> Option<f64> {
    match field {
        Field::I8(v) => v.first().map(|&x| x.into()),
        Field::I16(v) => v.first().map(|&x| x.into()),
        Field::I32(v) => v.first().map(|&x| x.into()),
        Field::U8(v) => v.first().map(|&x| x.into()),
        Field::U16(v) => v.first().map(|&x| x.into()),
        Field::U32(v) => v.first().map(|&x| x.into()),
        Field::F32(v) => v.first().map(|&x| x.into()),
        Field::F64(v) => v.first().copied(),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

impl PointCloudCamera for PcdFileCamera {
    fn next_point_cloud(&self, ctx: &Context) -> Result<PointCloud, Error> {
        ctx.check()?;
        let cloud = self.read()?;
        if cloud.is_empty() {
            return Err(Error::NoPointCloud(self.name.clone()));
        }
        debug!(
            camera = %self.name,
            path = %self.path.display(),
            num_points = cloud.len(),
            "read PCD file"
        );
        Ok(cloud)
    }
}
