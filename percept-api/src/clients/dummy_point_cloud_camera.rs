use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{context::Context, error::Error, point_cloud::PointCloud, traits::PointCloudCamera};

/// Dummy PointCloudCamera for debug or tests.
///
/// Returns a copy of `point_cloud` on every call.
#[derive(Debug, Default)]
pub struct DummyPointCloudCamera {
    pub point_cloud: PointCloud,
    calls: AtomicUsize,
}

impl DummyPointCloudCamera {
    pub fn new(point_cloud: PointCloud) -> Self {
        Self {
            point_cloud,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of snapshots handed out so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PointCloudCamera for DummyPointCloudCamera {
    fn next_point_cloud(&self, ctx: &Context) -> Result<PointCloud, Error> {
        ctx.check()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.point_cloud.clone())
    }
}
