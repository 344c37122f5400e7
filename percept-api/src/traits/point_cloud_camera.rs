use auto_impl::auto_impl;

use crate::{context::Context, error::Result, point_cloud::PointCloud};

/// A range-sensing camera that produces point cloud snapshots.
#[auto_impl(Box, Arc)]
pub trait PointCloudCamera: Send + Sync {
    /// Returns the next snapshot.
    ///
    /// Implementations should return [`Error::NoPointCloud`](crate::Error::NoPointCloud)
    /// when the device has no data, and should stop waiting once `ctx` is cancelled.
    fn next_point_cloud(&self, ctx: &Context) -> Result<PointCloud>;
}
