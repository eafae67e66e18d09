use anyhow::Result;
use canopy_core::containers::PointCloud;

/// Base trait for all types that support reading point data
pub trait PointReader {
    /// Reads all remaining points of this `PointReader` into a new `PointCloud`
    fn read(&mut self) -> Result<PointCloud>;
}
