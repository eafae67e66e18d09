use anyhow::Result;
use canopy_core::containers::PointCloud;

/// Base trait for all types that support writing point data
pub trait PointWriter {
    /// Write all points of the given `PointCloud` to the associated `PointWriter`
    fn write(&mut self, cloud: &PointCloud) -> Result<()>;
    /// Flush this `PointWriter`, ensuring that all points are written to their destination
    fn flush(&mut self) -> Result<()>;
}
