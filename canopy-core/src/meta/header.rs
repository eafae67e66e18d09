use std::fmt::Display;

use crate::math::AABB;

/// Header information of a [PointCloud](crate::containers::PointCloud). The header is never stored
/// independently of the points, it is recomputed every time a point cloud is constructed, so its bounds
/// always match the contained points exactly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloudHeader {
    point_count: usize,
    bounds: Option<AABB<f64>>,
}

impl CloudHeader {
    pub(crate) fn new(point_count: usize, bounds: Option<AABB<f64>>) -> Self {
        Self {
            point_count,
            bounds,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Bounding box of all points, `None` for an empty point cloud
    pub fn bounds(&self) -> Option<AABB<f64>> {
        self.bounds
    }
}

impl Display for CloudHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Point cloud header")?;
        writeln!(f, "\tNumber of points: {}", self.point_count)?;
        match &self.bounds {
            Some(bounds) => {
                writeln!(
                    f,
                    "\tBounds min:       ({}, {}, {})",
                    bounds.min().x,
                    bounds.min().y,
                    bounds.min().z
                )?;
                writeln!(
                    f,
                    "\tBounds max:       ({}, {}, {})",
                    bounds.max().x,
                    bounds.max().y,
                    bounds.max().z
                )?;
            }
            None => writeln!(f, "\tBounds:           none")?,
        }
        Ok(())
    }
}
