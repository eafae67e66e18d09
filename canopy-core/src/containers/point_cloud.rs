use std::ops::Index;

use nalgebra::Vector3;

use crate::{
    layout::PointRecord,
    math::AABB,
    meta::CloudHeader,
    Error, Result,
};

/// An ordered, fully materialized sequence of [PointRecord]s together with its [CloudHeader].
///
/// The position of a point within the sequence is its identity for the duration of an operation. A `PointCloud`
/// can only be constructed from a set of points, and the header is computed during construction. There is no
/// way to change positions or the number of points of an existing `PointCloud`: filters produce a new one with
/// a freshly computed header. The only in-place mutation is [reclassify](PointCloud::reclassify), which touches
/// classification codes only and therefore keeps the header valid.
///
/// ```
/// # use canopy_core::containers::PointCloud;
/// # use canopy_core::layout::PointRecord;
/// # use canopy_core::nalgebra::Vector3;
/// let cloud: PointCloud = vec![
///     PointRecord::new(Vector3::new(0.0, 0.0, 0.0), 2),
///     PointRecord::new(Vector3::new(4.0, 2.0, 1.0), 5),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud.header().bounds().unwrap().extent(), Vector3::new(4.0, 2.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointCloud {
    points: Vec<PointRecord>,
    header: CloudHeader,
}

impl PointCloud {
    /// Creates a new `PointCloud` from the given points, computing its header
    pub fn from_points(points: Vec<PointRecord>) -> Self {
        let bounds = if points.is_empty() {
            None
        } else {
            Some(points.iter().map(|point| point.position).collect::<AABB<f64>>())
        };
        let header = CloudHeader::new(points.len(), bounds);
        Self { points, header }
    }

    pub fn header(&self) -> &CloudHeader {
        &self.header
    }

    /// Bounding box of all points. Fails with `EmptyInput` for an empty point cloud
    pub fn bounds(&self) -> Result<AABB<f64>> {
        self.header.bounds().ok_or(Error::EmptyInput)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PointRecord> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRecord> {
        self.points.iter()
    }

    /// Positions of all points, in point order
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vector3<f64>> + '_ {
        self.points.iter().map(|point| point.position)
    }

    /// True if the point cloud is non-empty and every point carries a GPS time
    pub fn has_gps_time(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|point| point.gps_time.is_some())
    }

    /// Indices of all points with the given classification code, in ascending order
    pub fn indices_with_classification(&self, classification: u8) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.classification == classification)
            .map(|(index, _)| index)
            .collect()
    }

    /// Creates a new `PointCloud` from the points at `indices`, in the order of `indices`
    ///
    /// # Panics
    ///
    /// If any index is out of bounds
    pub fn select(&self, indices: &[usize]) -> PointCloud {
        Self::from_points(indices.iter().map(|index| self.points[*index]).collect())
    }

    /// Creates a new `PointCloud` that contains every point for which `mask` is `true`. Relative point order
    /// is preserved and the header is recomputed from the retained points only
    ///
    /// # Panics
    ///
    /// If `mask.len()` does not equal the number of points
    pub fn retain_by_mask(&self, mask: &[bool]) -> PointCloud {
        assert_eq!(
            mask.len(),
            self.points.len(),
            "Retain mask must contain exactly one entry per point"
        );
        Self::from_points(
            self.points
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(point, _)| *point)
                .collect(),
        )
    }

    /// Sets new classification codes for a set of points. All indices are checked before anything is
    /// written, so on error the point cloud is left unchanged. Positions, point count and header are never
    /// affected
    pub fn reclassify(&mut self, assignments: &[(usize, u8)]) -> Result<()> {
        if let Some((index, _)) = assignments
            .iter()
            .find(|(index, _)| *index >= self.points.len())
        {
            return Err(Error::InvalidParameter(format!(
                "point index {} is out of bounds for a point cloud with {} points",
                index,
                self.points.len()
            )));
        }
        for (index, classification) in assignments {
            self.points[*index].classification = *classification;
        }
        Ok(())
    }
}

impl FromIterator<PointRecord> for PointCloud {
    fn from_iter<I: IntoIterator<Item = PointRecord>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

impl From<Vec<PointRecord>> for PointCloud {
    fn from(points: Vec<PointRecord>) -> Self {
        Self::from_points(points)
    }
}

impl Index<usize> for PointCloud {
    type Output = PointRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a PointRecord;
    type IntoIter = std::slice::Iter<'a, PointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
