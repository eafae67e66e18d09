use std::{collections::BTreeMap, fmt::Display};

use canopy_core::{
    containers::PointCloud,
    math::{minmax, AABB},
    util::gps_time_to_datetime,
    Error, Result,
};
use chrono::{DateTime, Utc};

/// Summary numbers describing a point cloud: extent, density and the distribution of its attributes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloudStatistics {
    pub point_count: usize,
    pub bounds: AABB<f64>,
    /// Area of the footprint of `bounds` in the XY plane
    pub area: f64,
    /// Points per unit of `area`. `None` if all points lie on a line or in a single spot
    pub density: Option<f64>,
    /// Number of points per classification code
    pub classification_counts: BTreeMap<u8, usize>,
    /// Number of points per return number
    pub return_counts: BTreeMap<u8, usize>,
    /// Smallest and largest intensity
    pub intensity_range: (u16, u16),
    /// Smallest and largest GPS time. `None` unless every point has a GPS time
    pub gps_time_range: Option<(f64, f64)>,
}

impl CloudStatistics {
    /// Computes the statistics of `cloud`. Fails with `EmptyInput` for an empty point cloud
    ///
    /// ```
    /// # use canopy_core::containers::PointCloud;
    /// # use canopy_core::layout::PointRecord;
    /// # use canopy_core::nalgebra::Vector3;
    /// # use canopy_algorithms::statistics::CloudStatistics;
    /// let cloud: PointCloud = vec![
    ///     PointRecord::new(Vector3::new(0.0, 0.0, 0.0), 2).with_intensity(10),
    ///     PointRecord::new(Vector3::new(4.0, 0.0, 1.0), 2).with_intensity(30),
    ///     PointRecord::new(Vector3::new(4.0, 2.0, 9.0), 6).with_intensity(20),
    /// ]
    /// .into();
    /// let statistics = CloudStatistics::compute(&cloud).unwrap();
    /// assert_eq!(statistics.area, 8.0);
    /// assert_eq!(statistics.density, Some(3.0 / 8.0));
    /// assert_eq!(statistics.classification_counts[&2], 2);
    /// assert_eq!(statistics.intensity_range, (10, 30));
    /// assert_eq!(statistics.gps_time_range, None);
    /// ```
    pub fn compute(cloud: &PointCloud) -> Result<Self> {
        let bounds = cloud.bounds()?;
        let area = bounds.planar_area();
        let density = if area > 0.0 {
            Some(cloud.len() as f64 / area)
        } else {
            None
        };

        let mut classification_counts = BTreeMap::new();
        let mut return_counts = BTreeMap::new();
        for point in cloud {
            *classification_counts.entry(point.classification).or_insert(0) += 1;
            *return_counts.entry(point.return_number).or_insert(0) += 1;
        }

        let intensity_range =
            minmax(cloud.iter().map(|point| point.intensity)).ok_or(Error::EmptyInput)?;
        let gps_time_range = if cloud.has_gps_time() {
            minmax(cloud.iter().filter_map(|point| point.gps_time))
        } else {
            None
        };

        Ok(Self {
            point_count: cloud.len(),
            bounds,
            area,
            density,
            classification_counts,
            return_counts,
            intensity_range,
            gps_time_range,
        })
    }

    /// First and last acquisition time as UTC timestamps. Fails with `MissingField` if the point cloud did not
    /// carry GPS time for every point
    pub fn gps_datetime_range(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let (first, last) = self.gps_time_range.ok_or(Error::MissingField("gps_time"))?;
        let convert = |gps_time: f64| {
            gps_time_to_datetime(gps_time).ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "GPS time {} can't be represented as a date",
                    gps_time
                ))
            })
        };
        Ok((convert(first)?, convert(last)?))
    }

    /// Number of points with the given classification code
    pub fn count_of_class(&self, classification: u8) -> usize {
        self.classification_counts
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }
}

impl Display for CloudStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Point cloud statistics")?;
        writeln!(f, "\tNumber of points: {}", self.point_count)?;
        let (min, max) = (self.bounds.min(), self.bounds.max());
        writeln!(f, "\tBounds min:       ({}, {}, {})", min.x, min.y, min.z)?;
        writeln!(f, "\tBounds max:       ({}, {}, {})", max.x, max.y, max.z)?;
        writeln!(f, "\tArea:             {:.3}", self.area)?;
        match self.density {
            Some(density) => writeln!(f, "\tDensity:          {:.3} points per unit²", density)?,
            None => writeln!(f, "\tDensity:          undefined")?,
        }
        writeln!(
            f,
            "\tIntensity:        {} - {}",
            self.intensity_range.0, self.intensity_range.1
        )?;
        match self.gps_time_range {
            Some((first, last)) => writeln!(f, "\tGPS time:         {} - {}", first, last)?,
            None => writeln!(f, "\tGPS time:         not present")?,
        }
        writeln!(f, "\tClassifications:")?;
        for (code, count) in &self.classification_counts {
            writeln!(f, "\t\t{:>3}: {}", code, count)?;
        }
        writeln!(f, "\tReturn numbers:")?;
        for (number, count) in &self.return_counts {
            writeln!(f, "\t\t{:>3}: {}", number, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::{layout::PointRecord, nalgebra::Vector3};

    fn point(x: f64, y: f64, z: f64, classification: u8) -> PointRecord {
        PointRecord::new(Vector3::new(x, y, z), classification)
    }

    #[test]
    fn test_empty_cloud() {
        assert_eq!(
            CloudStatistics::compute(&PointCloud::default()).err(),
            Some(Error::EmptyInput)
        );
    }

    #[test]
    fn test_histograms() {
        let cloud: PointCloud = vec![
            point(0.0, 0.0, 0.0, 2).with_return_number(1),
            point(1.0, 0.0, 0.0, 2).with_return_number(1),
            point(0.0, 1.0, 0.0, 5).with_return_number(2),
            point(1.0, 1.0, 0.0, 6).with_return_number(1),
        ]
        .into();
        let statistics = CloudStatistics::compute(&cloud).unwrap();
        assert_eq!(
            statistics.classification_counts,
            BTreeMap::from([(2, 2), (5, 1), (6, 1)])
        );
        assert_eq!(statistics.return_counts, BTreeMap::from([(1, 3), (2, 1)]));
        assert_eq!(statistics.count_of_class(2), 2);
        assert_eq!(statistics.count_of_class(9), 0);
    }

    #[test]
    fn test_degenerate_footprint_has_no_density() {
        let cloud: PointCloud = vec![point(0.0, 0.0, 0.0, 2), point(5.0, 0.0, 3.0, 2)].into();
        let statistics = CloudStatistics::compute(&cloud).unwrap();
        assert_eq!(statistics.area, 0.0);
        assert_eq!(statistics.density, None);
    }

    #[test]
    fn test_gps_time_range() {
        let cloud: PointCloud = vec![
            point(0.0, 0.0, 0.0, 2).with_gps_time(86_400.0),
            point(1.0, 1.0, 0.0, 2).with_gps_time(60.0),
        ]
        .into();
        let statistics = CloudStatistics::compute(&cloud).unwrap();
        assert_eq!(statistics.gps_time_range, Some((60.0, 86_400.0)));
        let (first, last) = statistics.gps_datetime_range().unwrap();
        assert_eq!(first.to_rfc3339(), "1980-01-06T00:01:00+00:00");
        assert_eq!(last.to_rfc3339(), "1980-01-07T00:00:00+00:00");
    }

    #[test]
    fn test_partial_gps_time_is_missing() {
        let cloud: PointCloud = vec![
            point(0.0, 0.0, 0.0, 2).with_gps_time(1.0),
            point(1.0, 1.0, 0.0, 2),
        ]
        .into();
        let statistics = CloudStatistics::compute(&cloud).unwrap();
        assert_eq!(statistics.gps_time_range, None);
        assert_eq!(
            statistics.gps_datetime_range().err(),
            Some(Error::MissingField("gps_time"))
        );
    }

    #[test]
    fn test_display_lists_classes() {
        let cloud: PointCloud = vec![point(0.0, 0.0, 0.0, 2), point(1.0, 1.0, 1.0, 6)].into();
        let text = CloudStatistics::compute(&cloud).unwrap().to_string();
        assert!(text.contains("Number of points: 2"));
        assert!(text.contains("  6: 1"));
        assert!(text.contains("not present"));
    }
}
