use canopy_core::{containers::PointCloud, util::CancellationToken, Error, Result};
use rayon::prelude::*;

use crate::{
    params::OutlierParams,
    spatial_index::{Dimensions, SpatialIndex},
};

/// Removes isolated points from `cloud`. A point is retained if at least `min_neighbors` points, the point
/// itself included, lie within `radius` of it in 3D (boundary inclusive). Neighbor counts always refer to the
/// input cloud, removing a point never changes the count of another point.
///
/// Returns the retained points in their original relative order, together with the number of removed points.
/// The bounds of the returned cloud are computed from the retained points only.
///
/// # Errors
///
/// - `InvalidParameter` if `radius` is not a positive finite number or `min_neighbors` is zero
/// - `EmptyInput` if `cloud` contains no points
/// - `NoPointsRemaining` if no point has enough neighbors
///
/// # Examples
///
/// ```
/// # use canopy_core::containers::PointCloud;
/// # use canopy_core::layout::PointRecord;
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::outlier_filter::remove_outliers;
/// let mut points = vec![];
/// for x in 0..5 {
///     for y in 0..5 {
///         points.push(PointRecord::new(Vector3::new(x as f64 * 0.5, y as f64 * 0.5, 0.0), 1));
///     }
/// }
/// // an isolated point far away from the grid
/// points.push(PointRecord::new(Vector3::new(50.0, 50.0, 0.0), 1));
/// let cloud = PointCloud::from_points(points);
///
/// let (retained, removed) = remove_outliers(&cloud, 1.0, 3).unwrap();
/// assert_eq!(removed, 1);
/// assert_eq!(retained.len(), 25);
/// assert_eq!(retained.bounds().unwrap().max().x, 2.0);
/// ```
pub fn remove_outliers(
    cloud: &PointCloud,
    radius: f64,
    min_neighbors: usize,
) -> Result<(PointCloud, usize)> {
    remove_outliers_cancellable(cloud, radius, min_neighbors, &CancellationToken::new())
}

/// Like [remove_outliers], but stops with `Error::Cancelled` as soon as `token` is cancelled
pub fn remove_outliers_cancellable(
    cloud: &PointCloud,
    radius: f64,
    min_neighbors: usize,
    token: &CancellationToken,
) -> Result<(PointCloud, usize)> {
    OutlierParams {
        radius,
        min_neighbors,
    }
    .validate()?;
    if cloud.is_empty() {
        return Err(Error::EmptyInput);
    }

    let index = SpatialIndex::from_cloud(cloud, Dimensions::Spatial)?;
    token.check()?;

    let retain_mask = cloud
        .points()
        .par_iter()
        .map(|point| -> Result<bool> {
            token.check()?;
            let neighbors = index.count_within_radius(&point.position, radius)?;
            Ok(neighbors >= min_neighbors)
        })
        .collect::<Result<Vec<_>>>()?;

    let removed = retain_mask.iter().filter(|keep| !**keep).count();
    if removed == cloud.len() {
        return Err(Error::NoPointsRemaining);
    }
    Ok((cloud.retain_by_mask(&retain_mask), removed))
}
