use canopy_core::{nalgebra::Vector3, util::CancellationToken, Error, Result};
use rayon::prelude::*;

use crate::spatial_index::{Dimensions, Neighbor, SpatialIndex};

/// Approximates the height of points above the ground by looking up the closest ground point in the XY plane.
///
/// No ground surface is interpolated: the height of a point is the difference between its Z coordinate and the
/// Z coordinate of the nearest ground point. If several ground points are equally close, the one that comes
/// first in the ground point sequence is used.
///
/// ```
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::ground_height::GroundHeightNormalizer;
/// let ground = vec![Vector3::new(0.0, 0.0, 100.0), Vector3::new(10.0, 0.0, 110.0)];
/// let normalizer = GroundHeightNormalizer::new(&ground).unwrap();
/// let height = normalizer.height_above_ground(&Vector3::new(9.0, 1.0, 115.0)).unwrap();
/// assert_eq!(height, 5.0);
/// ```
pub struct GroundHeightNormalizer {
    index: SpatialIndex,
    ground_heights: Vec<f64>,
}

impl GroundHeightNormalizer {
    /// Creates a new normalizer over the given ground positions. Fails with `NoGroundPoints` if `ground` is
    /// empty and with `InvalidParameter` if a ground position is not finite
    pub fn new(ground: &[Vector3<f64>]) -> Result<Self> {
        if ground.is_empty() {
            return Err(Error::NoGroundPoints);
        }
        if let Some(index) = ground.iter().position(|p| !p.z.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "ground point {} has a non-finite height",
                index
            )));
        }
        let index = SpatialIndex::build(ground, Dimensions::Planar)?;
        Ok(Self {
            index,
            ground_heights: ground.iter().map(|p| p.z).collect(),
        })
    }

    /// Number of ground points
    pub fn ground_point_count(&self) -> usize {
        self.ground_heights.len()
    }

    /// The ground point closest to `position` in the XY plane, referred to by its index in the ground sequence
    pub fn nearest_ground(&self, position: &Vector3<f64>) -> Result<Neighbor> {
        self.index.nearest(position)
    }

    /// Height of `position` above its nearest ground point. Negative for points below the ground
    pub fn height_above_ground(&self, position: &Vector3<f64>) -> Result<f64> {
        let nearest = self.index.nearest(position)?;
        Ok(position.z - self.ground_heights[nearest.index])
    }

    /// Heights above ground for all `targets`, in the order of `targets`. Lookups run in parallel
    pub fn normalize(&self, targets: &[Vector3<f64>]) -> Result<Vec<f64>> {
        self.normalize_cancellable(targets, &CancellationToken::new())
    }

    /// Like [normalize](GroundHeightNormalizer::normalize), but stops with `Error::Cancelled` as soon as
    /// `token` is cancelled
    pub fn normalize_cancellable(
        &self,
        targets: &[Vector3<f64>],
        token: &CancellationToken,
    ) -> Result<Vec<f64>> {
        token.check()?;
        targets
            .par_iter()
            .map(|target| -> Result<f64> {
                token.check()?;
                self.height_above_ground(target)
            })
            .collect()
    }
}

/// Computes `target.z - nearest_ground.z` for every target, where the nearest ground point is found in the XY
/// plane. Fails with `NoGroundPoints` if `ground` is empty. The result only depends on the inputs, so repeated
/// calls return identical heights
///
/// ```
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::ground_height::normalize_heights;
/// let ground = vec![Vector3::new(0.0, 0.0, 1.0)];
/// let targets = vec![Vector3::new(3.0, 4.0, 6.0), Vector3::new(-1.0, 0.0, 0.5)];
/// assert_eq!(normalize_heights(&ground, &targets).unwrap(), vec![5.0, -0.5]);
/// ```
pub fn normalize_heights(ground: &[Vector3<f64>], targets: &[Vector3<f64>]) -> Result<Vec<f64>> {
    GroundHeightNormalizer::new(ground)?.normalize(targets)
}
