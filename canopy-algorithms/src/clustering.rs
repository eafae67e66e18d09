use std::collections::VecDeque;

use canopy_core::{
    containers::PointCloud,
    nalgebra::{Vector2, Vector3},
    util::CancellationToken,
    Error, Result,
};
use rayon::prelude::*;

use crate::{
    params::ClusterParams,
    spatial_index::{Dimensions, SpatialIndex},
};

/// Cluster membership of a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusterLabel {
    /// The point is neither a core point nor within reach of one
    Noise,
    /// The point belongs to the cluster with the given id
    Cluster(usize),
}

impl ClusterLabel {
    pub fn cluster_id(&self) -> Option<usize> {
        match self {
            ClusterLabel::Noise => None,
            ClusterLabel::Cluster(id) => Some(*id),
        }
    }

    pub fn is_noise(&self) -> bool {
        *self == ClusterLabel::Noise
    }
}

/// Result of [cluster]: one label per input point and the number of clusters. Cluster ids are `0..cluster_count`
/// and are assigned in the order in which the clusters were discovered
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clustering {
    labels: Vec<ClusterLabel>,
    cluster_count: usize,
}

impl Clustering {
    /// Labels in the order of the clustered points
    pub fn labels(&self) -> &[ClusterLabel] {
        &self.labels
    }

    /// Number of clusters. Noise is never counted as a cluster
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|label| label.is_noise()).count()
    }

    /// Number of points in each cluster, indexed by cluster id
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.cluster_count];
        for id in self.labels.iter().filter_map(ClusterLabel::cluster_id) {
            sizes[id] += 1;
        }
        sizes
    }

    /// Point count, centroid and bounds of every cluster, in cluster id order. `points` must be the points
    /// that were clustered
    ///
    /// # Panics
    ///
    /// If `points` has a different length than the clustered point set
    pub fn summaries(&self, points: &[Vector2<f64>]) -> Vec<ClusterSummary> {
        assert_eq!(
            points.len(),
            self.labels.len(),
            "Summaries must be computed from the clustered points"
        );
        let mut summaries = (0..self.cluster_count)
            .map(|id| ClusterSummary {
                id,
                point_count: 0,
                centroid: Vector2::zeros(),
                min: Vector2::repeat(f64::MAX),
                max: Vector2::repeat(f64::MIN),
            })
            .collect::<Vec<_>>();
        for (point, label) in points.iter().zip(&self.labels) {
            if let ClusterLabel::Cluster(id) = label {
                let summary = &mut summaries[*id];
                summary.point_count += 1;
                summary.centroid += point;
                summary.min = summary.min.inf(point);
                summary.max = summary.max.sup(point);
            }
        }
        for summary in &mut summaries {
            summary.centroid /= summary.point_count as f64;
        }
        summaries
    }
}

/// Size and extent of a single cluster in the XY plane
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterSummary {
    pub id: usize,
    pub point_count: usize,
    pub centroid: Vector2<f64>,
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

/// Density-based clustering (DBSCAN) of 2D points.
///
/// A point is a core point if at least `min_samples` points, the point itself included, lie within `eps` of it
/// (boundary inclusive). Core points within `eps` of each other belong to the same cluster. A non-core point
/// within `eps` of a core point is a border point and joins the cluster of the first core point that reaches
/// it, where clusters are grown from the core points in ascending index order. All other points are noise.
///
/// The number of clusters does not depend on the order of `points`. Only the assignment of border points that
/// are reachable from several clusters does.
///
/// # Errors
///
/// - `InvalidParameter` if `eps` is not a positive finite number or `min_samples` is zero
/// - `NoBuildingPoints` if `points` is empty
///
/// # Examples
///
/// ```
/// # use canopy_core::nalgebra::Vector2;
/// # use canopy_algorithms::clustering::{cluster, ClusterLabel};
/// let points = vec![
///     Vector2::new(0.0, 0.0),
///     Vector2::new(1.0, 0.0),
///     Vector2::new(0.0, 1.0),
///     Vector2::new(100.0, 100.0),
/// ];
/// let clustering = cluster(&points, 1.5, 3).unwrap();
/// assert_eq!(clustering.cluster_count(), 1);
/// assert_eq!(clustering.labels()[3], ClusterLabel::Noise);
/// ```
pub fn cluster(points: &[Vector2<f64>], eps: f64, min_samples: usize) -> Result<Clustering> {
    cluster_cancellable(points, eps, min_samples, &CancellationToken::new())
}

/// Like [cluster], but stops with `Error::Cancelled` as soon as `token` is cancelled
pub fn cluster_cancellable(
    points: &[Vector2<f64>],
    eps: f64,
    min_samples: usize,
    token: &CancellationToken,
) -> Result<Clustering> {
    ClusterParams {
        eps,
        min_samples,
        ..Default::default()
    }
    .validate()?;
    if points.is_empty() {
        return Err(Error::NoBuildingPoints);
    }

    let positions = points
        .iter()
        .map(|p| Vector3::new(p.x, p.y, 0.0))
        .collect::<Vec<_>>();
    let index = SpatialIndex::build(&positions, Dimensions::Planar)?;
    token.check()?;

    let is_core = positions
        .par_iter()
        .map(|position| -> Result<bool> {
            token.check()?;
            Ok(index.count_within_radius(position, eps)? >= min_samples)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut cluster_count = 0;
    let mut frontier = VecDeque::new();
    for seed in 0..points.len() {
        if labels[seed].is_some() || !is_core[seed] {
            continue;
        }
        let id = cluster_count;
        cluster_count += 1;
        labels[seed] = Some(id);
        frontier.push_back(seed);

        while let Some(current) = frontier.pop_front() {
            token.check()?;
            for neighbor in index.neighbors_within_radius(&positions[current], eps)? {
                if labels[neighbor].is_some() {
                    continue;
                }
                labels[neighbor] = Some(id);
                if is_core[neighbor] {
                    frontier.push_back(neighbor);
                }
            }
        }
    }

    Ok(Clustering {
        labels: labels
            .into_iter()
            .map(|label| label.map_or(ClusterLabel::Noise, ClusterLabel::Cluster))
            .collect(),
        cluster_count,
    })
}

/// Building points of a point cloud grouped into structures
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructureClusters {
    /// Indices of the clustered points within the source point cloud, in ascending order
    pub point_indices: Vec<usize>,
    /// One label per entry of `point_indices`
    pub clustering: Clustering,
    /// One summary per structure
    pub summaries: Vec<ClusterSummary>,
}

impl StructureClusters {
    /// Number of structures found
    pub fn structure_count(&self) -> usize {
        self.clustering.cluster_count()
    }
}

/// Counts the structures in `cloud` by clustering the XY positions of all points classified as
/// `building_code` with [cluster]. Fails with `NoBuildingPoints` if no point has that classification
///
/// ```
/// # use canopy_core::containers::PointCloud;
/// # use canopy_core::layout::{classification::*, PointRecord};
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::clustering::cluster_structures;
/// let mut points = vec![];
/// for i in 0..10 {
///     points.push(PointRecord::new(Vector3::new(i as f64, 0.0, 8.0), BUILDING));
///     points.push(PointRecord::new(Vector3::new(i as f64, 50.0, 8.0), BUILDING));
///     points.push(PointRecord::new(Vector3::new(i as f64, 25.0, 0.0), GROUND));
/// }
/// let cloud = PointCloud::from_points(points);
/// let structures = cluster_structures(&cloud, BUILDING, 2.0, 3).unwrap();
/// assert_eq!(structures.structure_count(), 2);
/// assert_eq!(structures.summaries[0].point_count, 10);
/// ```
pub fn cluster_structures(
    cloud: &PointCloud,
    building_code: u8,
    eps: f64,
    min_samples: usize,
) -> Result<StructureClusters> {
    cluster_structures_cancellable(
        cloud,
        building_code,
        eps,
        min_samples,
        &CancellationToken::new(),
    )
}

/// Like [cluster_structures], but stops with `Error::Cancelled` as soon as `token` is cancelled
pub fn cluster_structures_cancellable(
    cloud: &PointCloud,
    building_code: u8,
    eps: f64,
    min_samples: usize,
    token: &CancellationToken,
) -> Result<StructureClusters> {
    let point_indices = cloud.indices_with_classification(building_code);
    let points = point_indices
        .iter()
        .map(|index| cloud[*index].position.xy())
        .collect::<Vec<_>>();
    let clustering = cluster_cancellable(&points, eps, min_samples, token)?;
    let summaries = clustering.summaries(&points);
    Ok(StructureClusters {
        point_indices,
        clustering,
        summaries,
    })
}
