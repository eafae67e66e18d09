#![warn(clippy::all)]
//! Algorithms that operate on point clouds.
//!
//! Every operation takes a fully materialized [PointCloud](canopy_core::containers::PointCloud) and either
//! produces a new one (the filters), changes classification codes in place (the vegetation reclassifier) or
//! computes a result from it (clustering and statistics). Per-point neighbor queries run in parallel over an
//! immutable [SpatialIndex](spatial_index::SpatialIndex). Long-running operations have a `_cancellable`
//! variant that takes a [CancellationToken](canopy_core::util::CancellationToken).

// Density-based clustering of building points, used to count structures.
pub mod clustering;
// Height of points above the closest ground point in the XY plane.
pub mod ground_height;
// Removal of isolated points by counting their neighbors within a radius.
pub mod outlier_filter;
// Removal of points by classification code.
pub mod overlap_filter;
// Parameter sets with defaults and validation for all operations.
pub mod params;
// Static kd-tree over 2D or 3D positions with exact radius and nearest-neighbor semantics.
pub mod spatial_index;
// Counts, histograms and ranges describing a point cloud.
pub mod statistics;
// Reclassification of vegetation points into low, medium and high vegetation.
pub mod vegetation;
