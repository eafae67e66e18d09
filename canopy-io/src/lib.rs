#![warn(clippy::all)]
//! Reading and writing point clouds.
//!
//! Canopy only works on fully materialized [PointCloud](canopy_core::containers::PointCloud)s, so readers
//! always read the whole source and writers always write a whole point cloud. The only supported format is
//! delimited ASCII text with a LAStools-style format string, see [ascii].

/// Delimited ASCII text files
pub mod ascii;
/// Common reader and writer traits
pub mod base;
