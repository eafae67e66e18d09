#![warn(clippy::all)]

//! Core data structures for working with LiDAR point cloud data
//!
//! Canopy keeps a point cloud fully materialized in memory as a [PointCloud](crate::containers::PointCloud), an
//! ordered sequence of strongly-typed [PointRecord](crate::layout::PointRecord)s together with a header that is
//! always derived from the points themselves. The analysis algorithms live in `canopy-algorithms`, file access
//! lives in `canopy-io`.

pub extern crate nalgebra;
extern crate self as canopy_core;

/// The in-memory point cloud container
pub mod containers;
/// Point record and ASPRS classification codes
pub mod layout;
/// Useful mathematical tools when working with point cloud data
pub mod math;
/// Data structures for handling point cloud metadata
pub mod meta;
/// Utilities
pub mod util;

mod error;
pub use self::error::*;

#[cfg(test)]
pub(crate) mod test_utils;
