//! Parameter sets for the point cloud operations.
//!
//! Each set has a [Default] implementation with the values the operations are usually run with and a
//! `validate` method that performs the same checks the operation itself would perform. With the `serde`
//! feature enabled, all parameter sets can be read from and written to any serde format. Missing fields
//! take their default value.

use canopy_core::{
    layout::classification::{self, ClassificationSet},
    Error, Result,
};

/// Parameters for [remove_outliers](crate::outlier_filter::remove_outliers)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutlierParams {
    /// Search radius in the units of the point positions
    pub radius: f64,
    /// Minimum number of points within `radius` (the point itself included) for a point to be retained
    pub min_neighbors: usize,
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            min_neighbors: 3,
        }
    }
}

impl OutlierParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "outlier search radius must be a positive finite number, got {}",
                self.radius
            )));
        }
        if self.min_neighbors < 1 {
            return Err(Error::invalid_parameter(
                "minimum neighbor count must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Parameters for [remove_overlap](crate::overlap_filter::remove_overlap)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlapParams {
    /// Classification codes of the points that get removed
    pub overlap_codes: ClassificationSet,
}

impl Default for OverlapParams {
    fn default() -> Self {
        Self {
            overlap_codes: ClassificationSet::overlap(),
        }
    }
}

impl OverlapParams {
    /// Every code set is valid. An empty set removes nothing
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Parameters for [reclassify_vegetation](crate::vegetation::reclassify_vegetation)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VegetationParams {
    /// Classification of the points that make up the ground
    pub ground_code: u8,
    /// Classification of the points that get reclassified
    pub target_code: u8,
    /// Points lower than this above the ground become low vegetation
    pub low_threshold: f64,
    /// Points higher than this above the ground become high vegetation
    pub high_threshold: f64,
    pub low_code: u8,
    pub medium_code: u8,
    pub high_code: u8,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            ground_code: classification::GROUND,
            target_code: classification::HIGH_VEGETATION,
            low_threshold: 2.0,
            high_threshold: 10.0,
            low_code: classification::LOW_VEGETATION,
            medium_code: classification::MEDIUM_VEGETATION,
            high_code: classification::HIGH_VEGETATION,
        }
    }
}

impl VegetationParams {
    pub fn validate(&self) -> Result<()> {
        if !self.low_threshold.is_finite() || !self.high_threshold.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "height thresholds must be finite, got {} and {}",
                self.low_threshold, self.high_threshold
            )));
        }
        if self.low_threshold > self.high_threshold {
            return Err(Error::InvalidParameter(format!(
                "low height threshold {} is larger than high height threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

/// Parameters for [cluster_structures](crate::clustering::cluster_structures)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterParams {
    /// Classification of the points that get clustered
    pub building_code: u8,
    /// Neighborhood radius in the XY plane
    pub eps: f64,
    /// Minimum number of points within `eps` (the point itself included) for a core point
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            building_code: classification::BUILDING,
            eps: 5.0,
            min_samples: 5,
        }
    }
}

impl ClusterParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.eps > 0.0 && self.eps.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "clustering radius must be a positive finite number, got {}",
                self.eps
            )));
        }
        if self.min_samples < 1 {
            return Err(Error::invalid_parameter(
                "minimum sample count must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(OutlierParams::default().validate().is_ok());
        assert!(OverlapParams::default().validate().is_ok());
        assert!(VegetationParams::default().validate().is_ok());
        assert!(ClusterParams::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_default_excludes_bridge_deck() {
        let params = OverlapParams::default();
        assert!(params.overlap_codes.contains(classification::OVERLAP));
        assert!(!params.overlap_codes.contains(classification::BRIDGE_DECK));
    }

    #[test]
    fn test_invalid_params() {
        let outlier = OutlierParams {
            radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(outlier.validate(), Err(Error::InvalidParameter(_))));
        let outlier = OutlierParams {
            min_neighbors: 0,
            ..Default::default()
        };
        assert!(matches!(outlier.validate(), Err(Error::InvalidParameter(_))));

        let vegetation = VegetationParams {
            low_threshold: 12.0,
            ..Default::default()
        };
        assert!(matches!(
            vegetation.validate(),
            Err(Error::InvalidParameter(_))
        ));
        let vegetation = VegetationParams {
            high_threshold: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            vegetation.validate(),
            Err(Error::InvalidParameter(_))
        ));

        let cluster = ClusterParams {
            eps: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(cluster.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_equal_thresholds_are_valid() {
        let vegetation = VegetationParams {
            low_threshold: 5.0,
            high_threshold: 5.0,
            ..Default::default()
        };
        assert!(vegetation.validate().is_ok());
    }
}
