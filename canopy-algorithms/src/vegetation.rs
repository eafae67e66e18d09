use canopy_core::{containers::PointCloud, util::CancellationToken, Error, Result};

use crate::{ground_height::GroundHeightNormalizer, params::VegetationParams};

/// Number of points that [reclassify_vegetation] assigned to each height class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReclassificationSummary {
    /// Number of ground points used as height reference
    pub ground_points: usize,
    /// Number of points that had the target classification, equals `low + medium + high`
    pub target_points: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Reclassifies the vegetation points of `cloud` by their height above the ground.
///
/// Points classified as `params.ground_code` make up the ground, points classified as `params.target_code`
/// get reclassified. For every target point, the height above the nearest ground point in the XY plane is
/// computed (see [GroundHeightNormalizer]) and the point becomes
///
/// - `low_code` if `height < low_threshold`
/// - `medium_code` if `low_threshold <= height <= high_threshold`
/// - `high_code` if `height > high_threshold`
///
/// All heights are computed before the first classification is written. Only the classification of target
/// points changes, the point count, positions and bounds stay the same. On error, `cloud` is unchanged.
///
/// # Errors
///
/// - `InvalidParameter` if a threshold is not finite or `low_threshold > high_threshold`
/// - `NoTargetPoints` if no point has the target classification
/// - `NoGroundPoints` if no point has the ground classification
///
/// # Examples
///
/// ```
/// # use canopy_core::containers::PointCloud;
/// # use canopy_core::layout::PointRecord;
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::{params::VegetationParams, vegetation::reclassify_vegetation};
/// let mut cloud: PointCloud = vec![
///     PointRecord::new(Vector3::new(0.0, 0.0, 0.0), 2),
///     PointRecord::new(Vector3::new(0.0, 1.0, 1.0), 5),
///     PointRecord::new(Vector3::new(1.0, 0.0, 5.0), 5),
///     PointRecord::new(Vector3::new(1.0, 1.0, 20.0), 5),
/// ]
/// .into();
/// let summary = reclassify_vegetation(&mut cloud, &VegetationParams::default()).unwrap();
/// assert_eq!((summary.low, summary.medium, summary.high), (1, 1, 1));
/// let codes: Vec<u8> = cloud.iter().map(|p| p.classification).collect();
/// assert_eq!(codes, vec![2, 3, 4, 5]);
/// ```
pub fn reclassify_vegetation(
    cloud: &mut PointCloud,
    params: &VegetationParams,
) -> Result<ReclassificationSummary> {
    reclassify_vegetation_cancellable(cloud, params, &CancellationToken::new())
}

/// Like [reclassify_vegetation], but stops with `Error::Cancelled` as soon as `token` is cancelled. A
/// cancelled reclassification leaves `cloud` unchanged
pub fn reclassify_vegetation_cancellable(
    cloud: &mut PointCloud,
    params: &VegetationParams,
    token: &CancellationToken,
) -> Result<ReclassificationSummary> {
    params.validate()?;

    let targets = cloud.indices_with_classification(params.target_code);
    if targets.is_empty() {
        return Err(Error::NoTargetPoints);
    }
    let ground = cloud
        .iter()
        .filter(|point| point.classification == params.ground_code)
        .map(|point| point.position)
        .collect::<Vec<_>>();

    let normalizer = GroundHeightNormalizer::new(&ground)?;
    let target_positions = targets
        .iter()
        .map(|index| cloud[*index].position)
        .collect::<Vec<_>>();
    let heights = normalizer.normalize_cancellable(&target_positions, token)?;

    let mut summary = ReclassificationSummary {
        ground_points: normalizer.ground_point_count(),
        target_points: targets.len(),
        ..Default::default()
    };
    let assignments = targets
        .iter()
        .zip(&heights)
        .map(|(index, height)| {
            let code = if *height < params.low_threshold {
                summary.low += 1;
                params.low_code
            } else if *height > params.high_threshold {
                summary.high += 1;
                params.high_code
            } else {
                summary.medium += 1;
                params.medium_code
            };
            (*index, code)
        })
        .collect::<Vec<_>>();

    token.check()?;
    cloud.reclassify(&assignments)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::{
        layout::{classification::*, PointRecord},
        nalgebra::Vector3,
    };

    fn cloud_with_targets(target_heights: &[f64]) -> PointCloud {
        let mut points = vec![];
        for x in 0..4 {
            for y in 0..4 {
                points.push(PointRecord::new(
                    Vector3::new(x as f64, y as f64, 0.0),
                    GROUND,
                ));
            }
        }
        for (i, z) in target_heights.iter().enumerate() {
            points.push(PointRecord::new(
                Vector3::new(i as f64 * 0.5, 1.5, *z),
                HIGH_VEGETATION,
            ));
        }
        points.into()
    }

    fn codes(cloud: &PointCloud) -> Vec<u8> {
        cloud.iter().map(|p| p.classification).collect()
    }

    #[test]
    fn test_threshold_boundaries_are_medium() {
        let mut cloud = cloud_with_targets(&[1.999, 2.0, 6.0, 10.0, 10.001]);
        let summary = reclassify_vegetation(&mut cloud, &VegetationParams::default()).unwrap();
        assert_eq!(
            codes(&cloud)[16..],
            [
                LOW_VEGETATION,
                MEDIUM_VEGETATION,
                MEDIUM_VEGETATION,
                MEDIUM_VEGETATION,
                HIGH_VEGETATION
            ]
        );
        assert_eq!(
            summary,
            ReclassificationSummary {
                ground_points: 16,
                target_points: 5,
                low: 1,
                medium: 3,
                high: 1,
            }
        );
    }

    #[test]
    fn test_only_classification_of_targets_changes() {
        let mut cloud = cloud_with_targets(&[0.5, 4.0, 25.0]);
        cloud.reclassify(&[(0, BUILDING)]).unwrap();
        let before = cloud.clone();
        reclassify_vegetation(&mut cloud, &VegetationParams::default()).unwrap();

        assert_eq!(cloud.len(), before.len());
        assert_eq!(cloud.header(), before.header());
        for (after, before) in cloud.iter().zip(before.iter()) {
            assert_eq!(after.position, before.position);
            if before.classification != HIGH_VEGETATION {
                assert_eq!(after.classification, before.classification);
            }
        }
    }

    #[test]
    fn test_no_target_points() {
        let mut cloud = cloud_with_targets(&[]);
        assert_eq!(
            reclassify_vegetation(&mut cloud, &VegetationParams::default()).err(),
            Some(Error::NoTargetPoints)
        );
    }

    #[test]
    fn test_no_ground_points_leaves_cloud_unchanged() {
        let mut cloud: PointCloud = vec![
            PointRecord::new(Vector3::new(0.0, 0.0, 3.0), HIGH_VEGETATION),
            PointRecord::new(Vector3::new(1.0, 0.0, 3.0), BUILDING),
        ]
        .into();
        let before = cloud.clone();
        assert_eq!(
            reclassify_vegetation(&mut cloud, &VegetationParams::default()).err(),
            Some(Error::NoGroundPoints)
        );
        assert_eq!(cloud, before);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut cloud = cloud_with_targets(&[1.0]);
        let params = VegetationParams {
            low_threshold: 10.0,
            high_threshold: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            reclassify_vegetation(&mut cloud, &params),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_custom_codes() {
        let mut cloud: PointCloud = vec![
            PointRecord::new(Vector3::new(0.0, 0.0, 0.0), UNCLASSIFIED),
            PointRecord::new(Vector3::new(0.0, 0.0, 1.0), LOW_POINT),
            PointRecord::new(Vector3::new(0.0, 0.0, 3.0), LOW_POINT),
        ]
        .into();
        let params = VegetationParams {
            ground_code: UNCLASSIFIED,
            target_code: LOW_POINT,
            low_threshold: 2.0,
            high_threshold: 2.0,
            low_code: 20,
            medium_code: 21,
            high_code: 22,
        };
        reclassify_vegetation(&mut cloud, &params).unwrap();
        assert_eq!(codes(&cloud), vec![UNCLASSIFIED, 20, 22]);
    }

    #[test]
    fn test_cancelled_leaves_cloud_unchanged() {
        let mut cloud = cloud_with_targets(&[1.0, 5.0, 12.0]);
        let before = cloud.clone();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            reclassify_vegetation_cancellable(&mut cloud, &VegetationParams::default(), &token)
                .err(),
            Some(Error::Cancelled)
        );
        assert_eq!(cloud, before);
    }
}
