use canopy_core::{containers::PointCloud, layout::classification::ClassificationSet, Error, Result};

/// Removes every point whose classification is contained in `overlap_codes`. The usual choice for
/// `overlap_codes` is [ClassificationSet::overlap]. Retained points keep their relative order and the bounds
/// of the returned cloud are computed from them.
///
/// Returns the retained points together with the number of removed points. Fails with `EmptyInput` if
/// `cloud` is empty and with `NoPointsRemaining` if every point would be removed.
///
/// ```
/// # use canopy_core::containers::PointCloud;
/// # use canopy_core::layout::{PointRecord, classification::*};
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::overlap_filter::remove_overlap;
/// let cloud: PointCloud = [GROUND, OVERLAP, BUILDING, BRIDGE_DECK]
///     .iter()
///     .map(|code| PointRecord::new(Vector3::zeros(), *code))
///     .collect();
/// let (retained, removed) = remove_overlap(&cloud, &ClassificationSet::overlap()).unwrap();
/// assert_eq!(removed, 1);
/// assert_eq!(retained.len(), 3);
/// ```
pub fn remove_overlap(
    cloud: &PointCloud,
    overlap_codes: &ClassificationSet,
) -> Result<(PointCloud, usize)> {
    if cloud.is_empty() {
        return Err(Error::EmptyInput);
    }
    let retain_mask = cloud
        .iter()
        .map(|point| !overlap_codes.contains(point.classification))
        .collect::<Vec<_>>();
    let removed = retain_mask.iter().filter(|keep| !**keep).count();
    if removed == cloud.len() {
        return Err(Error::NoPointsRemaining);
    }
    Ok((cloud.retain_by_mask(&retain_mask), removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::{
        layout::{classification::*, PointRecord},
        nalgebra::Vector3,
    };
    use std::collections::BTreeSet;

    fn cloud_with_codes(codes: &[u8]) -> PointCloud {
        codes
            .iter()
            .enumerate()
            .map(|(i, code)| PointRecord::new(Vector3::new(i as f64, 0.0, 0.0), *code))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            remove_overlap(&PointCloud::default(), &ClassificationSet::overlap()).err(),
            Some(Error::EmptyInput)
        );
    }

    #[test]
    fn test_all_overlap_points() {
        let cloud = cloud_with_codes(&[OVERLAP, OVERLAP]);
        assert_eq!(
            remove_overlap(&cloud, &ClassificationSet::overlap()).err(),
            Some(Error::NoPointsRemaining)
        );
    }

    #[test]
    fn test_empty_code_set_keeps_everything() {
        let cloud = cloud_with_codes(&[GROUND, OVERLAP, BRIDGE_DECK]);
        let (retained, removed) = remove_overlap(&cloud, &ClassificationSet::empty()).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(retained, cloud);
    }

    #[test]
    fn test_output_codes_are_set_difference() {
        let codes = [GROUND, OVERLAP, BUILDING, BRIDGE_DECK, WATER, OVERLAP, GROUND];
        let cloud = cloud_with_codes(&codes);
        let overlap = ClassificationSet::overlap_and_bridge_deck();
        let (retained, removed) = remove_overlap(&cloud, &overlap).unwrap();
        assert_eq!(removed, 3);

        let retained_codes = retained
            .iter()
            .map(|p| p.classification)
            .collect::<BTreeSet<_>>();
        let expected = codes
            .iter()
            .copied()
            .filter(|c| !overlap.contains(*c))
            .collect::<BTreeSet<_>>();
        assert_eq!(retained_codes, expected);
        // bounds shrink to the retained points, the last point is retained and the rest lie before it
        assert_eq!(retained.bounds().unwrap().max().x, 6.0);
        assert_eq!(retained[1].position.x, 2.0);
    }

    #[test]
    fn test_growing_code_set_never_keeps_more() {
        let codes = (0..=18u8).cycle().take(190).collect::<Vec<_>>();
        let cloud = cloud_with_codes(&codes);
        let mut overlap = ClassificationSet::empty();
        let mut previous = cloud.len();
        for code in [OVERLAP, BRIDGE_DECK, GROUND, HIGH_NOISE] {
            overlap.insert(code).unwrap();
            let (retained, _) = remove_overlap(&cloud, &overlap).unwrap();
            assert!(retained.len() <= previous);
            previous = retained.len();
        }
        assert_eq!(previous, 190 - 4 * 10);
    }
}
