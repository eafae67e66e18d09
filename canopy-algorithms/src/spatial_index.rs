use canopy_core::{containers::PointCloud, nalgebra::Vector3, Error, Result};
use kd_tree::{KdPoint, KdTree};

/// Which coordinates of a position a [SpatialIndex] is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensions {
    /// X and Y only, distances are measured in the horizontal plane
    Planar,
    /// X, Y and Z
    Spatial,
}

/// A point stored in the kd-tree, remembering its position in the input sequence
trait IndexedItem: KdPoint<Scalar = f64> + Send + Sync {
    fn from_position(position: &Vector3<f64>, index: usize) -> Self;
    fn index(&self) -> usize;
    fn squared_distance_to(&self, other: &Self) -> f64;
}

#[derive(Debug, Clone, Copy)]
struct PlanarItem {
    coords: [f64; 2],
    index: usize,
}

impl KdPoint for PlanarItem {
    type Scalar = f64;
    type Dim = typenum::U2;
    fn at(&self, k: usize) -> f64 {
        self.coords[k]
    }
}

impl IndexedItem for PlanarItem {
    fn from_position(position: &Vector3<f64>, index: usize) -> Self {
        Self {
            coords: [position.x, position.y],
            index,
        }
    }

    fn index(&self) -> usize {
        self.index
    }

    fn squared_distance_to(&self, other: &Self) -> f64 {
        let dx = self.coords[0] - other.coords[0];
        let dy = self.coords[1] - other.coords[1];
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy)]
struct SpatialItem {
    coords: [f64; 3],
    index: usize,
}

impl KdPoint for SpatialItem {
    type Scalar = f64;
    type Dim = typenum::U3;
    fn at(&self, k: usize) -> f64 {
        self.coords[k]
    }
}

impl IndexedItem for SpatialItem {
    fn from_position(position: &Vector3<f64>, index: usize) -> Self {
        Self {
            coords: [position.x, position.y, position.z],
            index,
        }
    }

    fn index(&self) -> usize {
        self.index
    }

    fn squared_distance_to(&self, other: &Self) -> f64 {
        let dx = self.coords[0] - other.coords[0];
        let dy = self.coords[1] - other.coords[1];
        let dz = self.coords[2] - other.coords[2];
        dx * dx + dy * dy + dz * dz
    }
}

impl Dimensions {
    /// True if all coordinates of `position` that are used in these dimensions are finite
    fn is_finite(&self, position: &Vector3<f64>) -> bool {
        let used_coordinates = match self {
            Dimensions::Planar => 2,
            Dimensions::Spatial => 3,
        };
        position.iter().take(used_coordinates).all(|c| c.is_finite())
    }
}

enum Tree {
    Planar(KdTree<PlanarItem>),
    Spatial(KdTree<SpatialItem>),
}

/// Result of a nearest-neighbor query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the point within the sequence the [SpatialIndex] was built from
    pub index: usize,
    /// Euclidean distance to the query position, measured in the dimensions of the index
    pub distance: f64,
}

/// Static nearest-neighbor index over the positions of a point set.
///
/// The index is built once and never modified. It only stores coordinates, so changing the classification of
/// the indexed points keeps it valid, but removing points requires building a new index. All query results
/// refer to points by their position in the sequence that was passed to [build](SpatialIndex::build).
///
/// Radius queries are inclusive: a point at exactly distance `r` counts as being within `r`. Nearest-neighbor
/// queries resolve ties in favor of the point with the lower index.
///
/// # Examples
///
/// ```
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_algorithms::spatial_index::{Dimensions, SpatialIndex};
/// let positions = vec![
///     Vector3::new(0.0, 0.0, 0.0),
///     Vector3::new(1.0, 0.0, 0.0),
///     Vector3::new(5.0, 5.0, 0.0),
/// ];
/// let index = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
/// assert_eq!(index.count_within_radius(&positions[0], 1.0).unwrap(), 2);
/// let nearest = index.nearest(&Vector3::new(4.0, 4.0, 0.0)).unwrap();
/// assert_eq!(nearest.index, 2);
/// ```
pub struct SpatialIndex {
    tree: Tree,
    len: usize,
}

impl SpatialIndex {
    /// Builds a new index over `positions`. Fails with `EmptyInput` if `positions` is empty and with
    /// `InvalidParameter` if any of the indexed coordinates is not finite
    pub fn build(positions: &[Vector3<f64>], dimensions: Dimensions) -> Result<Self> {
        if positions.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some(index) = positions
            .iter()
            .position(|p| !dimensions.is_finite(p))
        {
            return Err(Error::InvalidParameter(format!(
                "position of point {} has non-finite coordinates",
                index
            )));
        }

        let tree = match dimensions {
            Dimensions::Planar => Tree::Planar(build_tree(positions)),
            Dimensions::Spatial => Tree::Spatial(build_tree(positions)),
        };
        Ok(Self {
            tree,
            len: positions.len(),
        })
    }

    /// Builds a new index over the positions of all points in `cloud`
    pub fn from_cloud(cloud: &PointCloud, dimensions: Dimensions) -> Result<Self> {
        let positions = cloud.positions().collect::<Vec<_>>();
        Self::build(&positions, dimensions)
    }

    pub fn dimensions(&self) -> Dimensions {
        match self.tree {
            Tree::Planar(_) => Dimensions::Planar,
            Tree::Spatial(_) => Dimensions::Spatial,
        }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, an index can't be built over zero points
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts the indexed points within `radius` of `position` (boundary inclusive). If `position` is the
    /// position of an indexed point, that point counts itself. Fails with `InvalidRadius` if `radius` is not
    /// a positive finite number
    pub fn count_within_radius(&self, position: &Vector3<f64>, radius: f64) -> Result<usize> {
        validate_radius(radius)?;
        validate_query(position, self.dimensions())?;
        let count = match &self.tree {
            Tree::Planar(tree) => within_radius(tree, position, radius).count(),
            Tree::Spatial(tree) => within_radius(tree, position, radius).count(),
        };
        Ok(count)
    }

    /// Indices of all indexed points within `radius` of `position` (boundary inclusive), in ascending order
    pub fn neighbors_within_radius(
        &self,
        position: &Vector3<f64>,
        radius: f64,
    ) -> Result<Vec<usize>> {
        validate_radius(radius)?;
        validate_query(position, self.dimensions())?;
        let mut neighbors = match &self.tree {
            Tree::Planar(tree) => within_radius(tree, position, radius)
                .map(|item| item.index())
                .collect::<Vec<_>>(),
            Tree::Spatial(tree) => within_radius(tree, position, radius)
                .map(|item| item.index())
                .collect::<Vec<_>>(),
        };
        neighbors.sort_unstable();
        Ok(neighbors)
    }

    /// Returns the indexed point closest to `position`. If several points are equally close, the one with the
    /// lowest index is returned
    pub fn nearest(&self, position: &Vector3<f64>) -> Result<Neighbor> {
        validate_query(position, self.dimensions())?;
        match &self.tree {
            Tree::Planar(tree) => nearest(tree, position),
            Tree::Spatial(tree) => nearest(tree, position),
        }
    }
}

fn build_tree<T: IndexedItem>(positions: &[Vector3<f64>]) -> KdTree<T> {
    let items = positions
        .iter()
        .enumerate()
        .map(|(index, position)| T::from_position(position, index))
        .collect::<Vec<_>>();
    KdTree::build_by_ordered_float(items)
}

fn validate_radius(radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

fn validate_query(position: &Vector3<f64>, dimensions: Dimensions) -> Result<()> {
    if dimensions.is_finite(position) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "query position {:?} has non-finite coordinates",
            position
        )))
    }
}

/// The kd-tree is only used to gather candidates. The radius is widened slightly so that rounding inside the
/// tree can't drop points sitting exactly on the boundary, and membership is decided here with `<=`
fn candidate_radius(radius: f64) -> f64 {
    radius * (1.0 + 1e-9) + 1e-12
}

fn within_radius<'a, T: IndexedItem>(
    tree: &'a KdTree<T>,
    position: &Vector3<f64>,
    radius: f64,
) -> impl Iterator<Item = &'a T> + 'a {
    let query = T::from_position(position, usize::MAX);
    let squared_radius = radius * radius;
    tree.within_radius(&query, candidate_radius(radius))
        .into_iter()
        .filter(move |item| item.squared_distance_to(&query) <= squared_radius)
}

fn nearest<T: IndexedItem>(tree: &KdTree<T>, position: &Vector3<f64>) -> Result<Neighbor> {
    let query = T::from_position(position, usize::MAX);
    let closest = tree.nearest(&query).ok_or(Error::EmptyInput)?;
    let fallback = (closest.item.squared_distance_to(&query), closest.item.index());

    // the tree returns one of possibly several equidistant points, look at all of them
    let (squared_distance, index) = tree
        .within_radius(&query, candidate_radius(fallback.0.sqrt()))
        .into_iter()
        .map(|item| (item.squared_distance_to(&query), item.index()))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .unwrap_or(fallback);

    Ok(Neighbor {
        index,
        distance: squared_distance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_positions(count: usize, seed: u64) -> Vec<Vector3<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                Vector3::new(
                    rng.gen_range(0.0..20.0),
                    rng.gen_range(0.0..20.0),
                    rng.gen_range(0.0..5.0),
                )
            })
            .collect()
    }

    fn brute_force_count(positions: &[Vector3<f64>], query: &Vector3<f64>, radius: f64) -> usize {
        positions
            .iter()
            .filter(|p| (*p - query).norm_squared() <= radius * radius)
            .count()
    }

    #[test]
    fn test_build_fails_on_empty_input() {
        assert_eq!(
            SpatialIndex::build(&[], Dimensions::Spatial).err(),
            Some(Error::EmptyInput)
        );
    }

    #[test]
    fn test_build_fails_on_non_finite_coordinates() {
        let positions = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(f64::NAN, 1.0, 1.0)];
        assert!(matches!(
            SpatialIndex::build(&positions, Dimensions::Planar),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_planar_index_ignores_non_finite_z() {
        let positions = vec![Vector3::new(0.0, 0.0, f64::NAN)];
        assert!(SpatialIndex::build(&positions, Dimensions::Planar).is_ok());
    }

    #[test]
    fn test_invalid_radius() {
        let positions = random_positions(10, 1);
        let index = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        assert_eq!(
            index.count_within_radius(&positions[0], 0.0),
            Err(Error::InvalidRadius(0.0))
        );
        assert_eq!(
            index.count_within_radius(&positions[0], -1.0),
            Err(Error::InvalidRadius(-1.0))
        );
        assert!(matches!(
            index.neighbors_within_radius(&positions[0], f64::NAN),
            Err(Error::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_count_includes_self() {
        let positions = random_positions(200, 2);
        let index = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        for position in &positions {
            assert!(index.count_within_radius(position, 1e-6).unwrap() >= 1);
        }
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, -3.0),
        ];
        let index = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        assert_eq!(index.count_within_radius(&positions[0], 1.0).unwrap(), 2);
        assert_eq!(index.count_within_radius(&positions[0], 2.0).unwrap(), 3);
        assert_eq!(index.count_within_radius(&positions[0], 3.0).unwrap(), 4);
        assert_eq!(
            index.neighbors_within_radius(&positions[0], 2.0).unwrap(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_counts_match_brute_force() {
        let positions = random_positions(500, 3);
        let spatial = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        for query in positions.iter().step_by(7) {
            for radius in [0.5, 1.0, 2.5] {
                assert_eq!(
                    spatial.count_within_radius(query, radius).unwrap(),
                    brute_force_count(&positions, query, radius)
                );
            }
        }
    }

    #[test]
    fn test_planar_index_ignores_z() {
        let positions = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.5, 0.0, 100.0)];
        let planar = SpatialIndex::build(&positions, Dimensions::Planar).unwrap();
        let spatial = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        assert_eq!(planar.dimensions(), Dimensions::Planar);
        assert_eq!(planar.count_within_radius(&positions[0], 1.0).unwrap(), 2);
        assert_eq!(spatial.count_within_radius(&positions[0], 1.0).unwrap(), 1);

        let nearest = planar.nearest(&Vector3::new(0.5, 0.0, -50.0)).unwrap();
        assert_eq!(nearest.index, 1);
        assert_approx_eq!(nearest.distance, 0.0);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let positions = random_positions(300, 4);
        let queries = random_positions(50, 5);
        let index = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        for query in &queries {
            let expected = positions
                .iter()
                .map(|p| (p - query).norm())
                .fold(f64::MAX, f64::min);
            let nearest = index.nearest(query).unwrap();
            assert_approx_eq!(nearest.distance, expected);
            assert_approx_eq!((positions[nearest.index] - query).norm(), expected);
        }
    }

    #[test]
    fn test_nearest_ties_resolve_to_lowest_index() {
        // four points on a circle around the origin plus duplicates of them
        let positions = vec![
            Vector3::new(10.0, 10.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ];
        let index = SpatialIndex::build(&positions, Dimensions::Planar).unwrap();
        let nearest = index.nearest(&Vector3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(nearest.index, 1);
        assert_approx_eq!(nearest.distance, 1.0);

        let nearest = index.nearest(&Vector3::new(1.0, 0.0, 7.0)).unwrap();
        assert_eq!(nearest.index, 2);
        assert_eq!(nearest.distance, 0.0);
    }

    #[test]
    fn test_planar_query_ignores_non_finite_z() {
        let positions = vec![Vector3::new(0.0, 0.0, 1.0), Vector3::new(3.0, 0.0, 2.0)];
        let planar = SpatialIndex::build(&positions, Dimensions::Planar).unwrap();
        let query = Vector3::new(2.5, 0.0, f64::NAN);
        assert_eq!(planar.nearest(&query).unwrap().index, 1);
        assert_eq!(planar.count_within_radius(&query, 3.0).unwrap(), 2);

        let spatial = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        assert!(matches!(
            spatial.nearest(&query),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_cloud() {
        use canopy_core::layout::PointRecord;

        let cloud: PointCloud = random_positions(50, 7)
            .into_iter()
            .map(|position| PointRecord::new(position, 1))
            .collect();
        let index = SpatialIndex::from_cloud(&cloud, Dimensions::Spatial).unwrap();
        assert_eq!(index.len(), cloud.len());
        assert_eq!(index.nearest(&cloud[17].position).unwrap().index, 17);
        assert_eq!(
            SpatialIndex::from_cloud(&PointCloud::default(), Dimensions::Planar).err(),
            Some(Error::EmptyInput)
        );
    }

    #[test]
    fn test_non_finite_query_is_rejected() {
        let positions = random_positions(10, 6);
        let index = SpatialIndex::build(&positions, Dimensions::Spatial).unwrap();
        assert!(matches!(
            index.nearest(&Vector3::new(f64::INFINITY, 0.0, 0.0)),
            Err(Error::InvalidParameter(_))
        ));
    }
}
