use canopy_algorithms::{
    clustering::cluster_structures,
    outlier_filter::remove_outliers,
    overlap_filter::remove_overlap,
    params::{ClusterParams, OutlierParams, OverlapParams, VegetationParams},
    statistics::CloudStatistics,
    vegetation::reclassify_vegetation,
};
use canopy_core::{
    containers::PointCloud,
    layout::{classification::*, PointRecord},
    nalgebra::Vector3,
};
use rand::Rng;

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let mut points = vec![];

    //ground covering a 100x100 area
    for _ in 0..5000 {
        points.push(PointRecord::new(
            Vector3::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0), 0.0),
            GROUND,
        ));
    }
    //three flat roofs
    for (x, y) in [(10.0, 10.0), (60.0, 20.0), (30.0, 70.0)] {
        for _ in 0..400 {
            points.push(PointRecord::new(
                Vector3::new(
                    x + rng.gen_range(0.0..12.0),
                    y + rng.gen_range(0.0..8.0),
                    8.0,
                ),
                BUILDING,
            ));
        }
    }
    //trees of varying height
    for _ in 0..2000 {
        points.push(PointRecord::new(
            Vector3::new(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.5..25.0),
            ),
            HIGH_VEGETATION,
        ));
    }
    //overlap points from a neighboring flight line and a few stray returns
    for _ in 0..300 {
        points.push(PointRecord::new(
            Vector3::new(rng.gen_range(90.0..100.0), rng.gen_range(0.0..100.0), 0.2),
            OVERLAP,
        ));
    }
    for _ in 0..10 {
        points.push(PointRecord::new(
            Vector3::new(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(200.0..300.0),
            ),
            UNCLASSIFIED,
        ));
    }
    let cloud = PointCloud::from_points(points);
    println!("{}", CloudStatistics::compute(&cloud)?);

    let outlier_params = OutlierParams::default();
    let (cloud, removed) = remove_outliers(
        &cloud,
        outlier_params.radius * 3.0,
        outlier_params.min_neighbors,
    )?;
    println!("Removed {} outliers", removed);

    let (mut cloud, removed) = remove_overlap(&cloud, &OverlapParams::default().overlap_codes)?;
    println!("Removed {} overlap points", removed);

    let summary = reclassify_vegetation(&mut cloud, &VegetationParams::default())?;
    println!(
        "Vegetation: {} low, {} medium, {} high",
        summary.low, summary.medium, summary.high
    );

    let params = ClusterParams::default();
    let structures =
        cluster_structures(&cloud, params.building_code, params.eps, params.min_samples)?;
    println!("Found {} structures", structures.structure_count());
    for summary in &structures.summaries {
        println!(
            "\tstructure {}: {} points around ({:.1}, {:.1})",
            summary.id, summary.point_count, summary.centroid.x, summary.centroid.y
        );
    }
    Ok(())
}
