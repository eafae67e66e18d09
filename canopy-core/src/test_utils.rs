use nalgebra::Vector3;
use rand::{prelude::Distribution, Rng};

use crate::{containers::PointCloud, layout::PointRecord};

pub(crate) struct DefaultPointDistribution;

impl Distribution<PointRecord> for DefaultPointDistribution {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> PointRecord {
        PointRecord {
            position: Vector3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(0.0..50.0),
            ),
            classification: rng.gen_range(0..19),
            intensity: rng.gen(),
            return_number: rng.gen_range(1..6),
            gps_time: None,
        }
    }
}

pub(crate) fn random_cloud(count: usize) -> PointCloud {
    let rng = rand::thread_rng();
    rng.sample_iter(DefaultPointDistribution)
        .take(count)
        .collect()
}
