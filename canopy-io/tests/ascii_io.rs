use anyhow::Result;
use canopy_core::{containers::PointCloud, layout::PointRecord, nalgebra::Vector3};
use canopy_io::{
    ascii::{AsciiReader, AsciiWriter},
    base::{PointReader, PointWriter},
};
use rand::{thread_rng, Rng};
use scopeguard::defer;

fn random_cloud(count: usize) -> PointCloud {
    let mut rng = thread_rng();
    (0..count)
        .map(|_| {
            // quantized to the writer precision so that values survive the text round trip exactly
            let mut coordinate = || (rng.gen_range(-100_000..100_000) as f64) / 100.0;
            let position = Vector3::new(coordinate(), coordinate(), coordinate());
            PointRecord::new(position, rng.gen_range(0..19))
                .with_intensity(rng.gen())
                .with_return_number(rng.gen_range(1..6))
                .with_gps_time(rng.gen_range(0..1_000_000) as f64 / 4.0)
        })
        .collect()
}

#[test]
fn write_and_read_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("canopy_ascii_io_{}.txt", std::process::id()));
    defer! {
        std::fs::remove_file(&path).ok();
    }

    let expected = random_cloud(500);
    {
        let mut writer = AsciiWriter::from_path(&path, "xyzirct")?;
        writer.set_precision(2);
        writer.write(&expected)?;
        writer.flush()?;
    }

    let cloud = AsciiReader::from_path(&path, "xyzirct", ", ")?.read()?;
    assert_eq!(cloud, expected);
    assert_eq!(cloud.header(), expected.header());
    Ok(())
}

#[test]
fn read_subset_of_columns() -> Result<()> {
    let path = std::env::temp_dir().join(format!("canopy_ascii_subset_{}.txt", std::process::id()));
    defer! {
        std::fs::remove_file(&path).ok();
    }

    let expected = random_cloud(50);
    {
        let mut writer = AsciiWriter::from_path(&path, "cxyzt")?;
        writer.set_delimiter(" ");
        writer.write(&expected)?;
        writer.flush()?;
    }

    let cloud = AsciiReader::from_path(&path, "sxyz", " ")?.read()?;
    assert_eq!(cloud.len(), expected.len());
    for (point, expected) in cloud.iter().zip(expected.iter()) {
        assert_eq!(point.position, expected.position);
        assert_eq!(point.classification, 0);
        assert_eq!(point.gps_time, None);
    }
    Ok(())
}

#[test]
fn missing_file() {
    let result = AsciiReader::from_path("/this/file/does/not/exist.txt", "xyz", ", ");
    assert!(format!("{:?}", result.err().unwrap()).contains("Could not open file"));
}
