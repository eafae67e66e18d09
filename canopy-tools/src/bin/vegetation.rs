use std::time::Instant;

use anyhow::Result;
use canopy_algorithms::{params::VegetationParams, vegetation::reclassify_vegetation};
use canopy_tools::{classification_name, io_args, load_params, read_cloud, write_cloud, IoArgs};
use clap::{value_t, App, Arg};
use log::{debug, info};

fn get_args() -> Result<(IoArgs, VegetationParams)> {
    let matches = App::new("canopy vegetation")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Splits vegetation points into low, medium and high vegetation by their height above the ground")
        .args(&io_args(true, true))
        .arg(
            Arg::with_name("LOW")
                .long("low")
                .takes_value(true)
                .value_name("LOW")
                .help("Points lower than this above the ground become low vegetation [default: 2.0]"),
        )
        .arg(
            Arg::with_name("HIGH")
                .long("high")
                .takes_value(true)
                .value_name("HIGH")
                .help("Points higher than this above the ground become high vegetation [default: 10.0]"),
        )
        .arg(
            Arg::with_name("GROUND_CODE")
                .long("ground-code")
                .takes_value(true)
                .value_name("GROUND_CODE")
                .help("Classification of the ground points [default: 2]"),
        )
        .arg(
            Arg::with_name("TARGET_CODE")
                .long("target-code")
                .takes_value(true)
                .value_name("TARGET_CODE")
                .help("Classification of the points to reclassify [default: 5]"),
        )
        .get_matches();

    let io = IoArgs::from_matches(&matches)?;
    let mut params: VegetationParams = load_params(&io)?;
    if matches.is_present("LOW") {
        params.low_threshold = value_t!(matches, "LOW", f64)?;
    }
    if matches.is_present("HIGH") {
        params.high_threshold = value_t!(matches, "HIGH", f64)?;
    }
    if matches.is_present("GROUND_CODE") {
        params.ground_code = value_t!(matches, "GROUND_CODE", u8)?;
    }
    if matches.is_present("TARGET_CODE") {
        params.target_code = value_t!(matches, "TARGET_CODE", u8)?;
    }
    params.validate()?;
    Ok((io, params))
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let (args, params) = get_args()?;
    debug!("{:?}", params);

    let mut cloud = read_cloud(&args)?;
    let t_start = Instant::now();
    let summary = reclassify_vegetation(&mut cloud, &params)?;
    info!(
        "Reclassified {} points against {} ground points in {:.2}s",
        summary.target_points,
        summary.ground_points,
        t_start.elapsed().as_secs_f64()
    );
    write_cloud(&args, &cloud)?;

    println!("{:>8} {}", summary.low, classification_name(params.low_code));
    println!("{:>8} {}", summary.medium, classification_name(params.medium_code));
    println!("{:>8} {}", summary.high, classification_name(params.high_code));
    Ok(())
}
