use std::time::Instant;

use anyhow::Result;
use canopy_algorithms::{outlier_filter::remove_outliers, params::OutlierParams};
use canopy_tools::{io_args, load_params, read_cloud, write_cloud, IoArgs};
use clap::{value_t, App, Arg};
use log::info;

fn get_args() -> Result<(IoArgs, OutlierParams)> {
    let defaults = OutlierParams::default();
    let radius_help = format!("Search radius [default: {}]", defaults.radius);
    let min_neighbors_help = format!(
        "Minimum number of points within the radius, the point itself included [default: {}]",
        defaults.min_neighbors
    );
    let matches = App::new("canopy outliers")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Removes isolated points that have too few neighbors within a radius")
        .args(&io_args(true, true))
        .arg(
            Arg::with_name("RADIUS")
                .short("r")
                .long("radius")
                .takes_value(true)
                .value_name("RADIUS")
                .help(&radius_help),
        )
        .arg(
            Arg::with_name("MIN_NEIGHBORS")
                .short("m")
                .long("min-neighbors")
                .takes_value(true)
                .value_name("MIN_NEIGHBORS")
                .help(&min_neighbors_help),
        )
        .get_matches();

    let io = IoArgs::from_matches(&matches)?;
    let mut params: OutlierParams = load_params(&io)?;
    if matches.is_present("RADIUS") {
        params.radius = value_t!(matches, "RADIUS", f64)?;
    }
    if matches.is_present("MIN_NEIGHBORS") {
        params.min_neighbors = value_t!(matches, "MIN_NEIGHBORS", usize)?;
    }
    params.validate()?;
    Ok((io, params))
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let (args, params) = get_args()?;
    info!(
        "Removing outliers with radius {} and at least {} neighbors",
        params.radius, params.min_neighbors
    );

    let cloud = read_cloud(&args)?;
    let t_start = Instant::now();
    let (retained, removed) = remove_outliers(&cloud, params.radius, params.min_neighbors)?;
    info!(
        "Filtering took {:.2}s",
        t_start.elapsed().as_secs_f64()
    );
    write_cloud(&args, &retained)?;

    println!(
        "Removed {} of {} points, {} remaining",
        removed,
        cloud.len(),
        retained.len()
    );
    Ok(())
}
