use std::time::Instant;

use anyhow::Result;
use canopy_algorithms::{clustering::cluster_structures, params::ClusterParams};
use canopy_tools::{io_args, load_params, read_cloud, IoArgs};
use clap::{value_t, App, Arg};
use log::info;

struct Args {
    pub io: IoArgs,
    pub params: ClusterParams,
    pub json: bool,
}

fn get_args() -> Result<Args> {
    let matches = App::new("canopy buildings")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Counts the structures formed by building points using density-based clustering in the XY plane")
        .args(&io_args(false, true))
        .arg(
            Arg::with_name("EPS")
                .short("e")
                .long("eps")
                .takes_value(true)
                .value_name("EPS")
                .help("Neighborhood radius [default: 5.0]"),
        )
        .arg(
            Arg::with_name("MIN_SAMPLES")
                .short("m")
                .long("min-samples")
                .takes_value(true)
                .value_name("MIN_SAMPLES")
                .help("Minimum number of points within the radius for a core point [default: 5]"),
        )
        .arg(
            Arg::with_name("BUILDING_CODE")
                .long("building-code")
                .takes_value(true)
                .value_name("BUILDING_CODE")
                .help("Classification of the building points [default: 6]"),
        )
        .arg(
            Arg::with_name("JSON")
                .long("json")
                .help("Print the clusters as JSON"),
        )
        .get_matches();

    let io = IoArgs::from_matches(&matches)?;
    let mut params: ClusterParams = load_params(&io)?;
    if matches.is_present("EPS") {
        params.eps = value_t!(matches, "EPS", f64)?;
    }
    if matches.is_present("MIN_SAMPLES") {
        params.min_samples = value_t!(matches, "MIN_SAMPLES", usize)?;
    }
    if matches.is_present("BUILDING_CODE") {
        params.building_code = value_t!(matches, "BUILDING_CODE", u8)?;
    }
    params.validate()?;
    Ok(Args {
        io,
        params,
        json: matches.is_present("JSON"),
    })
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = get_args()?;

    let cloud = read_cloud(&args.io)?;
    let t_start = Instant::now();
    let structures = cluster_structures(
        &cloud,
        args.params.building_code,
        args.params.eps,
        args.params.min_samples,
    )?;
    info!(
        "Clustered {} building points in {:.2}s, {} noise points",
        structures.point_indices.len(),
        t_start.elapsed().as_secs_f64(),
        structures.clustering.noise_count()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&structures.summaries)?);
        return Ok(());
    }

    println!("Structures: {}", structures.structure_count());
    for summary in &structures.summaries {
        println!(
            "\t#{:<4} {:>8} points, centroid ({:.2}, {:.2}), extent ({:.2}, {:.2}) - ({:.2}, {:.2})",
            summary.id,
            summary.point_count,
            summary.centroid.x,
            summary.centroid.y,
            summary.min.x,
            summary.min.y,
            summary.max.x,
            summary.max.y
        );
    }
    Ok(())
}
