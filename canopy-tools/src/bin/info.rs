use anyhow::Result;
use canopy_algorithms::statistics::CloudStatistics;
use canopy_tools::{classification_name, io_args, read_cloud, IoArgs};
use clap::{App, Arg};

struct Args {
    pub io: IoArgs,
    pub json: bool,
}

fn get_args() -> Result<Args> {
    let matches = App::new("canopy info")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prints information about the given point cloud file")
        .args(&io_args(false, false))
        .arg(
            Arg::with_name("JSON")
                .long("json")
                .help("Print the statistics as JSON"),
        )
        .get_matches();

    Ok(Args {
        io: IoArgs::from_matches(&matches)?,
        json: matches.is_present("JSON"),
    })
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = get_args()?;

    let cloud = read_cloud(&args.io)?;
    let statistics = CloudStatistics::compute(&cloud)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statistics)?);
        return Ok(());
    }

    print!("{}", statistics);
    if let Ok((first, last)) = statistics.gps_datetime_range() {
        println!("\tAcquired:         {} - {}", first, last);
    }
    println!("Classes");
    for (code, count) in &statistics.classification_counts {
        println!("\t{:<28} {}", classification_name(*code), count);
    }
    Ok(())
}
