use anyhow::Result;
use canopy_algorithms::{overlap_filter::remove_overlap, params::OverlapParams};
use canopy_core::layout::classification::ClassificationSet;
use canopy_tools::{io_args, load_params, parse_codes, read_cloud, write_cloud, IoArgs};
use clap::{App, Arg};
use log::info;

fn get_args() -> Result<(IoArgs, OverlapParams)> {
    let matches = App::new("canopy overlap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Removes overlap points from a point cloud")
        .args(&io_args(true, true))
        .arg(
            Arg::with_name("CODES")
                .short("c")
                .long("codes")
                .takes_value(true)
                .value_name("CODES")
                .help("Comma-separated classification codes to remove [default: 12]"),
        )
        .arg(
            Arg::with_name("WITH_BRIDGE_DECK")
                .long("with-bridge-deck")
                .conflicts_with("CODES")
                .help("Remove bridge deck points (17) together with overlap points (12)"),
        )
        .get_matches();

    let io = IoArgs::from_matches(&matches)?;
    let mut params: OverlapParams = load_params(&io)?;
    if let Some(codes) = matches.value_of("CODES") {
        params.overlap_codes = ClassificationSet::from_codes(&parse_codes(codes)?)?;
    } else if matches.is_present("WITH_BRIDGE_DECK") {
        params.overlap_codes = ClassificationSet::overlap_and_bridge_deck();
    }
    params.validate()?;
    Ok((io, params))
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let (args, params) = get_args()?;
    info!("Removing points with classification {}", params.overlap_codes);

    let cloud = read_cloud(&args)?;
    let (retained, removed) = remove_overlap(&cloud, &params.overlap_codes)?;
    write_cloud(&args, &retained)?;

    println!(
        "Removed {} overlap points of {}, {} remaining",
        removed,
        cloud.len(),
        retained.len()
    );
    Ok(())
}
