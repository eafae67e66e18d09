#![warn(clippy::all)]
//! Shared command line handling of the canopy tools: input/output arguments, point cloud file access and
//! parameter files.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{anyhow, Context, Result};
use canopy_core::containers::PointCloud;
use canopy_io::{
    ascii::{AsciiReader, AsciiWriter, FORMAT_LITERALS_HELP},
    base::{PointReader, PointWriter},
};
use clap::{Arg, ArgMatches};
use log::{debug, info};
use serde::de::DeserializeOwned;

pub const DEFAULT_FORMAT: &str = "xyzc";
pub const DEFAULT_DELIMITER: &str = "space";

/// Input, output and parameter file arguments common to all tools
pub struct IoArgs {
    pub input_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub format: String,
    pub output_format: String,
    pub delimiter: String,
    pub params_file: Option<PathBuf>,
}

/// Arguments for input file, format and delimiter. With `with_params`, an optional parameter file is added.
/// With `with_output`, a required output file and an optional output format are added as well
pub fn io_args<'a, 'b>(with_output: bool, with_params: bool) -> Vec<Arg<'a, 'b>> {
    let mut args = vec![
        Arg::with_name("INPUT")
            .short("i")
            .long("input")
            .takes_value(true)
            .value_name("INPUT")
            .help("Input point cloud file (delimited ascii)")
            .required(true),
        Arg::with_name("FORMAT")
            .short("f")
            .long("format")
            .takes_value(true)
            .value_name("FORMAT")
            .help("Column format of the input file using the literals s, x, y, z, i, r, c, t")
            .long_help(FORMAT_LITERALS_HELP)
            .default_value(DEFAULT_FORMAT),
        Arg::with_name("DELIMITER")
            .short("d")
            .long("delimiter")
            .takes_value(true)
            .value_name("DELIMITER")
            .help("Column delimiter. One of 'space', 'tab', 'comma', 'semicolon' or any literal string")
            .default_value(DEFAULT_DELIMITER),
    ];
    if with_params {
        args.push(
            Arg::with_name("PARAMS")
                .short("p")
                .long("params")
                .takes_value(true)
                .value_name("PARAMS")
                .help("JSON file with algorithm parameters. Command line values take precedence"),
        );
    }
    if with_output {
        args.push(
            Arg::with_name("OUTPUT")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Output point cloud file")
                .required(true),
        );
        args.push(
            Arg::with_name("OUTPUT_FORMAT")
                .long("output-format")
                .takes_value(true)
                .value_name("OUTPUT_FORMAT")
                .help("Column format of the output file, defaults to the input format"),
        );
    }
    args
}

impl IoArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let input_file = matches
            .value_of("INPUT")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("No input file given"))?;
        let format = matches
            .value_of("FORMAT")
            .unwrap_or(DEFAULT_FORMAT)
            .to_string();
        let output_format = matches
            .value_of("OUTPUT_FORMAT")
            .map(str::to_string)
            .unwrap_or_else(|| format.clone());
        Ok(Self {
            input_file,
            output_file: matches.value_of("OUTPUT").map(PathBuf::from),
            format,
            output_format,
            delimiter: parse_delimiter(matches.value_of("DELIMITER").unwrap_or(DEFAULT_DELIMITER)),
            params_file: matches.value_of("PARAMS").map(PathBuf::from),
        })
    }
}

/// Resolves the named delimiters accepted on the command line
pub fn parse_delimiter(delimiter: &str) -> String {
    match delimiter {
        "space" => " ".to_string(),
        "tab" => "\t".to_string(),
        "comma" => ",".to_string(),
        "semicolon" => ";".to_string(),
        other => other.to_string(),
    }
}

/// Reads the input file of `args` into memory
pub fn read_cloud(args: &IoArgs) -> Result<PointCloud> {
    let t_start = Instant::now();
    let mut reader = AsciiReader::from_path(&args.input_file, &args.format, &args.delimiter)?;
    let cloud = reader
        .read()
        .with_context(|| format!("Could not read {}", args.input_file.display()))?;
    info!(
        "Read {} points from {} in {:.2}s",
        cloud.len(),
        args.input_file.display(),
        t_start.elapsed().as_secs_f64()
    );
    debug!("{}", cloud.header());
    Ok(cloud)
}

/// Writes `cloud` to the output file of `args`
pub fn write_cloud(args: &IoArgs, cloud: &PointCloud) -> Result<()> {
    let output_file = args
        .output_file
        .as_ref()
        .ok_or_else(|| anyhow!("No output file given"))?;
    let mut writer = AsciiWriter::from_path(output_file, &args.output_format)?;
    writer.set_delimiter(&args.delimiter);
    writer
        .write(cloud)
        .with_context(|| format!("Could not write {}", output_file.display()))?;
    writer.flush()?;
    info!("Wrote {} points to {}", cloud.len(), output_file.display());
    Ok(())
}

/// Loads algorithm parameters from the parameter file of `args`, or returns the defaults if there is none.
/// Fields missing from the file take their default value
pub fn load_params<T: DeserializeOwned + Default>(args: &IoArgs) -> Result<T> {
    match &args.params_file {
        Some(path) => read_params_file(path),
        None => Ok(T::default()),
    }
}

fn read_params_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Could not open parameter file {}", path.display()))?;
    let params = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid parameter file {}", path.display()))?;
    info!("Loaded parameters from {}", path.display());
    Ok(params)
}

/// Parses a comma-separated list of classification codes such as `12,17`
pub fn parse_codes(codes: &str) -> Result<Vec<u8>> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            code.parse::<u8>()
                .with_context(|| format!("'{}' is not a classification code", code))
        })
        .collect()
}

/// Human readable name of an ASPRS classification code
pub fn classification_name(code: u8) -> &'static str {
    match code {
        0 => "Created, never classified",
        1 => "Unclassified",
        2 => "Ground",
        3 => "Low vegetation",
        4 => "Medium vegetation",
        5 => "High vegetation",
        6 => "Building",
        7 => "Low point (noise)",
        8 => "Model key-point",
        9 => "Water",
        10 => "Rail",
        11 => "Road surface",
        12 => "Overlap",
        13 => "Wire guard",
        14 => "Wire conductor",
        15 => "Transmission tower",
        16 => "Wire-structure connector",
        17 => "Bridge deck",
        18 => "High noise",
        _ => "Reserved / user defined",
    }
}
