use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use canopy_core::{containers::PointCloud, layout::PointRecord};
use itertools::{EitherOrBoth::*, Itertools};

use super::PointDataType;
use crate::base::PointReader;

/// `PointReader` implementation for delimited ascii files.
///
/// Every non-empty line holds one point. Lines starting with `#` are treated as comments. The `format` string
/// assigns a point attribute to every column, using a subset of the LAStools literals (see
/// [FORMAT_LITERALS_HELP](crate::ascii::FORMAT_LITERALS_HELP)). Columns beyond the end of the format string
/// are ignored. Attributes that the format does not mention keep their default value, and the GPS time is only
/// set if the format contains `t`.
///
/// ```
/// # use std::io::Cursor;
/// # use canopy_io::{ascii::AsciiReader, base::PointReader};
/// let data = "1.0, 2.0, 3.0, 2\n4.0, 5.0, 6.0, 5\n";
/// let mut reader = AsciiReader::from_read(Cursor::new(data), "xyzc", ", ").unwrap();
/// let cloud = reader.read().unwrap();
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud[1].classification, 5);
/// ```
pub struct AsciiReader<R: BufRead> {
    reader: R,
    delimiter: String,
    parse_layout: Vec<PointDataType>,
}

impl<R: BufRead> AsciiReader<R> {
    /// Creates a new `AsciiReader` from the given `read`. A `delimiter` that consists only of whitespace
    /// matches any run of whitespace. Fails if `format` contains unknown literals or lacks one of `x`, `y`, `z`
    pub fn from_read(read: R, format: &str, delimiter: &str) -> Result<Self> {
        Ok(Self {
            reader: read,
            delimiter: delimiter.to_string(),
            parse_layout: PointDataType::get_parse_layout(format)?,
        })
    }

    fn split_line<'l>(&'l self, line: &'l str) -> Box<dyn Iterator<Item = &'l str> + 'l> {
        let delimiter = self.delimiter.trim();
        if delimiter.is_empty() {
            Box::new(line.split_whitespace())
        } else {
            Box::new(line.split(delimiter).map(str::trim))
        }
    }

    fn get_point(&self, line: &str) -> Result<PointRecord> {
        let mut point = PointRecord::default();
        for pair in self.split_line(line).zip_longest(&self.parse_layout) {
            match pair {
                Both(value_str, data_type) => match data_type {
                    PointDataType::Skip => {}
                    PointDataType::CoordinateX => {
                        point.position.x = parse_string(value_str)
                            .with_context(|| generate_parse_error(data_type))?;
                    }
                    PointDataType::CoordinateY => {
                        point.position.y = parse_string(value_str)
                            .with_context(|| generate_parse_error(data_type))?;
                    }
                    PointDataType::CoordinateZ => {
                        point.position.z = parse_string(value_str)
                            .with_context(|| generate_parse_error(data_type))?;
                    }
                    PointDataType::Intensity => {
                        point.intensity = parse_string(value_str)
                            .with_context(|| generate_parse_error(data_type))?;
                    }
                    PointDataType::ReturnNumber => {
                        point.return_number = parse_string(value_str)
                            .with_context(|| generate_parse_error(data_type))?;
                    }
                    PointDataType::Classification => {
                        point.classification = parse_string(value_str)
                            .with_context(|| generate_parse_error(data_type))?;
                    }
                    PointDataType::GpsTime => {
                        point.gps_time = Some(
                            parse_string(value_str)
                                .with_context(|| generate_parse_error(data_type))?,
                        );
                    }
                },
                Left(_) => continue,
                Right(_) => {
                    bail!("Input format string expected more items in the line. Found End-of-Line.")
                }
            }
        }
        Ok(point)
    }
}

impl AsciiReader<BufReader<File>> {
    /// Opens the file at `path` for reading. See [from_read](AsciiReader::from_read)
    pub fn from_path<P: AsRef<Path>>(path: P, format: &str, delimiter: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Could not open file {}", path.display()))?;
        Self::from_read(BufReader::new(file), format, delimiter)
    }
}

impl<R: BufRead> PointReader for AsciiReader<R> {
    fn read(&mut self) -> Result<PointCloud> {
        let mut points = vec![];
        let mut line = String::new();
        let mut line_number = 0;
        loop {
            line.clear();
            line_number += 1;
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            let point = self
                .get_point(content)
                .with_context(|| format!("ReadError in line {}.", line_number))?;
            points.push(point);
        }
        Ok(PointCloud::from_points(points))
    }
}

fn parse_string<V: FromStr>(value_str: &str) -> Result<V> {
    value_str.parse::<V>().map_err(|_| {
        anyhow::anyhow!(
            "ParseError expected {} found '{}'.",
            std::any::type_name::<V>(),
            value_str
        )
    })
}

fn generate_parse_error(datatype: &PointDataType) -> String {
    format!(
        "ParseError at parsing {} for format literal '{}'.",
        datatype,
        datatype.literal()
    )
}
