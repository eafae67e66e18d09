use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use canopy_core::{containers::PointCloud, layout::PointRecord, Error};

use super::{trim_unnecessary_trailing_zeros, PointDataType};
use crate::base::PointWriter;

/// `PointWriter` implementation for delimited ascii files. Writes one line per point with one column per
/// literal of the `format` string. Coordinates and GPS times are written with a fixed number of decimal
/// places (5 by default) with unnecessary trailing zeros removed. Skip literals produce empty columns.
///
/// ```
/// # use canopy_core::containers::PointCloud;
/// # use canopy_core::layout::PointRecord;
/// # use canopy_core::nalgebra::Vector3;
/// # use canopy_io::{ascii::AsciiWriter, base::PointWriter};
/// let cloud: PointCloud = vec![PointRecord::new(Vector3::new(1.5, 2.0, 3.25), 2)].into();
/// let mut output = vec![];
/// {
///     let mut writer = AsciiWriter::from_write(&mut output, "xyzc").unwrap();
///     writer.write(&cloud).unwrap();
///     writer.flush().unwrap();
/// }
/// assert_eq!(String::from_utf8(output).unwrap(), "1.5, 2.0, 3.25, 2\n");
/// ```
pub struct AsciiWriter<W: Write> {
    writer: W,
    delimiter: String,
    precision: usize,
    parse_layout: Vec<PointDataType>,
}

impl<W: Write> AsciiWriter<W> {
    /// Creates a new `AsciiWriter` from the given `write`. Fails if `format` contains unknown literals or lacks
    /// one of `x`, `y`, `z`
    pub fn from_write(write: W, format: &str) -> Result<Self> {
        Ok(Self {
            writer: write,
            delimiter: String::from(", "),
            precision: 5,
            parse_layout: PointDataType::get_parse_layout(format)?,
        })
    }

    pub fn set_delimiter(&mut self, delimiter: &str) {
        self.delimiter = String::from(delimiter);
    }

    /// Number of decimal places for coordinates and GPS times
    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision;
    }

    fn format_float(&self, value: f64) -> String {
        trim_unnecessary_trailing_zeros(&format!("{:.1$}", value, self.precision)).to_string()
    }

    fn write_point(&mut self, point: &PointRecord) -> Result<()> {
        let mut columns = Vec::with_capacity(self.parse_layout.len());
        for data_type in &self.parse_layout {
            let column = match data_type {
                PointDataType::Skip => String::new(),
                PointDataType::CoordinateX => self.format_float(point.position.x),
                PointDataType::CoordinateY => self.format_float(point.position.y),
                PointDataType::CoordinateZ => self.format_float(point.position.z),
                PointDataType::Intensity => point.intensity.to_string(),
                PointDataType::ReturnNumber => point.return_number.to_string(),
                PointDataType::Classification => point.classification.to_string(),
                PointDataType::GpsTime => {
                    let gps_time = point.gps_time.ok_or(Error::MissingField("gps_time"))?;
                    self.format_float(gps_time)
                }
            };
            columns.push(column);
        }
        writeln!(self.writer, "{}", columns.join(&self.delimiter))?;
        Ok(())
    }
}

impl AsciiWriter<BufWriter<File>> {
    /// Creates a new `AsciiWriter` that writes to the file at `path`, replacing its contents. See
    /// [from_write](AsciiWriter::from_write)
    pub fn from_path<P: AsRef<Path>>(path: P, format: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Could not create file {}", path.display()))?;
        Self::from_write(BufWriter::new(file), format)
    }
}

impl<W: Write> PointWriter for AsciiWriter<W> {
    fn write(&mut self, cloud: &PointCloud) -> Result<()> {
        for (index, point) in cloud.iter().enumerate() {
            self.write_point(point)
                .with_context(|| format!("WriteError at point {}.", index))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
