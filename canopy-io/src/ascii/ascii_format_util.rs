use anyhow::{bail, Result};

// Maps the columns of an ascii file to the attribute of a point record they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointDataType {
    Skip,
    CoordinateX,    //F64
    CoordinateY,    //F64
    CoordinateZ,    //F64
    Intensity,      //U16
    ReturnNumber,   //U8
    Classification, //U8
    GpsTime,        //F64
}

impl std::fmt::Display for PointDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PointDataType {
    //subset of the LAStools literals
    //s - skip this column
    //x - x coordinate
    //y - y coordinate
    //z - z coordinate
    //i - intensity
    //r - return number
    //c - classification
    //t - gps time
    pub(crate) fn get_parse_layout(format: &str) -> Result<Vec<PointDataType>> {
        let mut parse_layout = Vec::<PointDataType>::new();
        for character in format.chars() {
            match character {
                's' => parse_layout.push(PointDataType::Skip),
                'x' => parse_layout.push(PointDataType::CoordinateX),
                'y' => parse_layout.push(PointDataType::CoordinateY),
                'z' => parse_layout.push(PointDataType::CoordinateZ),
                'i' => parse_layout.push(PointDataType::Intensity),
                'r' => parse_layout.push(PointDataType::ReturnNumber),
                'c' => parse_layout.push(PointDataType::Classification),
                't' => parse_layout.push(PointDataType::GpsTime),
                _ => {
                    bail!(
                        "FormatError can't interpret format literal '{}' in format string '{}'.",
                        character,
                        format
                    );
                }
            }
        }
        for (required, literal) in [
            (PointDataType::CoordinateX, 'x'),
            (PointDataType::CoordinateY, 'y'),
            (PointDataType::CoordinateZ, 'z'),
        ] {
            if !parse_layout.contains(&required) {
                bail!(
                    "FormatError format string '{}' has no '{}' literal, positions need x, y and z.",
                    format,
                    literal
                );
            }
        }
        Ok(parse_layout)
    }

    pub(crate) fn literal(&self) -> char {
        match self {
            PointDataType::Skip => 's',
            PointDataType::CoordinateX => 'x',
            PointDataType::CoordinateY => 'y',
            PointDataType::CoordinateZ => 'z',
            PointDataType::Intensity => 'i',
            PointDataType::ReturnNumber => 'r',
            PointDataType::Classification => 'c',
            PointDataType::GpsTime => 't',
        }
    }
}

/// Removes zeros at the end of a formatted decimal number, keeping at least one digit after the point
pub(crate) fn trim_unnecessary_trailing_zeros(slice: &str) -> &str {
    if !slice.contains('.') {
        return slice;
    }
    let mut end = slice.len();
    while slice[..end].ends_with('0') && !slice[..end].ends_with(".0") {
        end -= 1;
    }
    &slice[..end]
}

pub const FORMAT_LITERALS_HELP: &str = "The following literals can be interpreted:
    s - skip this column
    x - x coordinate
    y - y coordinate
    z - z coordinate
    i - intensity
    r - return number
    c - classification
    t - gps time";
