mod point_record;
pub use self::point_record::*;

/// Standard ASPRS classification codes
pub mod classification;
