use nalgebra::Vector3;

/// A single LiDAR point with the fixed set of attributes that the analysis algorithms consume.
///
/// Positions are stored in whatever coordinate reference system the source data uses, canopy never
/// reprojects them. `gps_time` is in seconds since the GPS epoch (1980-01-06T00:00:00Z) and is `None` for
/// sources that do not record it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointRecord {
    pub position: Vector3<f64>,
    /// ASPRS classification code, see [classification](crate::layout::classification)
    pub classification: u8,
    pub intensity: u16,
    pub return_number: u8,
    pub gps_time: Option<f64>,
}

impl PointRecord {
    /// Creates a new point at `position` with the given classification and all other attributes zeroed
    /// ```
    /// # use canopy_core::layout::PointRecord;
    /// # use canopy_core::nalgebra::Vector3;
    /// let point = PointRecord::new(Vector3::new(1.0, 2.0, 3.0), 2);
    /// assert_eq!(point.classification, 2);
    /// assert_eq!(point.gps_time, None);
    /// ```
    pub fn new(position: Vector3<f64>, classification: u8) -> Self {
        Self {
            position,
            classification,
            ..Default::default()
        }
    }

    pub fn with_intensity(mut self, intensity: u16) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_return_number(mut self, return_number: u8) -> Self {
        self.return_number = return_number;
        self
    }

    pub fn with_gps_time(mut self, gps_time: f64) -> Self {
        self.gps_time = Some(gps_time);
        self
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }
}
