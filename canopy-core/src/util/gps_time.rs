use chrono::{DateTime, Duration, TimeZone, Utc};

/// Returns the GPS epoch, 1980-01-06T00:00:00Z
pub fn gps_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1980, 1, 6, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Converts a GPS time in seconds since the GPS epoch into a UTC timestamp. Leap seconds are not applied,
/// the offset is added as plain elapsed seconds. Returns `None` if `gps_time` is not finite or the result
/// does not fit into a `DateTime`
///
/// ```
/// # use canopy_core::util::gps_time_to_datetime;
/// let time = gps_time_to_datetime(86_400.5).unwrap();
/// assert_eq!(time.to_rfc3339(), "1980-01-07T00:00:00.500+00:00");
/// ```
pub fn gps_time_to_datetime(gps_time: f64) -> Option<DateTime<Utc>> {
    if !gps_time.is_finite() {
        return None;
    }
    let whole_seconds = gps_time.floor();
    let nanos = ((gps_time - whole_seconds) * 1e9).round() as i64;
    let offset = Duration::try_seconds(whole_seconds as i64)?
        .checked_add(&Duration::nanoseconds(nanos))?;
    gps_epoch().checked_add_signed(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_maps_to_zero() {
        assert_eq!(gps_time_to_datetime(0.0), Some(gps_epoch()));
        assert_eq!(gps_epoch().to_rfc3339(), "1980-01-06T00:00:00+00:00");
    }

    #[test]
    fn test_negative_offsets_go_before_the_epoch() {
        let time = gps_time_to_datetime(-1.0).unwrap();
        assert_eq!(time.to_rfc3339(), "1980-01-05T23:59:59+00:00");
    }

    #[test]
    fn test_non_finite_times_are_rejected() {
        assert_eq!(gps_time_to_datetime(f64::NAN), None);
        assert_eq!(gps_time_to_datetime(f64::INFINITY), None);
    }
}
