mod cancellation;
pub use self::cancellation::*;

mod gps_time;
pub use self::gps_time::*;
