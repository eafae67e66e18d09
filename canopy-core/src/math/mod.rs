mod bounds;
pub use self::bounds::*;

mod minmax;
pub use self::minmax::*;
