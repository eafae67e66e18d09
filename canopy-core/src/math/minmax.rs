use std::cmp;

use nalgebra::{Scalar, Vector3};

/// Helper trait for computing minimum and maximum values of point attributes. Works for the scalar attribute
/// types of a [PointRecord](crate::layout::PointRecord) as well as for positions
pub trait MinMax {
    /// Computes the infimum of this value and `other`. For scalar types, the infimum is simply the
    /// minimum of the two values, for vector types it is the component-wise minimum
    ///
    /// # Example
    /// ```
    /// use canopy_core::math::MinMax;
    /// # use canopy_core::nalgebra::Vector3;
    ///
    /// assert_eq!(5u16.infimum(&3u16), 3u16);
    /// assert_eq!(Vector3::new(1.0, 2.0, 3.0).infimum(&Vector3::new(2.0, 1.0, 0.0)), Vector3::new(1.0, 1.0, 0.0));
    /// ```
    fn infimum(&self, other: &Self) -> Self;
    /// Computes the supremum of this value and `other`. For scalar types, the supremum is simply the
    /// maximum of the two values, for vector types it is the component-wise maximum
    fn supremum(&self, other: &Self) -> Self;
}

macro_rules! impl_minmax_for_primitive_type {
    ($type:tt) => {
        impl MinMax for $type {
            fn infimum(&self, other: &Self) -> Self {
                cmp::min(*self, *other)
            }

            fn supremum(&self, other: &Self) -> Self {
                cmp::max(*self, *other)
            }
        }
    };
}

impl_minmax_for_primitive_type! {u8}
impl_minmax_for_primitive_type! {u16}
impl_minmax_for_primitive_type! {u32}
impl_minmax_for_primitive_type! {usize}

impl MinMax for f64 {
    fn infimum(&self, other: &Self) -> Self {
        if *self < *other {
            *self
        } else {
            *other
        }
    }

    fn supremum(&self, other: &Self) -> Self {
        if *self > *other {
            *self
        } else {
            *other
        }
    }
}

impl<T: MinMax + Scalar> MinMax for Vector3<T> {
    fn infimum(&self, other: &Self) -> Self {
        Vector3::new(
            self.x.infimum(&other.x),
            self.y.infimum(&other.y),
            self.z.infimum(&other.z),
        )
    }

    fn supremum(&self, other: &Self) -> Self {
        Vector3::new(
            self.x.supremum(&other.x),
            self.y.supremum(&other.y),
            self.z.supremum(&other.z),
        )
    }
}

/// Returns the minimum and maximum of all values in `iter`, or `None` if `iter` is empty
///
/// ```
/// use canopy_core::math::minmax;
///
/// assert_eq!(minmax([4u16, 9, 1, 7]), Some((1, 9)));
/// assert_eq!(minmax(Vec::<f64>::new()), None);
/// ```
pub fn minmax<T: MinMax + Copy, I: IntoIterator<Item = T>>(iter: I) -> Option<(T, T)> {
    iter.into_iter().fold(None, |acc, val| match acc {
        None => Some((val, val)),
        Some((old_min, old_max)) => Some((val.infimum(&old_min), val.supremum(&old_max))),
    })
}
