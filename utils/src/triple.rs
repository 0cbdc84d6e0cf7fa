//! three-slot storage keyed by a degree of freedom. Used wherever a value is held per axis or per angle, so lookups
//! can never miss.
use crate::identifiers::{Angle, Axis};

macro_rules! keyed_triple {
    ($(#[$meta:meta])* $name:ident, $key:ty, $first:path, $second:path, $third:path) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Copy, Clone, Default)]
        pub struct $name<T>(pub T, pub T, pub T);

        impl<T> $name<T> {
            pub fn from_fn(mut f: impl FnMut($key) -> T) -> Self {
                Self(f($first), f($second), f($third))
            }

            pub fn try_from_fn<E>(mut f: impl FnMut($key) -> Result<T, E>) -> Result<Self, E> {
                //! builds all three slots or none; the first error wins.
                Ok(Self(f($first)?, f($second)?, f($third)?))
            }

            pub fn get(&self, key: $key) -> &T {
                match key {
                    $first => &self.0,
                    $second => &self.1,
                    $third => &self.2,
                }
            }

            pub fn get_mut(&mut self, key: $key) -> &mut T {
                match key {
                    $first => &mut self.0,
                    $second => &mut self.1,
                    $third => &mut self.2,
                }
            }

            pub fn iter(&self) -> impl Iterator<Item = ($key, &T)> {
                [($first, &self.0), ($second, &self.1), ($third, &self.2)].into_iter()
            }

            pub fn all(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
                pred(&self.0) && pred(&self.1) && pred(&self.2)
            }
        }

        impl $name<f64> {
            pub fn add(&self, other: &Self) -> Self {
                Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
            }

            pub fn sub(&self, other: &Self) -> Self {
                //! subtract other from self, slot by slot.
                Self(self.0 - other.0, self.1 - other.1, self.2 - other.2)
            }

            pub fn scale(&self, scale_factor: f64) -> Self {
                Self(
                    self.0 * scale_factor,
                    self.1 * scale_factor,
                    self.2 * scale_factor,
                )
            }

            pub fn sum_of_squares(&self) -> f64 {
                self.0 * self.0 + self.1 * self.1 + self.2 * self.2
            }

            pub fn magnitude(&self) -> f64 {
                //! e.g. (3, 4, 0).magnitude() == 5.
                self.sum_of_squares().sqrt()
            }
        }
    };
}

keyed_triple!(
    /// one value per translation axis, in X, Y, Z order.
    AxisTriple,
    Axis,
    Axis::X,
    Axis::Y,
    Axis::Z
);

keyed_triple!(
    /// one value per attitude angle, in roll, pitch, yaw order.
    AngleTriple,
    Angle,
    Angle::Roll,
    Angle::Pitch,
    Angle::Yaw
);
