use std::{fmt, ops};

/// Types that support computing their square root.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Types that have an absolute value.
pub trait Abs {
    fn abs(self) -> Self;
}

/// Types that support a fused multiply-add (`self * a + b` with a single rounding step).
pub trait MulAdd {
    fn mul_add(self, a: Self, b: Self) -> Self;
}

/// Types that have a "zero" value (an additive identity).
pub trait Zero {
    /// The *0* value of this type.
    const ZERO: Self;
}

/// Types that have a "one" value (a multiplicative identity).
pub trait One {
    /// The *1* value of this type.
    const ONE: Self;
}

/// A trait for numeric types that support basic arithmetic operations.
pub trait Number:
    Zero
    + One
    + ops::Neg<Output = Self>
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + PartialEq
    + Copy
{
}
impl<T> Number for T where
    T: Zero
        + One
        + ops::Neg<Output = Self>
        + ops::Add<Output = Self>
        + ops::Sub<Output = Self>
        + ops::Mul<Output = Self>
        + ops::Div<Output = Self>
        + PartialEq
        + Copy
{
}

/// Floating-point scalars the factorization and geometry code operates on.
///
/// Implemented for [`f32`] and [`f64`]. The [`bytemuck::Pod`] bound lets arrays of [`Vector`]s
/// be reinterpreted as flat element buffers, and [`Default`] lets scratch space live in
/// [`tinyvec::TinyVec`] small buffers.
///
/// [`Vector`]: crate::Vector
pub trait Real:
    Number
    + Sqrt
    + Abs
    + MulAdd
    + PartialOrd
    + ops::AddAssign
    + ops::SubAssign
    + ops::MulAssign
    + ops::DivAssign
    + Default
    + fmt::Debug
    + bytemuck::Pod
    + Send
    + Sync
{
}

macro_rules! real_impls {
    ($($ty:ty),+) => {
        $(
            impl Zero for $ty {
                const ZERO: Self = 0.0;
            }

            impl One for $ty {
                const ONE: Self = 1.0;
            }

            impl Sqrt for $ty {
                #[inline]
                fn sqrt(self) -> Self {
                    <$ty>::sqrt(self)
                }
            }

            impl Abs for $ty {
                #[inline]
                fn abs(self) -> Self {
                    <$ty>::abs(self)
                }
            }

            impl MulAdd for $ty {
                #[inline]
                fn mul_add(self, a: Self, b: Self) -> Self {
                    <$ty>::mul_add(self, a, b)
                }
            }

            impl Real for $ty {}
        )+
    };
}
real_impls!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fused() {
        assert_eq!(MulAdd::mul_add(2.0f64, 3.0, 1.0), 7.0);
        assert_eq!(Abs::abs(-2.5f32), 2.5);
        assert_eq!(Sqrt::sqrt(16.0f64), 4.0);
    }
}
