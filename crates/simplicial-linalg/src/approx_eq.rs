//! Approximate equality via the [`approx`] crate.
//!
//! [`Vector`] and [`Matrix`] compare element-wise: two values are approximately equal if every
//! pair of corresponding elements is. This makes `assert_relative_eq!` and friends work on whole
//! vectors and matrices:
//!
//! ```
//! # use simplicial_linalg::*;
//! use approx::assert_relative_eq;
//!
//! assert_relative_eq!(vec2(1.0, 0.1 + 0.2), vec2(1.0, 0.3));
//! ```

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use crate::{Matrix, Vector};

impl<T: AbsDiffEq, const N: usize> AbsDiffEq for Vector<T, N>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        (0..N).all(|i| self[i].abs_diff_eq(&other[i], epsilon))
    }
}

impl<T: RelativeEq, const N: usize> RelativeEq for Vector<T, N>
where
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        (0..N).all(|i| self[i].relative_eq(&other[i], epsilon, max_relative))
    }
}

impl<T: UlpsEq, const N: usize> UlpsEq for Vector<T, N>
where
    T::Epsilon: Copy,
{
    fn default_max_ulps() -> u32 {
        T::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        (0..N).all(|i| self[i].ulps_eq(&other[i], epsilon, max_ulps))
    }
}

/// Visits every `(row, col)` position of an `R`x`C` matrix.
fn positions<const R: usize, const C: usize>() -> impl Iterator<Item = (usize, usize)> {
    (0..C).flat_map(|col| (0..R).map(move |row| (row, col)))
}

impl<T: AbsDiffEq, const R: usize, const C: usize> AbsDiffEq for Matrix<T, R, C>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        positions::<R, C>().all(|pos| self[pos].abs_diff_eq(&other[pos], epsilon))
    }
}

impl<T: RelativeEq, const R: usize, const C: usize> RelativeEq for Matrix<T, R, C>
where
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        positions::<R, C>().all(|pos| self[pos].relative_eq(&other[pos], epsilon, max_relative))
    }
}

impl<T: UlpsEq, const R: usize, const C: usize> UlpsEq for Matrix<T, R, C>
where
    T::Epsilon: Copy,
{
    fn default_max_ulps() -> u32 {
        T::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        positions::<R, C>().all(|pos| self[pos].ulps_eq(&other[pos], epsilon, max_ulps))
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_ulps_eq};

    use crate::{vec3, Mat2d, Matrix};

    #[test]
    fn vectors() {
        assert_abs_diff_eq!(vec3(1.0, 2.0, 3.0), vec3(1.0, 2.0, 3.0 + 1e-9), epsilon = 1e-8);
        assert_abs_diff_ne!(vec3(1.0, 2.0, 3.0), vec3(1.0, 2.1, 3.0), epsilon = 1e-8);
        assert_relative_eq!(vec3(1e6, 0.0, 0.0), vec3(1e6 + 1e-4, 0.0, 0.0), max_relative = 1e-9);
        assert_ulps_eq!(vec3(0.1f32 + 0.2, 0.0, 1.0), vec3(0.3f32, 0.0, 1.0));
    }

    #[test]
    fn matrices() {
        let a = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0 + 1e-12]]);
        assert_relative_eq!(a, b, epsilon = 1e-10);
        assert_abs_diff_ne!(a, Mat2d::identity());
    }
}
