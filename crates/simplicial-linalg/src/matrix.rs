use std::{array, fmt};

use crate::{lu::Plu, Number, One, Real, Vector, Zero};

mod ops;

pub type Mat2<T> = Matrix<T, 2, 2>;
pub type Mat2d = Mat2<f64>;
pub type Mat3<T> = Matrix<T, 3, 3>;
pub type Mat3d = Mat3<f64>;

/// A dense `R`x`C` matrix stored column by column.
///
/// Elements are indexed with `(row, col)` tuples. `Matrix` also implements [`MatrixRef`] and
/// [`MatrixMut`], so the factorizations accept it directly:
///
/// ```
/// # use simplicial_linalg::*;
/// let mut m = Matrix::from_rows([
///     [0.0, 2.0],
///     [3.0, 1.0],
/// ]);
/// let mut perm = [0; 2];
/// let info = decompose_plu(&mut m, &mut perm);
/// assert_eq!(perm, [1, 0]);
/// assert!(info.odd_parity);
/// assert_eq!(m[(0, 0)], 3.0);
/// ```
///
/// [`MatrixRef`]: crate::MatrixRef
/// [`MatrixMut`]: crate::MatrixMut
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Matrix<T, const R: usize, const C: usize>([[T; R]; C]);

unsafe impl<T: bytemuck::Zeroable, const R: usize, const C: usize> bytemuck::Zeroable
    for Matrix<T, R, C>
{
}
unsafe impl<T: bytemuck::Pod, const R: usize, const C: usize> bytemuck::Pod for Matrix<T, R, C> {}

impl<T: Zero + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    pub const ZERO: Self = Self([[T::ZERO; R]; C]);
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Builds a matrix from its rows.
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// let rows = Matrix::from_rows([[0.0, 1.0], [2.0, 3.0]]);
    /// let cols = Matrix::from_columns([[0.0, 2.0], [1.0, 3.0]]);
    /// assert_eq!(rows, cols);
    /// ```
    pub fn from_rows<V: Into<Vector<T, C>>>(rows: [V; R]) -> Self
    where
        T: Copy,
    {
        let rows: [Vector<T, C>; R] = rows.map(Into::into);
        Self::from_fn(|row, col| rows[row][col])
    }

    /// Builds a matrix from its columns.
    pub fn from_columns<V: Into<Vector<T, R>>>(columns: [V; C]) -> Self {
        Self(columns.map(|col| col.into().into_array()))
    }

    /// Builds a matrix by calling `f(row, col)` for every element.
    pub fn from_fn<F: FnMut(usize, usize) -> T>(mut f: F) -> Self {
        Self(array::from_fn(|col| array::from_fn(|row| f(row, col))))
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Matrix<U, R, C> {
        Matrix(self.0.map(|col| col.map(&mut f)))
    }

    pub fn transpose(self) -> Matrix<T, C, R>
    where
        T: Copy,
    {
        Matrix::from_fn(|row, col| self[(col, row)])
    }

    pub fn column(&self, col: usize) -> Vector<T, R>
    where
        T: Copy,
    {
        Vector::from(self.0[col])
    }

    pub fn row(&self, row: usize) -> Vector<T, C>
    where
        T: Copy,
    {
        Vector::from_fn(|col| self[(row, col)])
    }
}

impl<T: Zero + One + Copy, const N: usize> Matrix<T, N, N> {
    /// Returns the identity matrix: 1 on the diagonal, 0 everywhere else.
    pub fn identity() -> Self {
        Self::from_fn(|row, col| if row == col { T::ONE } else { T::ZERO })
    }
}

impl<T: Real, const N: usize> Matrix<T, N, N> {
    /// Computes the row-pivoted LU decomposition of this matrix.
    ///
    /// See [`Plu`] for what can be derived from it (determinant, solutions, inverse).
    ///
    /// # Examples
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// let m = Matrix::from_rows([
    ///     [0.0, 2.0, 1.0],
    ///     [1.0, 1.0, 0.0],
    ///     [3.0, 0.0, 1.0],
    /// ]);
    /// let plu = m.plu();
    /// assert!(!plu.is_singular());
    /// assert!((plu.determinant() - m.determinant()).abs() < 1e-12);
    /// ```
    pub fn plu(self) -> Plu<T, N> {
        Plu::new(self)
    }
}

impl<T: Number> Matrix<T, 1, 1> {
    #[inline]
    pub fn determinant(&self) -> T {
        self[(0, 0)]
    }

    /// Returns the inverse, or [`None`] if the only element is zero.
    pub fn try_invert(&self) -> Option<Self> {
        match self.determinant() {
            det if det == T::ZERO => None,
            det => Some(Matrix([[T::ONE / det]])),
        }
    }
}

impl<T: Number> Matrix<T, 2, 2> {
    #[inline]
    pub fn determinant(&self) -> T {
        let [[a, c], [b, d]] = self.0;
        a * d - b * c
    }

    /// Returns the inverse, or [`None`] if the matrix is singular.
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// let m = Matrix::from_rows([[2.0, 0.0], [0.0, 4.0]]);
    /// assert_eq!(m.try_invert(), Some(Matrix::from_rows([[0.5, 0.0], [0.0, 0.25]])));
    /// assert_eq!(Mat2d::ZERO.try_invert(), None);
    /// ```
    pub fn try_invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det == T::ZERO {
            return None;
        }
        let [[a, c], [b, d]] = self.0;
        Some(Matrix([[d, -c], [-b, a]]) * (T::ONE / det))
    }
}

impl<T: Number> Matrix<T, 3, 3> {
    /// Computes the determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> T {
        let [[a, d, g], [b, e, h], [c, f, i]] = self.0;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    /// Returns the inverse (the scaled adjugate), or [`None`] if the matrix is singular.
    pub fn try_invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det == T::ZERO {
            return None;
        }

        let [[a, d, g], [b, e, h], [c, f, i]] = self.0;
        #[rustfmt::skip]
        let adjugate = Matrix::from_rows([
            [e * i - f * h, c * h - b * i, b * f - c * e],
            [f * g - d * i, a * i - c * g, c * d - a * f],
            [d * h - e * g, b * g - a * h, a * e - b * d],
        ]);
        Some(adjugate * (T::ONE / det))
    }
}

macro_rules! panicking_invert {
    ($($n:literal),+) => {$(
        impl<T: Number> Matrix<T, $n, $n> {
            /// Returns the inverse of this matrix.
            ///
            /// # Panics
            ///
            /// Panics if the matrix is singular. Use `try_invert` to handle that case.
            pub fn invert(&self) -> Self {
                match self.try_invert() {
                    Some(inverse) => inverse,
                    None => panic!("attempt to invert a non-invertible {}x{} matrix", $n, $n),
                }
            }
        }
    )+};
}

panicking_invert!(2, 3);

/// Formats the matrix as a list of its rows.
impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..R).map(|row| (0..C).map(|col| &self[(row, col)]).collect::<Vec<_>>());
        f.debug_list().entries(rows).finish()
    }
}

impl<T: Default, const R: usize, const C: usize> Default for Matrix<T, R, C> {
    fn default() -> Self {
        Self::from_fn(|_, _| T::default())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::vec2;

    use super::*;

    #[test]
    fn from_rows_columns() {
        assert_eq!(
            Matrix::<f64, 2, 3>::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            Matrix::<f64, 2, 3>::from_columns([[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]),
        );

        // column-major elements, no padding
        let mats = [Mat2d::from_rows([[0.0, 1.0], [2.0, 3.0]]), Mat2d::identity()];
        let flat: &[f64] = bytemuck::cast_slice(&mats);
        assert_eq!(flat, [0.0, 2.0, 1.0, 3.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn fmt() {
        let mat = Matrix::from_rows([[0.0, 1.0], [2.0, 3.0]]);
        assert_eq!(format!("{:?}", mat), "[[0.0, 1.0], [2.0, 3.0]]");
        assert_eq!(format!("{:?}", Mat2d::identity()), "[[1.0, 0.0], [0.0, 1.0]]");
    }

    #[test]
    fn mat_vec_mul() {
        let mat = Matrix::from_rows([[0.0, 1.0], [2.0, 3.0]]);
        let out = mat * vec2(4.0, 5.0);
        assert_eq!(out, [5.0, 23.0]);
    }

    #[test]
    fn mat_mat_mul() {
        #[rustfmt::skip]
        let a = Matrix::from_rows([
            [1.0, 2.0],
            [3.0, 4.0],
            [5.0, 6.0],
        ]);
        #[rustfmt::skip]
        let b = Matrix::from_rows([
            [ 9.0, 10.0, 11.0],
            [12.0, 13.0, 14.0],
        ]);
        let c = a * b;
        assert_eq!(c[(0, 1)], a[(0, 0)] * b[(0, 1)] + a[(0, 1)] * b[(1, 1)]);
        assert_eq!(c[(2, 2)], a[(2, 0)] * b[(0, 2)] + a[(2, 1)] * b[(1, 2)]);
    }

    #[test]
    fn determinant() {
        assert_eq!(Mat2d::ZERO.determinant(), 0.0);
        assert_eq!(Mat3d::ZERO.determinant(), 0.0);
        assert_eq!(Mat3d::identity().determinant(), 1.0);

        #[rustfmt::skip]
        let testmat = Matrix::from_rows([
            [-2.0, -1.0,  2.0],
            [ 2.0,  1.0,  4.0],
            [-3.0,  3.0, -1.0],
        ]);
        assert_eq!(testmat.determinant(), 54.0);
        assert_eq!(testmat.transpose().determinant(), 54.0);
        assert_relative_eq!(testmat.plu().determinant(), 54.0, epsilon = 1e-12);
    }

    #[test]
    fn invert_small() {
        #[rustfmt::skip]
        let m = Matrix::from_rows([
            [4.0, 7.0, 2.0],
            [3.0, 6.0, 1.0],
            [2.0, 5.0, 3.0],
        ]);
        let inv = m.invert();
        assert_relative_eq!(m * inv, Mat3d::identity(), epsilon = 1e-12);
        assert_relative_eq!(inv, m.plu().inverse().unwrap(), epsilon = 1e-12);

        let m2 = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        assert_relative_eq!(m2.invert() * m2, Mat2d::identity(), epsilon = 1e-12);

        assert_eq!(Matrix([[0.0f64]]).try_invert(), None);
        assert_eq!(Matrix([[4.0f64]]).try_invert(), Some(Matrix([[0.25]])));
    }

    #[test]
    #[should_panic(expected = "non-invertible")]
    fn invert_singular_panics() {
        Matrix::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]]).invert();
    }
}
