//! [LU decomposition] with partial pivoting.
//!
//! Both variants overwrite the input matrix with the packed factors: the strictly lower triangle
//! holds the multipliers of the unit-lower-triangular `L`, the diagonal and everything above it
//! hold `U`.
//!
//! - [`decompose_plu`] pivots rows and computes `PM = LU`.
//! - [`decompose_lup`] pivots columns and computes `MP = LU`.
//!
//! A column without a nonzero pivot candidate is counted as *degenerate* and skipped; the
//! decomposition carries on with the next column. Callers decide what a rank-deficient result
//! means for them by inspecting [`LuInfo`].
//!
//! [LU decomposition]: https://en.wikipedia.org/wiki/LU_decomposition

use tinyvec::TinyVec;

use crate::{backsolve, Matrix, MatrixMut, MatrixView, MatrixViewMut, Number, Real, Vector};

/// Outcome of an LU decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LuInfo {
    /// Number of elimination steps that found no nonzero pivot. `0` means full rank.
    pub degenerate: usize,
    /// Whether an odd number of row (or column) swaps was performed.
    pub odd_parity: bool,
}

impl LuInfo {
    /// Returns whether any pivot was missing.
    #[inline]
    pub fn is_singular(&self) -> bool {
        self.degenerate > 0
    }

    /// Returns the determinant of the permutation matrix, `-1` for odd parity and `1` otherwise.
    #[inline]
    pub fn sign<T: Number>(&self) -> T {
        if self.odd_parity {
            -T::ONE
        } else {
            T::ONE
        }
    }
}

fn reset(permutation: &mut [usize]) {
    for (i, p) in permutation.iter_mut().enumerate() {
        *p = i;
    }
}

/// Returns the index and magnitude of the largest-magnitude candidate, preferring the first.
fn largest<T: Real>(candidates: impl Iterator<Item = (usize, T)>, first: usize) -> (usize, T) {
    candidates
        .map(|(i, v)| (i, v.abs()))
        .fold((first, T::ZERO), |best, cur| if cur.1 > best.1 { cur } else { best })
}

/// Subtracts multiples of row `i` from the rows below it, storing the multipliers in column `i`.
fn eliminate_below<T: Real, M: MatrixMut<T> + ?Sized>(m: &mut M, i: usize) {
    let diag = m[(i, i)];
    for row in i + 1..m.rows() {
        let factor = m[(row, i)] / diag;
        m[(row, i)] = factor;
        for col in i + 1..m.cols() {
            m[(row, col)] = (-factor).mul_add(m[(i, col)], m[(row, col)]);
        }
    }
}

/// Decomposes `m` in place into `PM = LU`, pivoting on rows.
///
/// `permutation` must have one entry per row of `m`. Afterwards, row `i` of `PM` is row
/// `permutation[i]` of the original `m`.
///
/// # Examples
///
/// ```
/// # use simplicial_linalg::*;
/// let mut m = Matrix::from_rows([
///     [1.0, 2.0],
///     [2.0, 4.0],
/// ]);
/// let mut perm = [0; 2];
/// let info = decompose_plu(&mut m, &mut perm);
/// assert_eq!(info.degenerate, 1);
/// assert_eq!(perm, [1, 0]);
/// assert!(info.odd_parity);
/// ```
pub fn decompose_plu<T: Real, M: MatrixMut<T> + ?Sized>(
    m: &mut M,
    permutation: &mut [usize],
) -> LuInfo {
    let (rows, cols) = (m.rows(), m.cols());
    assert_eq!(
        permutation.len(),
        rows,
        "row permutation needs one entry per row of a {rows}x{cols} matrix"
    );
    reset(permutation);

    let mut info = LuInfo::default();
    for i in 0..rows.min(cols) {
        let (pivot, magnitude) = largest((i..rows).map(|row| (row, m[(row, i)])), i);
        if magnitude == T::ZERO {
            info.degenerate += 1;
            continue;
        }
        if pivot != i {
            m.swap_rows(i, pivot);
            permutation.swap(i, pivot);
            info.odd_parity = !info.odd_parity;
        }
        eliminate_below(m, i);
    }

    if info.is_singular() {
        log::trace!(
            "PLU decomposition of {rows}x{cols} matrix: {} degenerate column(s)",
            info.degenerate
        );
    }
    info
}

/// Decomposes `m` in place into `MP = LU`, pivoting on columns.
///
/// `permutation` must have one entry per column of `m`. Afterwards, column `i` of `MP` is column
/// `permutation[i]` of the original `m`.
///
/// Column pivoting suits wide matrices: for an `n`x`N` matrix with `n < N`, the leading `n`x`n`
/// block of `U` is nonsingular exactly when the rows of `m` are linearly independent.
pub fn decompose_lup<T: Real, M: MatrixMut<T> + ?Sized>(
    m: &mut M,
    permutation: &mut [usize],
) -> LuInfo {
    let (rows, cols) = (m.rows(), m.cols());
    assert_eq!(
        permutation.len(),
        cols,
        "column permutation needs one entry per column of a {rows}x{cols} matrix"
    );
    reset(permutation);

    let mut info = LuInfo::default();
    for i in 0..rows.min(cols) {
        let (pivot, magnitude) = largest((i..cols).map(|col| (col, m[(i, col)])), i);
        if magnitude == T::ZERO {
            info.degenerate += 1;
            continue;
        }
        if pivot != i {
            m.swap_cols(i, pivot);
            permutation.swap(i, pivot);
            info.odd_parity = !info.odd_parity;
        }
        eliminate_below(m, i);
    }

    if info.is_singular() {
        log::trace!(
            "LUP decomposition of {rows}x{cols} matrix: {} degenerate row(s)",
            info.degenerate
        );
    }
    info
}

/// Computes the determinant of the square matrix `m`, destroying its contents.
///
/// This is the runtime-sized counterpart of [`Plu::determinant`].
pub fn determinant<T: Real, M: MatrixMut<T> + ?Sized>(m: &mut M) -> T {
    let n = m.rows();
    assert_eq!(n, m.cols(), "determinant of non-square {n}x{} matrix", m.cols());

    let mut permutation: TinyVec<[usize; 24]> = (0..n).collect();
    let info = decompose_plu(m, &mut permutation);
    if info.is_singular() {
        return T::ZERO;
    }
    (0..n).fold(info.sign(), |det, i| det * m[(i, i)])
}

/// A row-pivoted LU decomposition of a fixed-size square matrix, `PM = LU`.
///
/// Created by [`Matrix::plu`].
#[derive(Debug, Clone, Copy)]
pub struct Plu<T, const N: usize> {
    lu: Matrix<T, N, N>,
    permutation: [usize; N],
    info: LuInfo,
}

impl<T: Real, const N: usize> Plu<T, N> {
    pub fn new(mut m: Matrix<T, N, N>) -> Self {
        let mut permutation = [0; N];
        let info = decompose_plu(&mut m, &mut permutation);
        Self {
            lu: m,
            permutation,
            info,
        }
    }

    #[inline]
    pub fn info(&self) -> LuInfo {
        self.info
    }

    #[inline]
    pub fn is_singular(&self) -> bool {
        self.info.is_singular()
    }

    /// Returns the row permutation: row `i` of `PM` is row `permutation()[i]` of `M`.
    #[inline]
    pub fn permutation(&self) -> &[usize; N] {
        &self.permutation
    }

    /// Returns the unit-lower-triangular factor `L`.
    pub fn lower(&self) -> Matrix<T, N, N> {
        Matrix::from_fn(|row, col| match row.cmp(&col) {
            std::cmp::Ordering::Greater => self.lu[(row, col)],
            std::cmp::Ordering::Equal => T::ONE,
            std::cmp::Ordering::Less => T::ZERO,
        })
    }

    /// Returns the upper-triangular factor `U`.
    pub fn upper(&self) -> Matrix<T, N, N> {
        Matrix::from_fn(|row, col| if row <= col { self.lu[(row, col)] } else { T::ZERO })
    }

    /// Returns the permutation matrix `P`.
    pub fn permutation_matrix(&self) -> Matrix<T, N, N> {
        Matrix::from_fn(|row, col| {
            if self.permutation[row] == col {
                T::ONE
            } else {
                T::ZERO
            }
        })
    }

    /// Returns the determinant of the decomposed matrix (zero if it is singular).
    pub fn determinant(&self) -> T {
        if self.is_singular() {
            return T::ZERO;
        }
        (0..N).fold(self.info.sign(), |det, i| det * self.lu[(i, i)])
    }

    /// Solves `Mx = b`, returning [`None`] if `M` is singular.
    ///
    /// # Examples
    ///
    /// ```
    /// # use simplicial_linalg::*;
    /// let m = Matrix::from_rows([
    ///     [2.0, 1.0],
    ///     [1.0, 3.0],
    /// ]);
    /// let x = m.plu().solve(vec2(3.0, 5.0)).unwrap();
    /// assert!((m * x - vec2(3.0, 5.0)).length() < 1e-12);
    /// ```
    pub fn solve(&self, b: Vector<T, N>) -> Option<Vector<T, N>> {
        if self.is_singular() {
            return None;
        }
        let mut x = Vector::ZERO;
        backsolve(
            &self.lu,
            &self.permutation,
            &MatrixView::col_major(b.as_slice(), N, 1),
            &mut MatrixViewMut::col_major(x.as_mut_slice(), N, 1),
            0,
        );
        Some(x)
    }

    /// Computes `M⁻¹`, returning [`None`] if `M` is singular.
    pub fn inverse(&self) -> Option<Matrix<T, N, N>> {
        if self.is_singular() {
            return None;
        }
        let mut inv = Matrix::ZERO;
        backsolve(
            &self.lu,
            &self.permutation,
            &Matrix::<T, N, N>::identity(),
            &mut inv,
            0,
        );
        Some(inv)
    }
}
