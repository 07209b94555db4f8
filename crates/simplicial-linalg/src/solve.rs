//! Triangular substitution and linear system solving on top of the LU decompositions.

use tinyvec::TinyVec;

use crate::{decompose_plu, LinalgError, MatrixMut, MatrixRef, MatrixViewMut, Real, Vector};

/// Solves `Ly = x` in place, where `L` is the unit-lower-triangle packed into `lu`.
pub fn forward_substitute<T: Real>(
    lu: &(impl MatrixRef<T> + ?Sized),
    x: &mut (impl MatrixMut<T> + ?Sized),
) {
    let n = lu.rows();
    for j in 0..x.cols() {
        for row in 1..n {
            let mut acc = x[(row, j)];
            for k in 0..row {
                acc = (-lu[(row, k)]).mul_add(x[(k, j)], acc);
            }
            x[(row, j)] = acc;
        }
    }
}

/// Solves `Uy = x` in place for rows `skip..n`, where `U` is the upper triangle packed into `lu`.
///
/// Rows above `skip` are left untouched and do not take part in the substitution. This lets a
/// caller fix the leading components of a solution up front.
pub fn back_substitute<T: Real>(
    lu: &(impl MatrixRef<T> + ?Sized),
    x: &mut (impl MatrixMut<T> + ?Sized),
    skip: usize,
) {
    let n = lu.rows();
    for j in 0..x.cols() {
        for row in (skip..n).rev() {
            let mut acc = x[(row, j)];
            for k in row + 1..n {
                acc = (-lu[(row, k)]).mul_add(x[(k, j)], acc);
            }
            x[(row, j)] = acc / lu[(row, row)];
        }
    }
}

/// Runs forward substitution followed by back substitution on an already permuted right-hand side.
pub fn backsolve_in_place<T: Real>(
    lu: &(impl MatrixRef<T> + ?Sized),
    x: &mut (impl MatrixMut<T> + ?Sized),
    skip: usize,
) {
    forward_substitute(lu, x);
    back_substitute(lu, x, skip);
}

/// Solves `MX = B` given the packed row-pivoted decomposition `PM = LU`.
///
/// `rhs` holds `B` and is left unchanged; the solution is written to `out`. Row `i` of `out`
/// starts out as row `permutation[i]` of `rhs`. Only rows `skip..n` of the solution are
/// computed by back substitution (see [`back_substitute`]).
///
/// # Panics
///
/// Panics if the shapes of `lu`, `permutation`, `rhs` and `out` disagree.
pub fn backsolve<T: Real>(
    lu: &(impl MatrixRef<T> + ?Sized),
    permutation: &[usize],
    rhs: &(impl MatrixRef<T> + ?Sized),
    out: &mut (impl MatrixMut<T> + ?Sized),
    skip: usize,
) {
    let n = lu.rows();
    assert_eq!(n, lu.cols(), "backsolve requires a square decomposition");
    assert_eq!(permutation.len(), n, "permutation length does not match the matrix");
    assert_eq!(rhs.rows(), n, "right-hand side has the wrong number of rows");
    assert_eq!(
        (out.rows(), out.cols()),
        (rhs.rows(), rhs.cols()),
        "output shape does not match the right-hand side"
    );

    for (row, &src) in permutation.iter().enumerate() {
        for j in 0..rhs.cols() {
            out[(row, j)] = rhs[(src, j)];
        }
    }
    backsolve_in_place(lu, out, skip);
}

/// Reorders the rows of `m` so that row `i` becomes the former row `permutation[i]`.
pub fn permute_rows<T: Real>(m: &mut (impl MatrixMut<T> + ?Sized), permutation: &[usize]) {
    assert_eq!(permutation.len(), m.rows(), "permutation length does not match the matrix");

    let mut column: TinyVec<[T; 32]> = TinyVec::new();
    for j in 0..m.cols() {
        column.clear();
        column.extend(permutation.iter().map(|&src| m[(src, j)]));
        for (row, value) in column.iter().enumerate() {
            m[(row, j)] = *value;
        }
    }
}

/// Solves `MX = B` in place.
///
/// `m` is destroyed (it ends up holding its packed LU factors) and `x` is overwritten with the
/// solution. When `skip` is nonzero, the first `skip` rows of the solution are left as garbage.
///
/// # Errors
///
/// Returns [`LinalgError::Singular`] if the decomposition finds a zero pivot.
///
/// # Examples
///
/// ```
/// # use simplicial_linalg::*;
/// let mut m = Matrix::from_rows([
///     [4.0, -2.0],
///     [1.0, 1.0],
/// ]);
/// let mut x = Matrix::from_columns([[2.0, 3.0]]);
/// linear_solve(&mut m, &mut x, 0).unwrap();
/// assert!((x[(0, 0)] - 4.0 / 3.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 5.0 / 3.0).abs() < 1e-12);
/// ```
pub fn linear_solve<T: Real>(
    m: &mut (impl MatrixMut<T> + ?Sized),
    x: &mut (impl MatrixMut<T> + ?Sized),
    skip: usize,
) -> Result<(), LinalgError> {
    let n = m.rows();
    assert_eq!(n, m.cols(), "cannot solve a non-square {n}x{} system", m.cols());
    assert_eq!(x.rows(), n, "right-hand side has the wrong number of rows");

    let mut permutation: TinyVec<[usize; 24]> = (0..n).collect();
    let info = decompose_plu(m, &mut permutation);
    if info.is_singular() {
        log::trace!("linear_solve: {n}x{n} system is singular ({info:?})");
        return Err(LinalgError::Singular {
            degenerate: info.degenerate,
        });
    }

    permute_rows(x, &permutation);
    backsolve_in_place(&*m, x, skip);
    Ok(())
}

/// Solves `Σ bases[i] * x[i] = b` for `x`, overwriting `b` with the solution.
///
/// The vectors in `bases` are the columns of the system matrix and are destroyed.
pub fn solve_vectors<T: Real, const N: usize>(
    bases: &mut [Vector<T, N>],
    b: &mut Vector<T, N>,
    skip: usize,
) -> Result<(), LinalgError> {
    assert_eq!(bases.len(), N, "{N}-dimensional system needs {N} basis vectors");
    linear_solve(
        &mut MatrixViewMut::from_columns(bases),
        &mut MatrixViewMut::col_major(b.as_mut_slice(), N, 1),
        skip,
    )
}
