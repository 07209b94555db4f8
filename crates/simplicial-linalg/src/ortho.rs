//! Orthogonal complements and Gram-Schmidt orthogonalization.

use itertools::Itertools;
use tinyvec::TinyVec;

use crate::{back_substitute, decompose_lup, MatrixView, MatrixViewMut, Real, Vector};

/// Scratch space for an `n`x`N` row-major copy of the input vectors.
type Scratch<T> = TinyVec<[T; 64]>;

/// Column-pivoted LU decomposition of the matrix whose rows are `bases`.
///
/// Returns [`None`] if the vectors are linearly dependent.
fn decompose_rows<T: Real, const N: usize>(
    bases: &[Vector<T, N>],
) -> Option<(Scratch<T>, [usize; N])> {
    let n = bases.len();
    let mut lu: Scratch<T> = bases.iter().flat_map(|b| b.into_array()).collect();
    let mut permutation = [0; N];
    let info = decompose_lup(
        &mut MatrixViewMut::row_major(&mut lu, n, N),
        &mut permutation,
    );
    if info.is_singular() {
        log::trace!("{n} vectors in {N}-space are linearly dependent ({info:?})");
        return None;
    }
    Some((lu, permutation))
}

/// Computes the null vector belonging to free column `free` of a decomposed `n`x`N` matrix.
///
/// The free coordinate is fixed to one, the leading `n` coordinates follow from the
/// nonsingular leading block of `U`.
fn null_vector<T: Real, const N: usize>(
    lu: &[T],
    permutation: &[usize; N],
    n: usize,
    free: usize,
) -> Vector<T, N> {
    let u = MatrixView::row_major(lu, n, N);
    let mut y = Vector::<T, N>::ZERO;
    for row in 0..n {
        y[row] = -u[(row, free)];
    }
    y[free] = T::ONE;

    let block = MatrixView::with_strides(lu, n, n, N, 1);
    back_substitute(
        &block,
        &mut MatrixViewMut::col_major(&mut y.as_mut_slice()[..n], n, 1),
        0,
    );

    let mut out = Vector::ZERO;
    for (i, &p) in permutation.iter().enumerate() {
        out[p] = y[i];
    }
    out
}

/// Returns a vector orthogonal to all `N - 1` vectors in `bases`.
///
/// In 2 and 3 dimensions this is the perpendicular and the cross product, respectively. The
/// length of the result is unspecified in higher dimensions. Linearly dependent inputs yield the
/// zero vector.
///
/// # Examples
///
/// ```
/// # use simplicial_linalg::*;
/// let n = orthogonal(&[vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)]);
/// assert_eq!(n, [0.0, 0.0, 1.0]);
/// ```
pub fn orthogonal<T: Real, const N: usize>(bases: &[Vector<T, N>]) -> Vector<T, N> {
    assert_eq!(
        bases.len() + 1,
        N,
        "need {} vectors to find an orthogonal vector in {N}-space, got {}",
        N.saturating_sub(1),
        bases.len()
    );

    match N {
        2 => {
            let v = bases[0];
            let mut out = Vector::ZERO;
            out[0] = -v[1];
            out[1] = v[0];
            out
        }
        3 => {
            let (a, b) = (bases[0], bases[1]);
            let mut out = Vector::ZERO;
            out[0] = a[1] * b[2] - a[2] * b[1];
            out[1] = a[2] * b[0] - a[0] * b[2];
            out[2] = a[0] * b[1] - a[1] * b[0];
            out
        }
        _ => match decompose_rows(bases) {
            Some((lu, permutation)) => null_vector(&lu, &permutation, N - 1, N - 1),
            None => Vector::ZERO,
        },
    }
}

/// Fills `out` with `N - n` vectors orthogonal to the `n` vectors in `bases`.
///
/// Together with `bases`, the output spans the whole space. The output vectors are not orthogonal
/// to each other; run [`orthogonalize`] on them if that is needed. If `bases` is linearly
/// dependent, `out` is filled with zero vectors.
///
/// # Panics
///
/// Panics if `bases` has `N` or more vectors, or if `out` does not have room for exactly `N - n`
/// vectors.
pub fn nullspace<T: Real, const N: usize>(bases: &[Vector<T, N>], out: &mut [Vector<T, N>]) {
    let n = bases.len();
    assert!(n < N, "{n} vectors have no orthogonal complement in {N}-space");
    assert_eq!(out.len(), N - n, "nullspace of {n} vectors in {N}-space has {} vectors", N - n);

    if n + 1 == N {
        out[0] = orthogonal(bases);
        return;
    }

    match decompose_rows(bases) {
        Some((lu, permutation)) => {
            for (free, v) in (n..N).zip_eq(out.iter_mut()) {
                *v = null_vector(&lu, &permutation, n, free);
            }
        }
        None => out.fill(Vector::ZERO),
    }
}

/// Makes the vectors in `bases` mutually orthogonal using modified Gram-Schmidt.
///
/// `bases[0]` is left untouched and every later vector has the projection onto all earlier
/// (already orthogonalized) vectors removed. Zero vectors are left as they are and do not affect
/// the others.
pub fn orthogonalize<T: Real, const N: usize>(bases: &mut [Vector<T, N>]) {
    if N == 2 && bases.len() == 2 && bases[0].length2() != T::ZERO {
        let mut perp = Vector::ZERO;
        perp[0] = -bases[0][1];
        perp[1] = bases[0][0];
        bases[1] = bases[1].project_on(perp);
        return;
    }

    for i in 1..bases.len() {
        let (done, rest) = bases.split_at_mut(i);
        let v = &mut rest[0];
        for &prev in done.iter() {
            *v -= v.project_on(prev);
        }
    }
}

/// Like [`orthogonalize`], but additionally scales every nonzero vector to unit length.
pub fn orthonormalize<T: Real, const N: usize>(bases: &mut [Vector<T, N>]) {
    orthogonalize(bases);
    for v in bases.iter_mut().filter(|v| v.length2() != T::ZERO) {
        *v = v.normalize();
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use itertools::Itertools;

    use crate::{vec2, vec3, Vector};

    use super::*;

    fn random_vectors<const N: usize>(
        rng: &mut fastrand::Rng,
        count: usize,
    ) -> Vec<Vector<f64, N>> {
        (0..count)
            .map(|_| Vector::from_fn(|_| rng.f64() * 2.0 - 1.0))
            .collect()
    }

    #[test]
    fn closed_forms() {
        assert_eq!(orthogonal(&[vec2(1.0, 2.0)]), [-2.0, 1.0]);
        assert_eq!(
            orthogonal(&[vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)]),
            [0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn orthogonal_4d() {
        let bases = [
            Vector::from([1.0, 0.0, 0.0, 0.0]),
            Vector::from([0.0, 0.0, 1.0, 0.0]),
            Vector::from([0.0, 0.0, 0.0, 1.0]),
        ];
        let n = orthogonal(&bases);
        assert_abs_diff_eq!(n, Vector::from([0.0, 1.0, 0.0, 0.0]), epsilon = 1e-12);
    }

    #[test]
    fn dependent_inputs_give_zero() {
        let mut out = [Vector::from([1.0; 5]); 3];
        nullspace(
            &[Vector::from([1.0, 2.0, 3.0, 4.0, 5.0]), Vector::from([2.0, 4.0, 6.0, 8.0, 10.0])],
            &mut out,
        );
        assert_eq!(out, [Vector::<f64, 5>::ZERO; 3]);

        let v = vec3(1.0, 1.0, 0.0);
        assert_eq!(orthogonal(&[v, v * 2.0]), vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn nullspace_is_orthogonal() {
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..50 {
            for n in 1..6 {
                let bases = random_vectors::<6>(&mut rng, n);
                let mut out = vec![Vector::ZERO; 6 - n];
                nullspace(&bases, &mut out);
                for (b, v) in bases.iter().cartesian_product(&out) {
                    assert!(v.length() > 0.0);
                    let cos = b.dot(*v) / (b.length() * v.length());
                    assert_abs_diff_eq!(cos, 0.0, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn gram_schmidt() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..50 {
            let mut bases = random_vectors::<5>(&mut rng, 4);
            let first = bases[0];
            orthonormalize(&mut bases);
            assert_relative_eq!(bases[0], first.normalize(), epsilon = 1e-12);
            for (a, b) in bases.iter().tuple_combinations() {
                assert_abs_diff_eq!(a.dot(*b), 0.0, epsilon = 1e-9);
            }
            for v in &bases {
                assert_relative_eq!(v.length(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn gram_schmidt_2d() {
        let mut bases = [vec2(2.0, 0.0), vec2(3.0, 4.0)];
        orthogonalize(&mut bases);
        assert_eq!(bases, [vec2(2.0, 0.0), vec2(0.0, 4.0)]);
    }

    #[test]
    fn zero_vectors_are_kept() {
        let mut bases = [vec3(0.0, 0.0, 0.0), vec3(1.0, 2.0, 3.0), vec3(1.0, 2.0, 3.0)];
        orthonormalize(&mut bases);
        assert_eq!(bases[0], vec3(0.0, 0.0, 0.0));
        assert_relative_eq!(bases[1].length(), 1.0, epsilon = 1e-12);
        assert_eq!(bases[2], vec3(0.0, 0.0, 0.0));

        let mut pair = [vec2(0.0, 0.0), vec2(3.0, 4.0)];
        orthogonalize(&mut pair);
        assert_eq!(pair, [vec2(0.0, 0.0), vec2(3.0, 4.0)]);
    }
}
