//! The [`Simplex`] type.

use std::ops::{BitOr, BitOrAssign, Index};

use itertools::Itertools;
use tinyvec::TinyVec;

use crate::linalg::{
    determinant, linear_solve, nullspace, orthogonal, solve_vectors, Matrix, MatrixViewMut, Real,
    Vector,
};

mod face;
mod projection;

pub use face::SimplexFace;
pub use projection::{ProjectionOp, SimplexProjection};

/// Points of a simplex. Up to 3D they are stored inline.
type Points<T, const N: usize> = TinyVec<[Vector<T, N>; 4]>;

/// A simplex with up to `N + 1` vertices in `N`-dimensional space.
///
/// A simplex with fewer than `N + 1` vertices spans a subspace of the space it is embedded in (a
/// triangle in 3D, a segment in 2D, ...). One with exactly `N + 1` vertices is *full* and
/// encloses a volume, unless it is degenerate.
///
/// # Examples
///
/// ```
/// use simplicial::{linalg::vec2, Simplex};
///
/// let tri = Simplex::from_points([vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)]);
/// assert!(tri.contains(vec2(0.25, 0.25)));
/// assert_eq!(tri.project(vec2(-1.0, -1.0)), vec2(0.0, 0.0));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Simplex<T: Real, const N: usize> {
    pts: Points<T, N>,
}

impl<T: Real, const N: usize> Simplex<T, N> {
    /// Creates an empty simplex without any vertices.
    pub fn new() -> Self {
        Self {
            pts: TinyVec::new(),
        }
    }

    /// Creates a simplex from the given vertices.
    ///
    /// Only the first `N + 1` points are used; any further points are ignored.
    pub fn from_points<I: IntoIterator<Item = Vector<T, N>>>(points: I) -> Self {
        points.into_iter().collect()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Returns whether this simplex has the maximum number of vertices, `N + 1`.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.pts.len() == N + 1
    }

    #[inline]
    pub fn points(&self) -> &[Vector<T, N>] {
        &self.pts
    }

    /// Adds `p` as a new vertex. Does nothing if the simplex is already full.
    pub fn insert(&mut self, p: Vector<T, N>) {
        if !self.is_full() {
            self.pts.push(p);
        }
    }

    /// Removes vertex `i`, shifting all later vertices down by one.
    pub fn exclude(&mut self, i: usize) {
        assert!(
            i < self.len(),
            "vertex {i} out of range for a simplex with {} vertices",
            self.len()
        );
        self.pts.remove(i);
    }

    /// Returns a copy of this simplex without vertex `i`.
    pub fn excluded(&self, i: usize) -> Self {
        let mut out = self.clone();
        out.exclude(i);
        out
    }

    /// Returns whether `p` lies inside or on the boundary of this simplex.
    ///
    /// Only full simplices have an interior: this always returns `false` if fewer than `N + 1`
    /// vertices are present, and also if the simplex is degenerate.
    pub fn contains(&self, p: Vector<T, N>) -> bool {
        if !self.is_full() {
            return false;
        }

        // Solve for the barycentric weights `x` in `Σ x[i] * (1, v[i]) = (1, p)`. The first
        // weight is implied by the others (they sum to 1), so its back substitution is skipped.
        let k = N + 1;
        let mut m: TinyVec<[T; 16]> = self
            .pts
            .iter()
            .flat_map(|v| std::iter::once(T::ONE).chain(v.into_array()))
            .collect();
        let mut x: TinyVec<[T; 4]> = std::iter::once(T::ONE).chain(p.into_array()).collect();
        let solved = linear_solve(
            &mut MatrixViewMut::col_major(&mut m, k, k),
            &mut MatrixViewMut::col_major(&mut x, k, 1),
            1,
        );
        if solved.is_err() {
            return false;
        }

        let mut sum = T::ZERO;
        for &w in &x[1..] {
            sum += w;
            if w < T::ZERO || sum > T::ONE {
                return false;
            }
        }
        true
    }

    /// Returns whether the orthogonal projection of `p` onto the subspace spanned by this
    /// simplex lies within the simplex.
    ///
    /// A point simplex contains every projection; an empty one contains none.
    pub fn projection_contains(&self, p: Vector<T, N>) -> bool {
        self.projection_params(p).map_or(false, |(inside, _)| inside)
    }

    /// Projects `p` onto the subspace spanned by this simplex and returns whether the projection
    /// lies within the simplex, along with its surface parameters.
    ///
    /// The parameters are the first `len() - 1` elements of the returned vector; the rest are
    /// zero. Parameter `i` is the coordinate of the projection along the edge from the first
    /// vertex to vertex `i + 1`, so the projected point is
    /// `self[0] + Σ params[i] * (self[i + 1] - self[0])`.
    ///
    /// Returns `None` for an empty simplex and for degenerate ones.
    ///
    /// ```
    /// # use simplicial::{Simplex, linalg::vec2};
    /// let edge = Simplex::from_points([vec2(1.0, 0.0), vec2(3.0, 0.0)]);
    /// let (inside, params) = edge.projection_params(vec2(2.5, 7.0)).unwrap();
    /// assert!(inside);
    /// assert_eq!(params, vec2(0.75, 0.0));
    /// ```
    pub fn projection_params(&self, p: Vector<T, N>) -> Option<(bool, Vector<T, N>)> {
        let pts = &self.pts;
        match pts.len() {
            0 => None,
            1 => Some((true, Vector::ZERO)),
            2 => {
                let v = pts[1] - pts[0];
                let len2 = v.length2();
                if len2 == T::ZERO {
                    return None;
                }
                let t = v.dot(p - pts[0]) / len2;
                let mut params = Vector::ZERO;
                params[0] = t;
                Some((t >= T::ZERO && t <= T::ONE, params))
            }
            n => {
                // [nullspace | spanning basis]. Only the coordinates along the spanning basis
                // are needed, so the nullspace rows are skipped.
                let n_null = N + 1 - n;
                let mut bases = [Vector::ZERO; N];
                for (b, v) in bases[n_null..].iter_mut().zip(&pts[1..]) {
                    *b = *v - pts[0];
                }
                if n_null > 0 {
                    let (null, span) = bases.split_at_mut(n_null);
                    nullspace(span, null);
                }

                let mut x = p - pts[0];
                if let Err(e) = solve_vectors(&mut bases, &mut x, n_null) {
                    log::trace!("projection onto degenerate simplex: {e}");
                    return None;
                }

                let mut params = Vector::ZERO;
                let mut sum = T::ZERO;
                let mut inside = true;
                for (i, &w) in x.as_slice()[n_null..].iter().enumerate() {
                    params[i] = w;
                    sum += w;
                    inside &= w >= T::ZERO && sum <= T::ONE;
                }
                Some((inside, params))
            }
        }
    }

    /// Returns the vertex with the largest extent in direction `d`.
    ///
    /// If several vertices are equally far, the first one is returned.
    ///
    /// # Panics
    ///
    /// Panics if the simplex is empty.
    pub fn convex_support(&self, d: Vector<T, N>) -> Vector<T, N> {
        assert!(!self.is_empty(), "empty simplex has no support point");
        let mut best = self.pts[0];
        let mut extent = best.dot(d);
        for &v in &self.pts[1..] {
            let e = v.dot(d);
            if e > extent {
                best = v;
                extent = e;
            }
        }
        best
    }

    /// Returns the signed volume of a full simplex, or zero if it is not full.
    ///
    /// The sign depends on the orientation (vertex order) of the simplex.
    pub fn volume(&self) -> T {
        if !self.is_full() {
            return T::ZERO;
        }
        let origin = self.pts[0];
        let edges = Matrix::<T, N, N>::from_fn(|row, col| self.pts[col + 1][row] - origin[row]);
        edges.plu().determinant() / factorial(N)
    }

    /// Returns the unsigned measure of this simplex within the subspace it spans.
    ///
    /// That is the length of a segment, the area of a triangle, the volume of a tetrahedron, and
    /// so on, regardless of the dimension of the embedding space. Points and empty simplices
    /// measure zero.
    pub fn measure(&self) -> T {
        let pts = &self.pts;
        match pts.len() {
            0 | 1 => T::ZERO,
            2 => pts[0].distance(pts[1]),
            3 if N == 3 => {
                let half = T::ONE / (T::ONE + T::ONE);
                orthogonal(&[pts[1] - pts[0], pts[2] - pts[0]]).length() * half
            }
            n if n == N + 1 => self.volume().abs(),
            n => {
                // square root of the Gram determinant
                let k = n - 1;
                let edges: Points<T, N> = pts[1..].iter().map(|&v| v - pts[0]).collect();
                let mut gram: TinyVec<[T; 16]> = (0..k)
                    .cartesian_product(0..k)
                    .map(|(i, j)| edges[i].dot(edges[j]))
                    .collect();
                let det = determinant(&mut MatrixViewMut::row_major(&mut gram, k, k));
                det.abs().sqrt() / factorial(k)
            }
        }
    }

    /// Runs the nearest-face search for `p`.
    ///
    /// # Panics
    ///
    /// Panics if the simplex is empty.
    pub fn projection(&self, p: Vector<T, N>, op: ProjectionOp) -> SimplexProjection<'_, T, N> {
        SimplexProjection::new(self, p, op)
    }

    /// Returns the point of this simplex nearest to `p`.
    ///
    /// Points inside a full simplex are returned unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the simplex is empty.
    pub fn project(&self, p: Vector<T, N>) -> Vector<T, N> {
        self.projection(p, ProjectionOp::Clamp).point()
    }

    /// Like [`Simplex::project`], but also returns the sub-simplex that the point projects to.
    pub fn project_with_face(&self, p: Vector<T, N>) -> (Vector<T, N>, Simplex<T, N>) {
        let proj = self.projection(p, ProjectionOp::Clamp);
        (proj.point(), proj.projected_face())
    }

    /// Returns the point on the boundary of this simplex nearest to `p`.
    ///
    /// Unlike [`Simplex::project`], points inside a full simplex are moved to its nearest wall.
    pub fn project_to_boundary(&self, p: Vector<T, N>) -> Vector<T, N> {
        self.projection(p, ProjectionOp::Boundary).point()
    }

    /// Returns the distance from `p` to the nearest point of this simplex (zero inside).
    pub fn distance(&self, p: Vector<T, N>) -> T {
        self.projection(p, ProjectionOp::Clamp).distance2().sqrt()
    }
}

/// Returns `n!` in the scalar type.
fn factorial<T: Real>(n: usize) -> T {
    let mut k = T::ONE;
    let mut f = T::ONE;
    for _ in 1..n {
        f += T::ONE;
        k *= f;
    }
    k
}

impl<T: Real, const N: usize> FromIterator<Vector<T, N>> for Simplex<T, N> {
    fn from_iter<I: IntoIterator<Item = Vector<T, N>>>(iter: I) -> Self {
        Self {
            pts: iter.into_iter().take(N + 1).collect(),
        }
    }
}

impl<T: Real, const N: usize> Index<usize> for Simplex<T, N> {
    type Output = Vector<T, N>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.pts[index]
    }
}

/// Appends a vertex (see [`Simplex::insert`]).
impl<T: Real, const N: usize> BitOr<Vector<T, N>> for Simplex<T, N> {
    type Output = Self;

    fn bitor(mut self, rhs: Vector<T, N>) -> Self {
        self.insert(rhs);
        self
    }
}

/// Appends a vertex (see [`Simplex::insert`]).
impl<T: Real, const N: usize> BitOrAssign<Vector<T, N>> for Simplex<T, N> {
    fn bitor_assign(&mut self, rhs: Vector<T, N>) {
        self.insert(rhs);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        linalg::{vec2, vec3, Vec3d},
        test::{random_vector, unit_tetrahedron, unit_triangle},
    };

    use super::*;

    #[test]
    fn building() {
        let mut s = Simplex::<f64, 2>::new();
        assert!(s.is_empty());
        s |= vec2(0.0, 0.0);
        let s = s | vec2(1.0, 0.0) | vec2(0.0, 1.0) | vec2(5.0, 5.0);
        assert!(s.is_full());
        assert_eq!(s, unit_triangle());

        let edge = s.excluded(1);
        assert_eq!(edge.points(), &[vec2(0.0, 0.0), vec2(0.0, 1.0)]);
        assert_eq!(edge[1], vec2(0.0, 1.0));

        let capped = Simplex::from_points((0..10).map(|i| vec2(i as f64, 0.0)));
        assert_eq!(capped.len(), 3);
    }

    #[test]
    fn containment() {
        let tri = unit_triangle();
        assert!(tri.contains(vec2(0.25, 0.25)));
        assert!(tri.contains(vec2(0.0, 0.0)));
        assert!(!tri.contains(vec2(0.75, 0.75)));
        assert!(!tri.contains(vec2(-0.1, 0.5)));

        let tet = unit_tetrahedron();
        assert!(tet.contains(vec3(0.1, 0.2, 0.3)));
        assert!(!tet.contains(vec3(0.5, 0.5, 0.5)));

        // not a volume
        assert!(!tri.excluded(2).contains(vec2(0.5, 0.0)));
        // degenerate
        let flat = Simplex::from_points([vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(2.0, 2.0)]);
        assert!(!flat.contains(vec2(1.0, 1.0)));
    }

    #[test]
    fn containment_agrees_with_projection() {
        let mut rng = fastrand::Rng::with_seed(3);
        let tet = unit_tetrahedron();
        for _ in 0..500 {
            let p: Vec3d = random_vector(&mut rng, 1.0);
            assert_eq!(tet.contains(p), tet.projection_contains(p), "{p}");
            assert_eq!(tet.contains(p), tet.project(p) == p, "{p}");
        }
    }

    #[test]
    fn projected_containment() {
        let tri = Simplex::from_points([
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ]);
        assert!(tri.projection_contains(vec3(0.2, 0.2, 5.0)));
        assert!(tri.projection_contains(vec3(0.2, 0.2, -5.0)));
        assert!(!tri.projection_contains(vec3(0.6, 0.6, 1.0)));

        let edge = tri.excluded(2);
        assert!(edge.projection_contains(vec3(0.5, 3.0, 3.0)));
        assert!(!edge.projection_contains(vec3(1.5, 0.0, 0.0)));

        assert!(tri.excluded(2).excluded(1).projection_contains(vec3(9.0, 9.0, 9.0)));
        assert!(!Simplex::<f64, 3>::new().projection_contains(Vector::ZERO));
    }

    #[test]
    fn projection_parameters() {
        let tri = Simplex::from_points([
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ]);
        let (inside, params) = tri.projection_params(vec3(0.2, 0.3, 5.0)).unwrap();
        assert!(inside);
        assert_relative_eq!(params, vec3(0.2, 0.3, 0.0), epsilon = 1e-12);
        let (inside, params) = tri.projection_params(vec3(0.6, 0.6, -1.0)).unwrap();
        assert!(!inside);
        assert_relative_eq!(params, vec3(0.6, 0.6, 0.0), epsilon = 1e-12);

        // parameters are relative to the first vertex
        let shifted = Simplex::from_points([
            vec3(1.0, 1.0, 1.0),
            vec3(3.0, 1.0, 1.0),
            vec3(1.0, 5.0, 1.0),
        ]);
        let (inside, params) = shifted.projection_params(vec3(2.0, 2.0, -3.0)).unwrap();
        assert!(inside);
        assert_relative_eq!(params, vec3(0.5, 0.25, 0.0), epsilon = 1e-12);

        let edge = tri.excluded(2);
        assert_eq!(
            edge.projection_params(vec3(1.5, 2.0, 0.0)),
            Some((false, vec3(1.5, 0.0, 0.0)))
        );
        assert_eq!(
            edge.projection_params(vec3(0.25, -1.0, 4.0)),
            Some((true, vec3(0.25, 0.0, 0.0)))
        );

        let point = edge.excluded(1);
        assert_eq!(point.projection_params(vec3(7.0, 7.0, 7.0)), Some((true, Vec3d::ZERO)));
        let collapsed = Simplex::from_points([vec3(1.0, 1.0, 1.0), vec3(1.0, 1.0, 1.0)]);
        assert_eq!(collapsed.projection_params(Vec3d::ZERO), None);
        assert_eq!(Simplex::<f64, 3>::new().projection_params(Vec3d::ZERO), None);
    }

    #[test]
    fn support() {
        let tri = unit_triangle();
        assert_eq!(tri.convex_support(vec2(1.0, 0.1)), vec2(1.0, 0.0));
        assert_eq!(tri.convex_support(vec2(-1.0, -1.0)), vec2(0.0, 0.0));
        // tie: first vertex wins
        assert_eq!(tri.convex_support(vec2(1.0, 1.0)), vec2(1.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "empty simplex")]
    fn support_of_empty() {
        Simplex::<f64, 2>::new().convex_support(vec2(1.0, 0.0));
    }

    #[test]
    fn volumes() {
        assert_relative_eq!(unit_triangle().volume(), 0.5);
        assert_relative_eq!(unit_tetrahedron().volume(), 1.0 / 6.0, epsilon = 1e-15);

        // swapping two vertices flips the orientation
        let tri = unit_triangle();
        let flipped = Simplex::from_points([tri[1], tri[0], tri[2]]);
        assert_relative_eq!(flipped.volume(), -0.5);
        assert_relative_eq!(flipped.measure(), 0.5);

        assert_eq!(tri.excluded(0).volume(), 0.0);
    }

    #[test]
    fn measures() {
        let tri3 = Simplex::from_points([
            vec3(0.0, 0.0, 1.0),
            vec3(2.0, 0.0, 1.0),
            vec3(0.0, 2.0, 1.0),
        ]);
        assert_relative_eq!(tri3.measure(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(tri3.excluded(2).measure(), 2.0);
        assert_eq!(tri3.excluded(2).excluded(1).measure(), 0.0);

        // a right triangle in 4D, through the Gram determinant
        let tri4 = Simplex::<f64, 4>::from_points([
            Vector::from([1.0, 1.0, 1.0, 1.0]),
            Vector::from([1.0, 4.0, 1.0, 1.0]),
            Vector::from([1.0, 1.0, 1.0, 5.0]),
        ]);
        assert_relative_eq!(tri4.measure(), 6.0, epsilon = 1e-12);

        // tetrahedron with three orthogonal unit edges in 4D
        let tet4 = tri4.excluded(2).excluded(1)
            | Vector::from([2.0, 1.0, 1.0, 1.0])
            | Vector::from([1.0, 2.0, 1.0, 1.0])
            | Vector::from([1.0, 1.0, 2.0, 1.0]);
        assert_relative_eq!(tet4.measure(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn distances() {
        let tri = unit_triangle();
        assert_eq!(tri.distance(vec2(0.2, 0.2)), 0.0);
        assert_relative_eq!(tri.distance(vec2(-3.0, 0.5)), 3.0);
        assert_relative_eq!(tri.distance(vec2(1.0, 1.0)), 0.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn factorials() {
        assert_eq!(factorial::<f64>(0), 1.0);
        assert_eq!(factorial::<f64>(1), 1.0);
        assert_eq!(factorial::<f64>(4), 24.0);
    }
}
