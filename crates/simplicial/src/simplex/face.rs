use crate::linalg::{nullspace, orthogonal, Real, Vector};

use super::Simplex;

/// A face of a [`Simplex`], as visited by the nearest-face search.
///
/// A face with `n + 1` vertices is described relative to one of them, its *root*. The `N` basis
/// vectors are laid out as
///
/// ```text
/// [ spanning (n) | nullspace (N - n) ]
///                                  ^ normal
/// ```
///
/// The spanning vectors point from the root to the other vertices. The nullspace vectors are
/// orthogonal to the spanning vectors, and the last of them is the face's outward *normal*
/// within its parent face. Excluding a vertex moves the ejected direction into the nullspace
/// and computes a new normal, so nothing has to be recomputed from scratch.
#[derive(Debug, Clone, Copy)]
pub struct SimplexFace<T, const N: usize> {
    n: usize,
    bases: [Vector<T, N>; N],
    /// Simplex vertex index of every spanning vector's tip.
    included: [usize; N],
    /// Simplex vertex index of the root.
    root: usize,
    /// The ejected vertex lies in the hyperplane of this face.
    flat: bool,
}

impl<T: Real, const N: usize> SimplexFace<T, N> {
    /// Creates the face spanning all vertices of `simplex`, rooted at its last vertex.
    ///
    /// # Panics
    ///
    /// Panics if the simplex is empty.
    pub fn new(simplex: &Simplex<T, N>) -> Self {
        assert!(!simplex.is_empty(), "an empty simplex has no faces");
        let n = simplex.len() - 1;
        let root = simplex[n];

        let mut bases = [Vector::ZERO; N];
        let mut included = [0; N];
        for i in 0..n {
            bases[i] = simplex[i] - root;
            included[i] = i;
        }
        if n > 1 && n < N {
            let (spanning, null) = bases.split_at_mut(n);
            nullspace(spanning, null);
        }

        Self {
            n,
            bases,
            included,
            root: n,
            flat: false,
        }
    }

    /// Returns the number of spanning vectors, which is one less than the number of vertices.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn spanning(&self) -> &[Vector<T, N>] {
        &self.bases[..self.n]
    }

    #[inline]
    pub fn nullspace(&self) -> &[Vector<T, N>] {
        &self.bases[self.n..]
    }

    /// Returns the outward normal of this face within its parent face.
    ///
    /// This is zero for a degenerate face. The normal of the root face is not meaningful.
    #[inline]
    pub fn normal(&self) -> Vector<T, N> {
        self.bases[N - 1]
    }

    /// Returns the simplex vertex index of the root point.
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Returns the simplex vertex indices of this face, with the root last.
    pub fn vertex_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.included[..self.n]
            .iter()
            .copied()
            .chain(std::iter::once(self.root))
    }

    /// Returns whether the vertex excluded to form this face lies in the face's own hyperplane.
    ///
    /// The parent face is degenerate then, and which side the normal points to is arbitrary.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    pub(crate) fn bases(&self) -> &[Vector<T, N>; N] {
        &self.bases
    }

    /// Returns the sub-face that lacks vertex `i`.
    ///
    /// Vertices `0..n` are the tips of the spanning vectors, and vertex `n` is the root. Excluding
    /// the root re-roots the sub-face at the tip of the last spanning vector.
    pub fn exclude(&self, i: usize) -> Self {
        let n = self.n;
        assert!(
            n > 0 && i <= n,
            "cannot exclude vertex {i} from a face with {} vertices",
            n + 1
        );

        let mut out = *self;
        out.n = n - 1;
        let ejected = if i < n {
            // ejected <- last spanning vector <- normal
            out.bases[i] = self.bases[n - 1];
            out.bases[n - 1] = self.normal();
            out.included[i] = self.included[n - 1];
            self.bases[i]
        } else {
            let new_root = self.bases[n - 1];
            for (dst, &b) in out.bases[..n - 1].iter_mut().zip(&self.bases[..n - 1]) {
                *dst = b - new_root;
            }
            out.bases[n - 1..N - 1].copy_from_slice(&self.bases[n..N]);
            out.root = self.included[n - 1];
            // from the new root towards the old one
            -new_root
        };

        out.bases[N - 1] = if out.n > 0 {
            // orthogonal to the sub-face and to the parent's nullspace, facing away from the
            // ejected vertex
            let normal = orthogonal(&out.bases[..N - 1]);
            let side = normal.dot(ejected);
            out.flat = side == T::ZERO;
            if side >= T::ZERO {
                -normal
            } else {
                normal
            }
        } else {
            out.flat = false;
            -ejected
        };
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use crate::{
        linalg::{vec2, vec3, Vector},
        test::{random_simplex, unit_tetrahedron},
    };

    use super::*;

    fn assert_orthogonal<const N: usize>(a: Vector<f64, N>, b: Vector<f64, N>) {
        let cos = a.dot(b) / (a.length() * b.length());
        assert_abs_diff_eq!(cos, 0.0, epsilon = 1e-9);
    }

    /// Checks the layout invariants of a face of `simplex`.
    fn check_face<const N: usize>(simplex: &Simplex<f64, N>, face: &SimplexFace<f64, N>) {
        let root = simplex[face.root()];
        for (b, i) in face.spanning().iter().zip(face.vertex_indices()) {
            assert_abs_diff_eq!(*b, simplex[i] - root, epsilon = 1e-9);
        }
        for (s, z) in face.spanning().iter().cartesian_product(face.nullspace()) {
            assert_orthogonal(*s, *z);
        }
    }

    #[test]
    fn root_face() {
        let tet = unit_tetrahedron();
        let face = SimplexFace::new(&tet);
        assert_eq!(face.dimension(), 3);
        assert_eq!(face.vertex_indices().collect::<Vec<_>>(), [0, 1, 2, 3]);
        assert_eq!(face.spanning()[0], vec3(0.0, 0.0, -1.0));
        check_face(&tet, &face);
    }

    #[test]
    fn normals_face_outward() {
        let tet = unit_tetrahedron();
        let face = SimplexFace::new(&tet);
        let root = tet[face.root()];
        for i in 0..=3 {
            let sub = face.exclude(i);
            check_face(&tet, &sub);
            assert_eq!(sub.dimension(), 2);

            // the excluded vertex is behind the wall
            let excluded = (0..4).find(|&v| sub.vertex_indices().all(|w| w != v)).unwrap();
            let sub_root = tet[sub.root()];
            assert!(sub.normal().dot(tet[excluded] - sub_root) < 0.0);
            assert!(sub.normal().dot(tet[excluded] - root) <= 0.0);
            assert!(!sub.is_flat());
        }
    }

    #[test]
    fn collinear_vertices_are_flat() {
        let line = Simplex::<f64, 2>::from_points([vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(2.0, 0.0)]);
        let face = SimplexFace::new(&line);
        assert!(!face.is_flat());
        for i in 0..=2 {
            let sub = face.exclude(i);
            assert!(sub.is_flat());
            assert!(!sub.exclude(0).is_flat());
        }
    }

    #[test]
    fn exclude_root_reroots() {
        let tet = unit_tetrahedron();
        let face = SimplexFace::new(&tet).exclude(3);
        assert_eq!(face.root(), 2);
        assert_eq!(face.vertex_indices().sorted().collect::<Vec<_>>(), [0, 1, 2]);
        // the z = 0 wall
        assert_abs_diff_eq!(face.normal().normalize(), vec3(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn slanted_wall() {
        let tet = unit_tetrahedron();
        let face = SimplexFace::new(&tet).exclude(0);
        assert_eq!(face.root(), 3);
        assert_eq!(face.vertex_indices().collect::<Vec<_>>(), [2, 1, 3]);
        // x + y + z = 1
        let expected = 1.0 / 3.0f64.sqrt();
        assert_abs_diff_eq!(face.normal().normalize(), Vector::splat(expected), epsilon = 1e-12);
    }

    #[test]
    fn recursive_exclusion() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..50 {
            let simplex = random_simplex::<5>(&mut rng, 6);
            let root = SimplexFace::new(&simplex);
            // walk down to a single vertex along a random path
            let mut face = root;
            while face.dimension() > 0 {
                let i = rng.usize(..=face.dimension());
                let sub = face.exclude(i);
                check_face(&simplex, &sub);
                // the normal lies within the parent face
                for z in face.nullspace() {
                    assert_orthogonal(sub.normal(), *z);
                }
                face = sub;
            }
            assert_eq!(face.vertex_indices().count(), 1);
        }
    }

    #[test]
    fn partial_simplex_has_nullspace() {
        let tri = Simplex::from_points([
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ]);
        let face = SimplexFace::new(&tri);
        assert_eq!(face.nullspace().len(), 1);
        let n = face.normal();
        assert_eq!(n.dot(vec3(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(n.dot(vec3(0.0, 1.0, 0.0)), 0.0);
        assert!(n.length() > 0.0);
    }

    #[test]
    #[should_panic(expected = "cannot exclude vertex 4")]
    fn exclude_out_of_range() {
        SimplexFace::new(&unit_tetrahedron()).exclude(4);
    }
}
