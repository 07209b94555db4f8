//! Nearest-point search over the faces of a simplex.
//!
//! Starting from the face spanning the whole simplex, every sub-face obtained by dropping one
//! vertex is visited recursively. A sub-face whose outward normal points away from the query
//! point cannot own the projection and is pruned, along with everything below it. A face all of
//! whose sub-faces are pruned (or that has none) owns the projection: the query point is
//! projected orthogonally onto it and offered as a candidate.
//!
//! Candidates are ranked by distance, but a *frontfacing* candidate always beats a *backfacing*
//! one. Backfacing candidates only arise when the point lies inside a full simplex.

use crate::linalg::{orthogonal, orthogonalize, Real, Vector};

use super::{Simplex, SimplexFace};

/// What to do with points inside a full simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionOp {
    /// Leave interior points where they are. Everything else goes to the nearest surface point.
    #[default]
    Clamp,
    /// Always move to the nearest point on the boundary, even from the inside.
    Boundary,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<T, const N: usize> {
    face: SimplexFace<T, N>,
    point: Vector<T, N>,
    distance2: T,
    backfacing: bool,
}

/// The result of projecting a point onto a [`Simplex`].
///
/// Created by [`Simplex::projection`].
#[derive(Debug, Clone)]
pub struct SimplexProjection<'a, T: Real, const N: usize> {
    simplex: &'a Simplex<T, N>,
    p: Vector<T, N>,
    op: ProjectionOp,
    best: Option<Candidate<T, N>>,
    degenerate: bool,
    contains: bool,
}

impl<'a, T: Real, const N: usize> SimplexProjection<'a, T, N> {
    /// Projects `p` onto `simplex`.
    ///
    /// # Panics
    ///
    /// Panics if `simplex` is empty.
    pub fn new(simplex: &'a Simplex<T, N>, p: Vector<T, N>, op: ProjectionOp) -> Self {
        assert!(!simplex.is_empty(), "cannot project onto an empty simplex");

        let face = SimplexFace::new(simplex);
        let to_p = p - simplex[face.root()];
        let mut this = Self {
            simplex,
            p,
            op,
            best: None,
            degenerate: false,
            contains: false,
        };
        this.find_nearest_face(&face, to_p, 0);
        this
    }

    /// Returns the projected point.
    ///
    /// If no face could be found (all faces of the simplex are degenerate), this is the input
    /// point.
    pub fn point(&self) -> Vector<T, N> {
        self.best.map_or(self.p, |best| best.point)
    }

    /// Returns the squared distance between the input point and its projection.
    pub fn distance2(&self) -> T {
        self.best.map_or(T::ZERO, |best| best.distance2)
    }

    /// Returns whether the input point lies inside the (full) simplex.
    pub fn contains(&self) -> bool {
        self.contains
    }

    /// Returns whether a degenerate face (coincident or collinear vertices) was encountered.
    ///
    /// The projection is still computed from the remaining faces, but may be inaccurate.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Returns the face the point projects to.
    pub fn face(&self) -> Option<&SimplexFace<T, N>> {
        self.best.as_ref().map(|best| &best.face)
    }

    /// Returns the sub-simplex the point projects to.
    ///
    /// Its vertices are in [`SimplexFace::vertex_indices`] order, so the root comes last.
    pub fn projected_face(&self) -> Simplex<T, N> {
        match &self.best {
            Some(best) => best
                .face
                .vertex_indices()
                .map(|i| self.simplex[i])
                .collect(),
            None => self.simplex.clone(),
        }
    }

    /// Returns a vector pointing from the projected face towards the input point.
    ///
    /// The length of the vector is unspecified. Where the face's normal direction is known
    /// explicitly (edges in 2D and 3D, and `N - 1` dimensional facets) it is used directly, which
    /// stays accurate even when the point is very close to the face. Otherwise this is the
    /// difference between the input point and its projection.
    pub fn normal_direction(&self) -> Vector<T, N> {
        let fallback = self.p - self.point();
        let Some(best) = &self.best else {
            return fallback;
        };
        let face = &best.face;
        let to_p = self.p - self.simplex[face.root()];
        match face.dimension() {
            1 if N == 3 => {
                let v = face.spanning()[0];
                let c = orthogonal(&[v, to_p]);
                orthogonal(&[c, v])
            }
            1 if N == 2 => towards(orthogonal(&[face.spanning()[0]]), to_p),
            n if N > 2 && n == N - 1 => towards(face.normal(), to_p),
            _ => fallback,
        }
    }

    /// Returns whether the point is on the inner side of `face`.
    fn find_nearest_face(
        &mut self,
        face: &SimplexFace<T, N>,
        to_p: Vector<T, N>,
        depth: usize,
    ) -> bool {
        let n = face.dimension();
        let backfacing = depth > 0 && face.normal().dot(to_p) < T::ZERO;
        let mut all_inside = true;

        // From inside a full simplex, the walls are candidates for the nearest boundary point
        // even though the point is behind them. Their sub-faces never are.
        let inner_wall =
            backfacing && self.op == ProjectionOp::Boundary && depth == 1 && n + 1 == N;
        if !inner_wall {
            if backfacing {
                return true;
            }
            if n == 0 {
                self.offer(Candidate {
                    face: *face,
                    point: self.simplex[face.root()],
                    distance2: to_p.length2(),
                    backfacing: false,
                });
                return false;
            }

            for i in 0..=n {
                let sub = face.exclude(i);
                if sub.normal().length2() == T::ZERO {
                    log::trace!(
                        "skipping degenerate face {:?}",
                        sub.vertex_indices().collect::<Vec<_>>()
                    );
                    self.degenerate = true;
                    continue;
                }
                if sub.is_flat() {
                    log::trace!(
                        "face {:?} is flat, its orientation is arbitrary",
                        sub.vertex_indices().collect::<Vec<_>>()
                    );
                    self.degenerate = true;
                }
                // sub-faces excluding the root are rooted elsewhere
                let to_sub = if i == n {
                    to_p - face.spanning()[n - 1]
                } else {
                    to_p
                };
                if !self.find_nearest_face(&sub, to_sub, depth + 1) {
                    all_inside = false;
                }
            }
        }

        if all_inside {
            if n < N {
                let point = self.project_to_face(face, to_p);
                self.offer(Candidate {
                    face: *face,
                    point,
                    distance2: self.p.distance2(point),
                    backfacing,
                });
            } else {
                // behind every wall of a full simplex
                self.contains = true;
                if self.op == ProjectionOp::Clamp {
                    self.offer(Candidate {
                        face: *face,
                        point: self.p,
                        distance2: T::ZERO,
                        backfacing: true,
                    });
                }
            }
        }
        backfacing
    }

    fn offer(&mut self, candidate: Candidate<T, N>) {
        let better = match &self.best {
            None => true,
            Some(best) => {
                (candidate.distance2 < best.distance2 && candidate.backfacing <= best.backfacing)
                    || (!candidate.backfacing && best.backfacing)
            }
        };
        if better {
            self.best = Some(candidate);
        }
    }

    /// Orthogonally projects the point onto the affine hull of `face`.
    fn project_to_face(&self, face: &SimplexFace<T, N>, to_p: Vector<T, N>) -> Vector<T, N> {
        let root = self.simplex[face.root()];
        let n = face.dimension();
        if n == 0 {
            root
        } else if n == 1 {
            to_p.project_on(face.spanning()[0]) + root
        } else if N > 2 && n == N - 1 {
            self.p - to_p.project_on(face.normal())
        } else if n == N {
            self.p
        } else {
            // Only reachable for N > 3. Project onto whichever of the spanning basis and the
            // nullspace has fewer vectors.
            let mut bases = *face.bases();
            let via_nullspace = N - n < n;
            let basis = if via_nullspace {
                &mut bases[n..]
            } else {
                &mut bases[..n]
            };
            // The nullspace is built from successive normals, which are mutually orthogonal,
            // except for the part computed up front for a simplex that isn't full.
            if !via_nullspace || !self.simplex.is_full() {
                orthogonalize(basis);
            }

            let along: Vector<T, N> = basis.iter().map(|&b| to_p.project_on(b)).sum();
            if via_nullspace {
                to_p - along + root
            } else {
                along + root
            }
        }
    }
}

/// Flips `v` to point towards `target`.
fn towards<T: Real, const N: usize>(v: Vector<T, N>, target: Vector<T, N>) -> Vector<T, N> {
    if v.dot(target) >= T::ZERO {
        v
    } else {
        -v
    }
}
