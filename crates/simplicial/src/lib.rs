//! Simplices in N-dimensional space.
//!
//! A [`Simplex`] holds up to `N + 1` points in `N`-space: a point, a segment, a triangle, a
//! tetrahedron, and so on. It answers three queries that convex-shape distance and intersection
//! algorithms (GJK and relatives) are built from:
//!
//! - [`Simplex::contains`]: is a point inside a full-dimensional simplex?
//! - [`Simplex::convex_support`]: which vertex lies furthest in a direction?
//! - [`Simplex::project`]: what is the nearest point of the simplex, and on which sub-face does
//!   it lie?
//!
//! Projection runs a recursive search over the faces of the simplex (see [`SimplexProjection`]).
//! Degenerate simplices (coincident or collinear points) do not make it fail; they are flagged
//! and the search continues on the remaining faces.
//!
//! The linear algebra underneath lives in [`linalg`].

use log::LevelFilter;

pub use simplicial_linalg as linalg;

mod simplex;


pub use simplex::*;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .filter(Some("simplicial_linalg"), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and this library will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` overrides both.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
