//! Dense linear algebra in an arbitrary, compile-time dimension.
//!
//! This crate provides the numeric kernel used by the simplex algorithms in `simplicial`:
//!
//! - [`Vector`] and [`Matrix`], fixed-size value types parameterized by const generics.
//! - [`MatrixView`] and [`MatrixViewMut`], strided views that let the same routines run on a
//!   [`Matrix`], on a flat buffer in either memory layout, or on a slice of [`Vector`]s.
//! - Row-pivoted ([`decompose_plu`]) and column-pivoted ([`decompose_lup`]) LU decomposition,
//!   with triangular substitution and [`linear_solve`] on top.
//! - Orthogonal complements ([`orthogonal`], [`nullspace`]) and modified Gram-Schmidt
//!   ([`orthogonalize`], [`orthonormalize`]).
//!
//! # Degenerate input
//!
//! Rank-deficient input is expected and never aborts a computation. The decompositions count
//! missing pivots in [`LuInfo`], [`linear_solve`] reports [`LinalgError::Singular`], and the
//! complement routines return zero vectors. Passing arguments of mismatched shape is a bug in
//! the caller and panics.
//!
//! # Goals & Non-Goals
//!
//! - Scratch space for runtime-sized work lives in small inline buffers and only spills to the
//!   heap for large dimensions.
//! - Only [`f32`] and [`f64`] implement [`Real`]. Integer and arbitrary-precision scalars are not
//!   supported by the factorizations.

mod approx_eq;
mod error;
mod lu;
mod matrix;
mod ortho;
mod solve;
mod traits;
mod vector;
mod view;

pub use error::*;
pub use lu::*;
pub use matrix::*;
pub use ortho::*;
pub use solve::*;
pub use traits::*;
pub use vector::*;
pub use view::*;
