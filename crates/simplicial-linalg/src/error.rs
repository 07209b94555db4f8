use thiserror::Error;

/// Errors reported by the linear solvers.
///
/// Rank deficiency is the only failure mode: shape mismatches are programming errors and panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LinalgError {
    /// The system matrix has no inverse.
    #[error("matrix is singular ({degenerate} degenerate pivot column(s))")]
    Singular { degenerate: usize },
}
