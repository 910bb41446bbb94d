//! Error types for the simplex engine.

use thiserror::Error;

/// Why a solve stopped without reaching an optimum.
///
/// These never escape [`crate::Solver::solve`]; the engine folds them into
/// the terminal [`crate::Solution`] status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The problem cannot be put in standard form
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// The safety cap on pivots was reached
    #[error("Iteration limit of {limit} exceeded")]
    IterationLimitExceeded { limit: usize },

    /// A pivot element too close to zero, or a non-finite cell
    #[error("Numeric instability: {0}")]
    NumericInstability(String),

    /// The caller cancelled the solve
    #[error("Solve cancelled")]
    Cancelled,
}

pub type SolveResult<T> = Result<T, SolveError>;
