use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::models::thermal::hx::core::{ConfigError, UnitError};

/// Errors that can occur while sizing a unit.
///
/// The unit is left unchanged whenever sizing fails.
#[derive(Debug, Error)]
pub enum SizingError {
    /// Evaluating the unit failed.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// The residual has the same sign at both bounds.
    #[error(
        "bounds [{lo}, {hi}] do not bracket a solution: residuals {residual_lo:e} and {residual_hi:e}"
    )]
    Infeasible {
        lo: f64,
        hi: f64,
        residual_lo: f64,
        residual_hi: f64,
    },

    /// The solver reached the iteration limit without converging.
    #[error("sizing did not converge after {iters} iterations: residual={residual:e}")]
    NonConvergence {
        /// Relative area residual of the best iterate.
        residual: f64,
        iters: usize,
    },

    /// The bisection solver rejected the problem.
    #[error("bisection solver error")]
    Solver(#[source] bisection::Error),
}

impl From<ConfigError> for SizingError {
    fn from(err: ConfigError) -> Self {
        Self::Unit(UnitError::Config(err))
    }
}

impl From<bisection::Error> for SizingError {
    /// Surfaces unit failures raised inside the solver unchanged.
    fn from(err: bisection::Error) -> Self {
        match err {
            bisection::Error::Model(source) => match source.downcast::<UnitError>() {
                Ok(unit) => Self::Unit(*unit),
                Err(other) => Self::Solver(bisection::Error::Model(other)),
            },
            other => Self::Solver(other),
        }
    }
}
