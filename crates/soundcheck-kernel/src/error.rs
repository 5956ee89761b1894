//! Errors that stop a build.

use crate::diagnostics::Problem;

/// Why a registry build stopped early.
///
/// Ordinary problems never surface here in collecting mode; they are
/// recorded and the build carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Strict mode: the first reported problem ends the run.
    #[error("{0}")]
    Aborted(Problem),

    /// The document cannot be turned into a usable model (bad slash-command
    /// name, nesting too deep). Aborts the whole document.
    #[error("{0}")]
    Structural(Problem),
}

impl Error {
    /// The located problem behind this error.
    pub fn problem(&self) -> &Problem {
        match self {
            Self::Aborted(problem) | Self::Structural(problem) => problem,
        }
    }

    /// Consume the error, keeping its problem.
    pub fn into_problem(self) -> Problem {
        match self {
            Self::Aborted(problem) | Self::Structural(problem) => problem,
        }
    }
}
