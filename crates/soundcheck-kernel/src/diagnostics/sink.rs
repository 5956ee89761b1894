//! Where reported problems go.

use serde::{Deserialize, Serialize};

use super::problem::{Problem, Severity};
use crate::error::Error;

/// How the sink reacts to a reported problem. Chosen once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The first problem aborts the run.
    Strict,
    /// Problems accumulate and processing continues.
    #[default]
    Collect,
}

/// Accumulates problems, or turns the first one into an abort.
#[derive(Debug, Clone, Default)]
pub struct ProblemSink {
    mode: Mode,
    problems: Vec<Problem>,
}

impl ProblemSink {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            problems: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Record a problem.
    ///
    /// In strict mode the problem is recorded and returned as
    /// [`Error::Aborted`]; callers propagate it with `?`.
    pub fn report(&mut self, problem: Problem) -> Result<(), Error> {
        self.problems.push(problem);
        match self.mode {
            Mode::Collect => Ok(()),
            Mode::Strict => match self.problems.last() {
                Some(problem) => Err(Error::Aborted(problem.clone())),
                None => Ok(()),
            },
        }
    }

    /// All problems, in the order they were reported.
    pub fn all(&self) -> &[Problem] {
        &self.problems
    }

    pub fn count(&self) -> usize {
        self.problems.len()
    }

    /// Problems with [`Severity::Error`].
    pub fn blocking(&self) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity() == Severity::Error)
            .count()
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}
