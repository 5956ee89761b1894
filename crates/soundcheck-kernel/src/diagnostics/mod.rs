//! Located problem reporting.
//!
//! Every builder in the kernel takes a `&mut Diagnostics`. Descending into a
//! part of a document opens a [`Scope`] with a label; anything reported
//! while the scope is alive carries that label. Dropping the scope pops it.
//!
//! ```ignore
//! let mut scope = diagnostics.enter("Command 'haha'");
//! scope.report("Reuse of name 'haha'")?;
//! // problem context: [..., "Command 'haha'"]
//! ```

mod context;
mod problem;
mod sink;

use std::ops::{Deref, DerefMut};

pub use context::ContextStack;
pub use problem::{Problem, Severity};
pub use sink::{Mode, ProblemSink};

use crate::error::Error;

/// Context stack and problem sink for one validation run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    context: ContextStack,
    sink: ProblemSink,
}

impl Diagnostics {
    pub fn new(mode: Mode) -> Self {
        Self {
            context: ContextStack::new(),
            sink: ProblemSink::new(mode),
        }
    }

    pub fn strict() -> Self {
        Self::new(Mode::Strict)
    }

    pub fn collecting() -> Self {
        Self::new(Mode::Collect)
    }

    pub fn mode(&self) -> Mode {
        self.sink.mode()
    }

    /// Push a location label until the returned scope is dropped.
    pub fn enter(&mut self, label: impl Into<String>) -> Scope<'_> {
        self.context.push(label);
        Scope { diagnostics: self }
    }

    /// Active location labels, outermost first.
    pub fn context(&self) -> &[String] {
        self.context.current()
    }

    /// Report an error at the current location.
    pub fn report(&mut self, message: impl Into<String>) -> Result<(), Error> {
        self.raise(Severity::Error, message)
    }

    /// Report a warning at the current location.
    pub fn warn(&mut self, message: impl Into<String>) -> Result<(), Error> {
        self.raise(Severity::Warning, message)
    }

    fn raise(&mut self, severity: Severity, message: impl Into<String>) -> Result<(), Error> {
        let problem = Problem::new(severity, message, self.context.current().to_vec());
        tracing::debug!(%problem, "problem reported");
        self.sink.report(problem)
    }

    /// Record a problem that was located elsewhere (e.g. a caught
    /// structural error).
    pub fn record(&mut self, problem: Problem) -> Result<(), Error> {
        self.sink.report(problem)
    }

    /// A hard construction error at the current location. Not recorded;
    /// the caller returns it.
    pub fn structural(&self, message: impl Into<String>) -> Error {
        Error::Structural(Problem::new(
            Severity::Error,
            message,
            self.context.current().to_vec(),
        ))
    }

    pub fn problems(&self) -> &[Problem] {
        self.sink.all()
    }

    pub fn count(&self) -> usize {
        self.sink.count()
    }

    pub fn blocking(&self) -> usize {
        self.sink.blocking()
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.sink.into_problems()
    }
}

/// A pushed location label. Derefs to the [`Diagnostics`] it came from so
/// scopes nest: `scope.enter(..)` opens an inner one.
pub struct Scope<'a> {
    diagnostics: &'a mut Diagnostics,
}

impl Deref for Scope<'_> {
    type Target = Diagnostics;

    fn deref(&self) -> &Diagnostics {
        self.diagnostics
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Diagnostics {
        self.diagnostics
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.diagnostics.context.pop();
    }
}
