//! A single located validation failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a problem is.
///
/// Warnings describe configuration that works but is probably wrong
/// (unused sounds, stray audio files). Errors break the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A message plus the location labels that were active when it was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    severity: Severity,
    message: String,
    context: Vec<String>,
}

impl Problem {
    pub fn new(severity: Severity, message: impl Into<String>, context: Vec<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            context,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location labels, outermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.context.join(":"), self.message)
        }
    }
}
