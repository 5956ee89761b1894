//! The stack of location labels that problems are attributed to.

/// Nested location labels, outermost first.
///
/// Labels are pushed as processing descends into a document
/// (`"sounds.json"`, `"Sound 'laugh'"`, `"File group 2"`) and popped on
/// the way back out. A problem captures a copy of the stack when raised.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    labels: Vec<String>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a label for the innermost location.
    pub fn push(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    /// Pop the innermost label. Popping an empty stack is a no-op.
    pub fn pop(&mut self) -> Option<String> {
        self.labels.pop()
    }

    /// The active labels, outermost first.
    pub fn current(&self) -> &[String] {
        &self.labels
    }

    pub fn depth(&self) -> usize {
        self.labels.len()
    }
}
