//! Thought generation.

use crate::error::{ExplorerError, Result};

/// An unscored candidate thought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Label encoding the position under the parent, `<parent>.<i>`.
    pub label: String,
    /// Free-text content.
    pub text: String,
}

/// Produces candidate next steps for a parent thought.
///
/// Implementations must return exactly `breadth` candidates with labels that
/// are unique within the group. Content is opaque to the engine.
pub trait ThoughtGenerator {
    /// Generate `breadth` candidates under `parent_label`.
    fn generate(&mut self, parent_label: &str, breadth: usize) -> Result<Vec<Candidate>>;
}

/// Label of the `index`-th (1-based) child of `parent_label`.
pub fn child_label(parent_label: &str, index: usize) -> String {
    format!("{parent_label}.{index}")
}

/// Placeholder generator with content-free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl ThoughtGenerator for MockGenerator {
    fn generate(&mut self, parent_label: &str, breadth: usize) -> Result<Vec<Candidate>> {
        if breadth < 1 {
            return Err(ExplorerError::InvalidArgument(format!(
                "breadth must be at least 1, got {breadth}"
            )));
        }
        Ok((1..=breadth)
            .map(|i| Candidate {
                label: child_label(parent_label, i),
                text: format!("Thought generated from {parent_label} - option {i}"),
            })
            .collect())
    }
}
