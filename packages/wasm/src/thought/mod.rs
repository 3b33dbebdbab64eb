//! Pluggable thought generation and evaluation.
//!
//! The engine only relies on the contracts of [`ThoughtGenerator`] and
//! [`ThoughtEvaluator`]; the mock implementations stand in for real ones.

mod evaluator;
mod generator;

pub use evaluator::{check_ranks, rank_by_score, MockEvaluator, ScoredThought, ThoughtEvaluator};
pub use generator::{child_label, Candidate, MockGenerator, ThoughtGenerator};
