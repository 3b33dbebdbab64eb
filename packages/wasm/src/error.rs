//! Error taxonomy for the thought tree core.
//!
//! None of these are fatal. Configuration problems are coerced at the boundary
//! (see [`crate::config`]), and structural problems are reported to Rust callers
//! as `Err` and swallowed by the WASM facade, which degrades to "no visible change".

use thiserror::Error;

use crate::graph::NodeId;
use crate::schedule::RunId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Errors raised by the expansion engine and its collaborators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplorerError {
    /// A numeric input was outside its valid domain (breadth < 1, NaN, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An expansion targeted a node that is not part of the current run.
    #[error("stale reference: {0} is not in the current tree")]
    StaleReference(NodeId),

    /// A scheduled auto-solve expansion outlived the run that created it.
    #[error("scheduled expansion of {target} belongs to {scheduled_in}, current is {current}")]
    SchedulingRace {
        /// Node the task wanted to expand.
        target: NodeId,
        /// Run the task was scheduled in.
        scheduled_in: RunId,
        /// Run that is live now.
        current: RunId,
    },

    /// A pluggable evaluator returned a result that breaks the ranking contract.
    #[error("evaluator contract violated: {0}")]
    EvaluatorContract(String),
}

impl ExplorerError {
    /// Whether the error means "the target went away", which callers treat as a no-op.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            ExplorerError::StaleReference(_) | ExplorerError::SchedulingRace { .. }
        )
    }
}
