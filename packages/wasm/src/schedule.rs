//! Auto-solve scheduling.
//!
//! After every expansion the controller decides whether to descend further:
//! with auto-solve on and the new children above the depth limit, the rank-1
//! child is scheduled for expansion after a fixed delay. Time is cooperative;
//! the host drains due tasks with [`AutoSolveController::pop_due`].
//!
//! Every task carries the [`RunId`] it was scheduled in. A reset cancels all
//! pending tasks, and a task that still surfaces from an older run is refused
//! by [`ScheduledExpansion::ensure_run`].

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::graph::NodeId;

/// Identity of one run (one root). Bumped on every prompt submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunId(pub u32);

impl RunId {
    /// The run after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {}", self.0)
    }
}

/// A pending automatic expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledExpansion {
    /// Run the task belongs to.
    pub run: RunId,
    /// Node to expand.
    pub target: NodeId,
    /// Host time (ms) at which the task becomes due.
    pub due_at_ms: f64,
}

impl ScheduledExpansion {
    /// Refuse tasks scheduled in a run other than `current`.
    pub fn ensure_run(&self, current: RunId) -> Result<()> {
        if self.run == current {
            Ok(())
        } else {
            Err(ExplorerError::SchedulingRace {
                target: self.target,
                scheduled_in: self.run,
                current,
            })
        }
    }
}

/// Observable state of the auto-solve policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoSolvePhase {
    /// Nothing scheduled and no descent has finished in this run.
    Idle,
    /// An expansion is pending; `target` is the earliest one.
    Scheduled {
        /// Node to expand next.
        target: NodeId,
        /// When it becomes due.
        due_at_ms: f64,
    },
    /// The last decision stopped descending (depth limit or auto-solve off).
    Done,
}

/// Best-first descent policy plus its queue of pending tasks.
#[derive(Debug, Clone)]
pub struct AutoSolveController {
    enabled: bool,
    max_depth: u32,
    delay_ms: f64,
    pending: VecDeque<ScheduledExpansion>,
    finished: bool,
}

impl AutoSolveController {
    /// Create a controller from a (sanitized) configuration.
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            enabled: config.auto_solve,
            max_depth: config.max_depth,
            delay_ms: config.auto_solve_delay_ms,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Apply a new policy. Pending tasks are kept; see [`Self::cancel_all`].
    pub fn reconfigure(&mut self, config: &ExplorerConfig) {
        self.enabled = config.auto_solve;
        self.max_depth = config.max_depth;
        self.delay_ms = config.auto_solve_delay_ms;
    }

    /// Whether auto-solve is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current phase.
    pub fn phase(&self) -> AutoSolvePhase {
        match self.pending.front() {
            Some(task) => AutoSolvePhase::Scheduled {
                target: task.target,
                due_at_ms: task.due_at_ms,
            },
            None if self.finished => AutoSolvePhase::Done,
            None => AutoSolvePhase::Idle,
        }
    }

    /// Drop every pending task and return to Idle. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.finished = false;
        if dropped > 0 {
            debug!("auto-solve: cancelled {dropped} pending expansion(s)");
        }
        dropped
    }

    /// Schedule `target` for expansion `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, run: RunId, target: NodeId, now_ms: f64) -> ScheduledExpansion {
        let task = ScheduledExpansion {
            run,
            target,
            due_at_ms: now_ms + self.delay_ms,
        };
        let at = self
            .pending
            .iter()
            .position(|queued| queued.due_at_ms > task.due_at_ms)
            .unwrap_or(self.pending.len());
        self.pending.insert(at, task);
        debug!("auto-solve: {target} scheduled at {} ({run})", task.due_at_ms);
        task
    }

    /// Decision point after an expansion whose children sit at `child_level`.
    ///
    /// `best_child` is the new rank-1 node. Returns the task if one was
    /// scheduled.
    pub fn after_expansion(
        &mut self,
        run: RunId,
        child_level: u32,
        best_child: Option<NodeId>,
        now_ms: f64,
    ) -> Option<ScheduledExpansion> {
        match best_child {
            Some(target) if self.enabled && child_level < self.max_depth => {
                Some(self.schedule(run, target, now_ms))
            }
            _ => {
                self.finished = true;
                if self.enabled {
                    debug!("auto-solve: depth limit {} reached", self.max_depth);
                }
                None
            }
        }
    }

    /// Earliest due time, if anything is pending.
    pub fn next_due_at(&self) -> Option<f64> {
        self.pending.front().map(|task| task.due_at_ms)
    }

    /// Take the earliest task if it is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<ScheduledExpansion> {
        if self.pending.front()?.due_at_ms <= now_ms {
            self.pending.pop_front()
        } else {
            None
        }
    }
}
