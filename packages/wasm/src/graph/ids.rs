//! Node id allocation.

use super::node::NodeId;

/// First id handed out in a fresh run; the root always gets it.
pub const FIRST_NODE_ID: u32 = 1;

/// Monotonic node id counter.
///
/// Owned by the session and reset only together with the graph store, so a
/// reset can never hand out an id that a surviving node still carries.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create an allocator starting at [`FIRST_NODE_ID`].
    pub fn new() -> Self {
        Self::starting_at(FIRST_NODE_ID)
    }

    /// Create an allocator whose first id is `start_at`.
    pub fn starting_at(start_at: u32) -> Self {
        Self { next: start_at }
    }

    /// Issue a fresh id.
    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Peek at the id the next call to [`IdAllocator::next`] will return.
    pub fn peek(&self) -> NodeId {
        NodeId(self.next)
    }

    /// Reinitialize the counter.
    pub fn reset(&mut self, start_at: u32) {
        self.next = start_at;
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
