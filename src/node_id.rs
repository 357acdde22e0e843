//! Identifier for nodes within a [`Pipeline`](crate::pipeline::Pipeline) graph.
//!
//! Every source, stage, and combine node gets a sequential `NodeId` when it is
//! inserted. The planner walks edges between ids to recover the linear chain
//! that ends at a requested terminal.

/// Unique numeric identifier for a node in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}
