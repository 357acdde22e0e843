use crate::node::Node;
use crate::node_id::NodeId;
use crate::runner::Runner;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// -------- Pipeline + nodes --------
/// A pipeline owns the node graph built by chaining [`PCollection`](crate::PCollection)
/// operations, plus the [`Runner`] its terminal operations execute with.
///
/// Building never runs anything: stages only attach nodes. A terminal walks the
/// graph back from its node to the source and executes that chain.
pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
    runner: Runner,
}

pub struct PipelineInner {
    pub next_id: u64,
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<(NodeId, NodeId)>,
}

/// Sequential execution, the default for every evaluation request.
impl Default for Pipeline {
    fn default() -> Self {
        Self::with_runner(Runner::sequential())
    }
}

/// Clones share the same graph.
impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Pipeline {
            inner: Arc::clone(&self.inner),
            runner: self.runner,
        }
    }
}

impl Pipeline {
    /// A pipeline whose terminals run with `runner`.
    pub fn with_runner(runner: Runner) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                nodes: HashMap::new(),
                edges: Vec::new(),
            })),
            runner,
        }
    }

    /// A pipeline whose terminals run in parallel with the default chunking.
    pub fn parallel() -> Self {
        Self::with_runner(Runner::default())
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    // Graph mutations are single pushes; a poisoned lock leaves the graph consistent.
    fn graph(&self) -> MutexGuard<'_, PipelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.graph();
        let id = NodeId::new(g.next_id);
        g.next_id += 1;
        g.nodes.insert(id, node);
        id
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        self.graph().edges.push((from, to));
    }

    /// Copy the current graph so execution never holds the lock.
    pub(crate) fn snapshot(&self) -> (HashMap<NodeId, Node>, Vec<(NodeId, NodeId)>) {
        let g = self.graph();
        (g.nodes.clone(), g.edges.clone())
    }
}
