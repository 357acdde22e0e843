//! Planning: recover the linear chain that ends at a terminal node.
//!
//! The pipeline graph may hold several branches (a `PCollection` can be cloned
//! and extended in different directions). A terminal only needs its own
//! ancestry, so the planner walks edges backwards from the terminal to the
//! source and validates that the result is a well-formed chain:
//!
//! 1. exactly one `Source`, at the head;
//! 2. every other node is a `Stage` or a `CombineGlobal`.
//!
//! It also records facts the runner uses when sizing and logging a run: the
//! source length when known, and which order-sensitive stages would execute
//! per chunk under parallel execution.

use crate::node::Node;
use crate::{NodeId, Pipeline};
use anyhow::{Result, anyhow, bail};
use std::fmt::{self, Display, Formatter};
use tracing::trace;

/// A validated execution chain, source first.
pub struct Plan {
    pub chain: Vec<Node>,
    /// Element count of the source, `None` for generators.
    pub source_len: Option<usize>,
    /// Names of `Sort`/`Limit`/`Skip`/`Distinct` stages in the chain.
    pub order_sensitive: Vec<&'static str>,
}

impl Plan {
    /// Number of chunks to split the source into for a parallel run.
    ///
    /// Clamped to `[1, source_len]`; unknown-length sources run as one chunk.
    pub fn partitions_for(&self, requested: usize) -> usize {
        match self.source_len {
            Some(len) => requested.min(len).max(1),
            None => 1,
        }
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, node) in self.chain.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(&node.label())?;
            if i == 0 {
                if let Some(len) = self.source_len {
                    write!(f, "[{len}]")?;
                }
            }
        }
        Ok(())
    }
}

/// Build the plan for the chain ending at `terminal`.
pub fn build_plan(p: &Pipeline, terminal: NodeId) -> Result<Plan> {
    let (mut nodes, edges) = p.snapshot();

    // Linear backwalk: terminal -> ... -> source
    let mut chain: Vec<Node> = Vec::new();
    let mut cur = terminal;
    loop {
        let node = nodes
            .remove(&cur)
            .ok_or_else(|| anyhow!("missing node {cur:?}"))?;
        chain.push(node);
        match edges.iter().find(|(_, to)| *to == cur) {
            Some((from, _)) => cur = *from,
            None => break,
        }
    }
    chain.reverse();

    let source_len = match chain.first() {
        Some(Node::Source {
            payload, vec_ops, ..
        }) => vec_ops.len(payload.as_ref()),
        _ => bail!("plan must start with a source node"),
    };
    if chain[1..]
        .iter()
        .any(|n| matches!(n, Node::Source { .. }))
    {
        bail!("unexpected additional source in plan");
    }

    let order_sensitive = chain
        .iter()
        .filter_map(|n| match n {
            Node::Stage(stage) if stage.is_order_sensitive() => Some(stage.name()),
            _ => None,
        })
        .collect();

    let plan = Plan {
        chain,
        source_len,
        order_sensitive,
    };
    trace!(plan = %plan, "built plan");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_vec;

    #[test]
    fn plan_follows_only_the_requested_branch() -> Result<()> {
        let p = Pipeline::default();
        let base = from_vec(&p, vec![3, 1, 2]);
        let _other = base.clone().map(|x: &i32| x * 10);
        let mine = base.filter(|x: &i32| *x > 1).limit(1);

        let plan = build_plan(&p, mine.id)?;
        assert_eq!(plan.chain.len(), 3);
        assert_eq!(plan.source_len, Some(3));
        assert_eq!(plan.order_sensitive, vec!["limit"]);
        assert_eq!(plan.to_string(), "source<i32>[3] -> filter -> limit(1)");
        Ok(())
    }

    #[test]
    fn partitions_are_clamped_to_source_length() -> Result<()> {
        let p = Pipeline::default();
        let c = from_vec(&p, vec![1u8, 2, 3]);
        let plan = build_plan(&p, c.id)?;
        assert_eq!(plan.partitions_for(64), 3);
        assert_eq!(plan.partitions_for(0), 1);
        Ok(())
    }

    #[test]
    fn generator_sources_run_as_one_chunk() -> Result<()> {
        let p = Pipeline::default();
        let c = crate::from_generator(&p, || 0u32..);
        let plan = build_plan(&p, c.id)?;
        assert_eq!(plan.source_len, None);
        assert_eq!(plan.partitions_for(8), 1);
        Ok(())
    }
}
