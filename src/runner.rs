//! Execution engine: sequential and chunked-parallel runs of a [`Plan`].
//!
//! Sequential runs open one stream over the source and thread it through
//! every node on the caller's thread. Parallel runs split the source into
//! contiguous chunks, assemble the stage chain independently per chunk on
//! rayon workers, and drain every chunk in parallel. A `CombineGlobal` node is
//! a barrier: each chunk is drained into an accumulator, accumulators are
//! merged in chunk order, and execution continues from the single merged
//! partition.

use crate::node::{Node, Stage};
use crate::planner::{Plan, build_plan};
use crate::type_token::{Partition, partition_stream};
use crate::{NodeId, Pipeline};
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    Parallel {
        /// Run inside a dedicated pool of this many workers; `None` uses the global pool.
        threads: Option<usize>,
        /// Number of source chunks; `None` uses [`Runner::default_partitions`].
        partitions: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
        }
    }
}

impl Runner {
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            ..Default::default()
        }
    }

    pub fn parallel(threads: Option<usize>, partitions: Option<usize>) -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads,
                partitions,
            },
            ..Default::default()
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.mode, ExecMode::Parallel { .. })
    }

    /// Execute the chain ending at `terminal` and materialize its elements.
    pub fn run_collect<T: Send + 'static>(&self, p: &Pipeline, terminal: NodeId) -> Result<Vec<T>> {
        let plan = build_plan(p, terminal)?;

        match self.mode {
            ExecMode::Sequential => {
                debug!(plan = %plan, "running sequentially");
                exec_seq::<T>(plan)
            }
            ExecMode::Parallel {
                threads,
                partitions,
            } => {
                let parts = plan.partitions_for(partitions.unwrap_or(self.default_partitions));
                if parts > 1 && !plan.order_sensitive.is_empty() {
                    warn!(
                        stages = ?plan.order_sensitive,
                        chunks = parts,
                        "order-sensitive stages run per chunk; global semantics are not preserved"
                    );
                }
                debug!(plan = %plan, chunks = parts, ?threads, "running in parallel");
                match threads {
                    Some(t) => {
                        let pool = rayon::ThreadPoolBuilder::new()
                            .num_threads(t)
                            .build()
                            .context("building rayon thread pool")?;
                        pool.install(|| exec_parallel::<T>(plan, parts))
                    }
                    None => exec_parallel::<T>(plan, parts),
                }
            }
        }
    }
}

fn apply_stages(stages: &[&Stage], input: Partition) -> Result<Partition> {
    stages
        .iter()
        .try_fold(input, |acc, stage| stage.op().apply(acc))
        .with_context(|| format!("applying {} stage(s)", stages.len()))
}

/// Sequential executor (one stream, caller's thread)
fn exec_seq<T: Send + 'static>(plan: Plan) -> Result<Vec<T>> {
    let mut nodes = plan.chain.into_iter();
    let mut buf = match nodes.next() {
        Some(Node::Source {
            payload, vec_ops, ..
        }) => vec_ops
            .stream(payload.as_ref())
            .ok_or_else(|| anyhow!("source payload does not match its element type"))?,
        _ => bail!("plan must start with a source node"),
    };

    for node in nodes {
        buf = match node {
            Node::Stage(stage) => apply_stages(&[&stage], buf)?,
            Node::CombineGlobal {
                local,
                merge,
                finish,
            } => finish(merge(vec![local(buf)?])?)?,
            Node::Source { .. } => bail!("unexpected additional source in plan"),
        };
    }

    Ok(partition_stream::<T>(buf, "terminal")?.collect())
}

/// Parallel executor (split source -> per-chunk chains -> barriers -> drain)
fn exec_parallel<T: Send + 'static>(plan: Plan, partitions: usize) -> Result<Vec<T>> {
    let chain = &plan.chain;
    let mut parts: Vec<Partition> = match chain.first() {
        Some(Node::Source {
            payload, vec_ops, ..
        }) => vec_ops
            .split(payload.as_ref(), partitions)
            .ok_or_else(|| anyhow!("source payload does not match its element type"))?,
        _ => bail!("plan must start with a source node"),
    };

    let mut i = 1usize;
    while i < chain.len() {
        match &chain[i] {
            Node::Stage(_) => {
                // Collect the contiguous run of stages and assemble it per chunk
                let mut stages: Vec<&Stage> = Vec::new();
                while let Some(Node::Stage(stage)) = chain.get(i) {
                    stages.push(stage);
                    i += 1;
                }
                parts = parts
                    .into_par_iter()
                    .map(|chunk| apply_stages(&stages, chunk))
                    .collect::<Result<Vec<_>>>()?;
            }
            Node::CombineGlobal {
                local,
                merge,
                finish,
            } => {
                let locals = parts
                    .into_par_iter()
                    .map(|chunk| local(chunk))
                    .collect::<Result<Vec<_>>>()?;
                debug!(accumulators = locals.len(), "merging chunk accumulators");
                parts = vec![finish(merge(locals)?)?];
                i += 1;
            }
            Node::Source { .. } => bail!("unexpected additional source in plan"),
        }
    }

    let chunks: Vec<Vec<T>> = parts
        .into_par_iter()
        .map(|part| partition_stream::<T>(part, "terminal").map(|s| s.collect()))
        .collect::<Result<_>>()?;
    Ok(chunks.into_iter().flatten().collect())
}
