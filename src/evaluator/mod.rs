//! Dynamic evaluation over [`Value`] elements.
//!
//! [`evaluate`] takes a source, a list of [`Stage`] descriptors and one
//! [`Terminal`], lowers them onto a `PCollection<Value>` and runs it. Element
//! requirements the typed API expresses as trait bounds are checked here at
//! run time and reported as [`ConfigError`]s:
//!
//! - structural errors (negative `limit`/`skip`, an order-dependent terminal in
//!   parallel mode) are raised before anything runs;
//! - element errors (summing text, unorderable kinds) are raised after the run,
//!   and the partial outcome is discarded.
//!
//! ```
//! use seqflow::*;
//!
//! let words = values(["casa", "coche", "árbol", "libro", "sol"]);
//! let long = evaluate(
//!     words,
//!     vec![Stage::filter(|w| w.as_text().is_some_and(|s| s.chars().count() > 3))],
//!     Terminal::to_list(),
//!     &EvalOptions::default(),
//! )?;
//! assert_eq!(long.as_list(), Some(&values(["casa", "coche", "árbol", "libro"])[..]));
//! # anyhow::Result::<()>::Ok(())
//! ```

mod accumulate;
mod stage;
mod terminal;

pub use accumulate::{Acc, TerminalFn, Total};
pub use stage::{BinaryOp, Comparator, Expander, Mapper, Predicate, Stage};
pub use terminal::{ContainerKind, MergePolicy, Outcome, Terminal};

use crate::error::{ConfigError, FaultSlot};
use crate::helpers::from_vec;
use crate::runner::Runner;
use crate::value::Value;
use crate::{PCollection, Pipeline};
use anyhow::Result;
use tracing::{debug, warn};

/// Execution settings for [`evaluate`]. Sequential by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalOptions {
    parallel: bool,
    threads: Option<usize>,
    partitions: Option<usize>,
}

impl EvalOptions {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    /// Run inside a dedicated pool of `n` workers (parallel mode only).
    #[must_use]
    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Split the source into `n` chunks (parallel mode only).
    #[must_use]
    pub fn with_partitions(mut self, n: usize) -> Self {
        self.partitions = Some(n);
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn runner(&self) -> Runner {
        if self.parallel {
            Runner::parallel(self.threads, self.partitions)
        } else {
            Runner::sequential()
        }
    }
}

/// Apply `stages` to `source` in order and reduce the result with `terminal`.
///
/// Configuration errors come back as `anyhow::Error` wrapping a
/// [`ConfigError`]; absent results are [`Outcome::Absent`], not errors.
pub fn evaluate(
    source: Vec<Value>,
    stages: Vec<Stage>,
    terminal: Terminal,
    options: &EvalOptions,
) -> Result<Outcome> {
    if options.is_parallel() {
        if let Some(name) = terminal.first_order_dependent() {
            warn!(terminal = name, "rejecting order-dependent terminal in parallel mode");
            return Err(ConfigError::NotParallelizable { terminal: name }.into());
        }
    }

    debug!(
        elements = source.len(),
        stages = ?stages,
        terminal = ?terminal,
        parallel = options.is_parallel(),
        "evaluating"
    );

    let p = Pipeline::with_runner(options.runner());
    let faults = FaultSlot::new();
    let mut coll: PCollection<Value> = from_vec(&p, source);
    for stage in stages {
        coll = stage.attach(coll, &faults)?;
    }

    let outcome = match &terminal {
        Terminal::AnyMatch(pred) => {
            let pred = pred.clone();
            Outcome::Bool(coll.any_match(move |v| pred(v))?)
        }
        Terminal::AllMatch(pred) => {
            let pred = pred.clone();
            Outcome::Bool(coll.all_match(move |v| pred(v))?)
        }
        Terminal::NoneMatch(pred) => {
            let pred = pred.clone();
            Outcome::Bool(coll.none_match(move |v| pred(v))?)
        }
        other => coll
            .combine_globally(TerminalFn::new(other, &faults))
            .single()?,
    };

    if let Some(err) = faults.take() {
        debug!(error = %err, "discarding outcome after configuration error");
        return Err(err.into());
    }
    Ok(outcome)
}
