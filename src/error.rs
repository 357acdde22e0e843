//! Configuration errors raised by the dynamic evaluator.
//!
//! A configuration error means the requested stages or terminal do not fit the
//! supplied elements (summing text, a negative `limit`, a map container over
//! non-pairs). They abort the whole evaluation; no partial result is returned.
//! Callers receive them inside `anyhow::Error` and can recover the typed error
//! with `downcast_ref::<ConfigError>()`.

use crate::value::ValueKind;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{stage} count must be non-negative, got {count}")]
    NegativeCount { stage: &'static str, count: i64 },

    #[error("{op} requires numeric elements, found {found}")]
    NotNumeric { op: &'static str, found: ValueKind },

    #[error("{op} cannot order {left} against {right}")]
    NotComparable {
        op: &'static str,
        left: ValueKind,
        right: ValueKind,
    },

    #[error("join requires scalar elements, found {found}")]
    NotText { found: ValueKind },

    #[error("map container requires key/value pairs, found {found}")]
    NotKeyValue { found: ValueKind },

    #[error("duplicate key `{key}` in map container")]
    DuplicateKey { key: String },

    #[error("{terminal} depends on encounter order and cannot run in parallel")]
    NotParallelizable { terminal: &'static str },
}

/// Records the first configuration error raised while a run is in flight.
///
/// Stage closures and combiners cannot return `Result`, so they report here;
/// the evaluator checks the slot once the run finishes. Clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct FaultSlot(Arc<Mutex<Option<ConfigError>>>);

impl FaultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `err` unless an earlier error was already recorded.
    pub fn record(&self, err: ConfigError) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    pub fn is_set(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn take(&self) -> Option<ConfigError> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}
