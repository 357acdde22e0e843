//! Short-circuiting match terminals.
//!
//! Each is a filter followed by `limit(1)`: the first hit stops the pull, so
//! these terminate on unbounded generators whenever a hit exists.

use crate::{Element, PCollection};
use anyhow::Result;

impl<T: Element> PCollection<T> {
    /// Whether any element satisfies `pred`.
    pub fn any_match<F>(self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Ok(self.filter(pred).limit(1).count()? > 0)
    }

    /// Whether every element satisfies `pred` (true when empty).
    pub fn all_match<F>(self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Ok(!self.any_match(move |t| !pred(t))?)
    }

    /// Whether no element satisfies `pred` (true when empty).
    pub fn none_match<F>(self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Ok(!self.any_match(pred)?)
    }
}
