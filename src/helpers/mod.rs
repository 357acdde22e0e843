pub(crate) mod aggregates;
pub(crate) mod combine_global;
pub(crate) mod containers;
pub(crate) mod distinct;
pub(crate) mod grouping;
pub(crate) mod matching;
pub(crate) mod ordering;
pub(crate) mod peek;
pub(crate) mod slicing;
pub(crate) mod stdlib;

// Only re-export files with top-level functions
pub use stdlib::*;
