//! Text combiner: `Joining`

use crate::collection::CombineFn;
use std::fmt::Display;

/// `prefix + e1 + separator + ... + eN + suffix`; `prefix + suffix` when empty.
#[derive(Clone, Debug, Default)]
pub struct Joining {
    separator: String,
    prefix: String,
    suffix: String,
}

impl Joining {
    pub fn new(separator: &str) -> Self {
        Self::with_affixes(separator, "", "")
    }

    pub fn with_affixes(separator: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            separator: separator.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Join already-rendered parts.
    pub fn render(&self, parts: &[String]) -> String {
        format!("{}{}{}", self.prefix, parts.join(&self.separator), self.suffix)
    }
}

impl<T: Display> CombineFn<T, Vec<String>, String> for Joining {
    fn create(&self) -> Vec<String> {
        Vec::new()
    }

    fn add_input(&self, acc: &mut Vec<String>, v: T) {
        acc.push(v.to_string());
    }

    fn merge(&self, acc: &mut Vec<String>, mut other: Vec<String>) {
        acc.append(&mut other);
    }

    fn finish(&self, acc: Vec<String>) -> String {
        self.render(&acc)
    }
}
