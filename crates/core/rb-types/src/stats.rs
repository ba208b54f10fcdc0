//! Per-call statistics.
//!
//! Each `transform`/`flush` call returns a [`Stats`] map; the runtime merges
//! them additively across calls and partitions. No component keeps a
//! cross-partition total.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping from counter name to numeric value, merged additively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats(BTreeMap<String, f64>);

impl Stats {
    /// Creates an empty stats map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to the counter `key`, creating it at zero if absent.
    pub fn add(&mut self, key: &str, value: f64) {
        *self.0.entry(key.to_string()).or_insert(0.0) += value;
    }

    /// Merges another stats map into this one, summing shared counters.
    pub fn merge(&mut self, other: Stats) {
        for (key, value) in other.0 {
            *self.0.entry(key).or_insert(0.0) += value;
        }
    }

    /// Returns the value of a counter, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Returns true if no counters have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of counters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over counters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for Stats {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
