//! In-process memory of already-dispatched columns.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Tracks which columns have been offered to the engine for each
/// (bucket, prefix) since process start.
///
/// Marking happens at filter time, before the prefetch runs - a column is
/// considered dispatched even if its run is still in flight or later fails.
/// The cache is only an optimization, so a false positive costs one cold
/// read downstream; restarting the process clears the registry.
#[derive(Default)]
pub struct DedupRegistry {
    dispatched: Mutex<HashMap<String, HashSet<String>>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the requested columns not yet dispatched for this location,
    /// in request order, marking them dispatched as they are selected.
    ///
    /// The whole read-modify-write runs under one lock, so concurrent
    /// requests for the same location never both select a column.
    pub fn filter_new_columns(&self, bucket: &str, prefix: &str, columns: &[String]) -> Vec<String> {
        let registry_key = format!("{}:{}", bucket, prefix);

        let mut dispatched = self.dispatched.lock();
        let seen = dispatched.entry(registry_key).or_default();

        let mut new_columns = Vec::new();
        for column in columns {
            if seen.insert(column.clone()) {
                new_columns.push(column.clone());
            }
        }
        new_columns
    }
}
