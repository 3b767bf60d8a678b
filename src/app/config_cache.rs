//! Keyed cache for fetched config trees.
//!
//! Loaded trees are cached per app id so switching back to a recently
//! viewed app does not refetch. Invalidation is explicit: a successful
//! save or an app deletion drops the key, a store refresh drops
//! everything. The cache instance is owned by the application state and
//! passed where needed; there is no module-level singleton.

use moka::sync::Cache;
use serde_json::Value;
use std::time::Duration;

/// Trees are small JSON documents; a few hundred entries is far more than
/// one operator session ever touches.
const MAX_ENTRIES: u64 = 256;
const IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub struct ConfigCache {
    trees: Cache<String, Value>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self {
            trees: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_idle(IDLE_TIMEOUT)
                .build(),
        }
    }

    pub fn get(&self, app_id: &str) -> Option<Value> {
        self.trees.get(app_id)
    }

    pub fn insert(&self, app_id: &str, tree: Value) {
        self.trees.insert(app_id.to_string(), tree);
    }

    /// Drop one app's cached tree. Called after a successful save (the
    /// store copy changed) and after app deletion.
    pub fn invalidate(&self, app_id: &str) {
        self.trees.invalidate(app_id);
    }

    pub fn invalidate_all(&self) {
        self.trees.invalidate_all();
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new()
    }
}
