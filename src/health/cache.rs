//! Tagged response cache for REST queries.
//!
//! DESIGN
//! ======
//! GET responses are stored by full URL together with the tag of the
//! resource family they belong to. A successful mutation drops every entry
//! carrying its tag so the next read goes back to the server.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;

/// Resource family a cached query belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryTag {
    HealthMetrics,
    DailyLogs,
    WeightHistory,
    Recommendations,
}

impl fmt::Display for QueryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HealthMetrics => "HealthMetrics",
            Self::DailyLogs => "DailyLogs",
            Self::WeightHistory => "WeightHistory",
            Self::Recommendations => "Recommendations",
        };
        f.write_str(name)
    }
}

struct CacheEntry {
    tag: QueryTag,
    body: serde_json::Value,
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<serde_json::Value> {
        self.entries().get(url).map(|e| e.body.clone())
    }

    pub fn insert(&self, url: impl Into<String>, tag: QueryTag, body: serde_json::Value) {
        self.entries().insert(url.into(), CacheEntry { tag, body });
    }

    /// Drop every entry tagged `tag`. Returns how many were removed.
    pub fn invalidate(&self, tag: QueryTag) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, e| e.tag != tag);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
