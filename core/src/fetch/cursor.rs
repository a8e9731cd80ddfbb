//! Proxy list and the sticky cursor into it

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::error::ClientBuildError;

/// Where the cursor rests after a successful attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CursorPolicy {
    /// Next call starts on the proxy that just worked
    StickToLastGood,
    /// Next call starts on the proxy after the one that just worked
    AdvancePastLastGood,
}

impl Default for CursorPolicy {
    fn default() -> Self {
        Self::StickToLastGood
    }
}

/// Ordered proxy prefixes, fixed at construction. An empty prefix means direct access.
#[derive(Debug, Clone)]
pub struct ProxyList {
    prefixes: Arc<[String]>,
}

impl ProxyList {
    pub fn new<I, S>(prefixes: I) -> Result<Self, ClientBuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Arc<[String]> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.is_empty() {
            return Err(ClientBuildError::EmptyProxyList);
        }
        Ok(Self { prefixes })
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.prefixes[index % self.prefixes.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    /// Human label for a proxy slot, 1-based like the notices show it
    pub fn label(&self, index: usize) -> String {
        let index = index % self.prefixes.len();
        let prefix = &self.prefixes[index];
        if prefix.is_empty() {
            format!("#{} (direct)", index + 1)
        } else {
            format!("#{} ({})", index + 1, prefix)
        }
    }
}

/// Index of the proxy to start the next call from.
///
/// Shared by clones of a client. Reads and writes are relaxed: two calls racing
/// on it can only cost a later call a worse starting proxy.
#[derive(Debug, Clone)]
pub struct ProxyCursor {
    index: Arc<AtomicUsize>,
    len: usize,
}

impl ProxyCursor {
    pub fn new(len: usize) -> Self {
        Self::starting_at(0, len)
    }

    pub fn starting_at(index: usize, len: usize) -> Self {
        let len = len.max(1);
        Self {
            index: Arc::new(AtomicUsize::new(index % len)),
            len,
        }
    }

    pub fn get(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    pub fn set(&self, index: usize) {
        self.index.store(index % self.len, Ordering::Relaxed);
    }

    /// Slot tried by attempt `attempt` of a call that started at `start`
    pub fn slot(&self, start: usize, attempt: usize) -> usize {
        (start + attempt) % self.len
    }
}
