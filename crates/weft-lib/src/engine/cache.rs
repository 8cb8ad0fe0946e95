//! Packrat memoization keyed by `(rule, start cursor)`.

use std::sync::Arc;

use lru::LruCache;
use serde::Serialize;

use super::config::CacheConfig;
use crate::cst::CstNode;
use crate::grammar::RuleId;

/// Stored outcome of one rule invocation.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// `None` records a failure.
    pub node: Option<Arc<CstNode>>,
    /// Cursor after the invocation; equals the start cursor on failure.
    pub end: u32,
}

impl CacheEntry {
    pub fn matched(&self) -> bool {
        self.node.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

/// Session-scoped memo table.
///
/// Eviction only costs recomputation: a re-miss executes the rule again and
/// yields the same result.
pub struct PackratCache {
    entries: Option<LruCache<(RuleId, u32), CacheEntry>>,
    stats: CacheStats,
}

impl PackratCache {
    pub fn new(config: CacheConfig) -> Self {
        let entries = config.enabled.then(|| match config.capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        });
        Self {
            entries,
            stats: CacheStats::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    pub fn get(&mut self, rule: RuleId, position: u32) -> Option<CacheEntry> {
        let entries = self.entries.as_mut()?;
        match entries.get(&(rule, position)) {
            Some(entry) => {
                self.stats.hits += 1;
                Some(entry.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, rule: RuleId, position: u32, entry: CacheEntry) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        debug_assert!(
            !entries.contains(&(rule, position)),
            "cache entries are write-once"
        );
        self.stats.stores += 1;
        if let Some((key, _)) = entries.push((rule, position), entry)
            && key != (rule, position)
        {
            self.stats.evictions += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl std::fmt::Debug for PackratCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackratCache")
            .field("enabled", &self.is_enabled())
            .field("len", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}
