use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::cst::CstNode;
use crate::engine::{CacheConfig, CacheEntry, CacheStats, PackratCache};
use crate::grammar::RuleId;

fn success(rule: RuleId, start: u32, end: u32) -> CacheEntry {
    let node = CstNode::new(Arc::from("R"), rule, Vec::new(), start, end);
    CacheEntry {
        node: Some(Arc::new(node)),
        end,
    }
}

fn failure(start: u32) -> CacheEntry {
    CacheEntry {
        node: None,
        end: start,
    }
}

#[test]
fn disabled_cache_never_hits() {
    let mut cache = PackratCache::new(CacheConfig::disabled());
    let rule = RuleId::new(0);

    cache.store(rule, 0, success(rule, 0, 2));
    assert!(cache.get(rule, 0).is_none());
    assert!(cache.is_empty());
    assert_eq!(cache.stats(), CacheStats::default());
}

#[test]
fn stores_successes_and_failures() {
    let mut cache = PackratCache::new(CacheConfig::default());
    let rule = RuleId::new(3);

    assert!(cache.get(rule, 0).is_none());
    cache.store(rule, 0, success(rule, 0, 2));
    cache.store(rule, 2, failure(2));

    let hit = cache.get(rule, 0).unwrap();
    assert!(hit.matched());
    assert_eq!(hit.end, 2);

    let miss = cache.get(rule, 2).unwrap();
    assert!(!miss.matched());
    assert_eq!(miss.end, 2);

    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 2,
            misses: 1,
            stores: 2,
            evictions: 0,
        }
    );
}

#[test]
fn keys_distinguish_rule_and_position() {
    let mut cache = PackratCache::new(CacheConfig::default());
    let a = RuleId::new(0);
    let b = RuleId::new(1);

    cache.store(a, 1, failure(1));
    assert!(cache.get(b, 1).is_none());
    assert!(cache.get(a, 0).is_none());
    assert!(cache.get(a, 1).is_some());
}

#[test]
fn bounded_cache_evicts_least_recently_used() {
    let capacity = NonZeroUsize::new(2).unwrap();
    let mut cache = PackratCache::new(CacheConfig::bounded(capacity));
    let rule = RuleId::new(0);

    cache.store(rule, 0, failure(0));
    cache.store(rule, 1, failure(1));
    assert!(cache.get(rule, 0).is_some());
    cache.store(rule, 2, failure(2));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions, 1);
    assert!(cache.get(rule, 1).is_none());
    assert!(cache.get(rule, 0).is_some());
}
