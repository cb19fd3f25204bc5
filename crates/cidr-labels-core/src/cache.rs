use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tracing::{debug, trace};

use crate::labels::Label;
use crate::prefix::Prefix;

/// Maximum number of partial expansions kept in memory.
pub const CIDR_LABELS_CACHE_CAP: usize = 16384;

// ==============================================================================
// Label Chain
// ==============================================================================

/// An ancestor chain: the label of one prefix followed by the labels of
/// each narrower prefix, one bit at a time, down to [`LabelChain::end`].
///
/// Each link shares its tail by reference, so the chain cached for `/i`
/// and the one cached for `/i+1` of the same expansion overlap in memory.
#[derive(Debug)]
pub struct LabelChain {
    label: Label,
    tail: Option<Arc<LabelChain>>,
    end: Prefix,
    label_count: usize,
}

impl LabelChain {
    /// Link `label` in front of `tail`. A chain without a tail ends at
    /// `end`, which must be the prefix `label` was formatted from.
    pub(crate) fn link(label: Label, tail: Option<Arc<LabelChain>>, end: Prefix) -> Self {
        let label_count = 1 + tail.as_ref().map_or(0, |t| t.label_count);
        Self {
            label,
            tail,
            end,
            label_count,
        }
    }

    pub fn head(&self) -> &Label {
        &self.label
    }

    /// The narrowest (masked) prefix in the chain.
    pub fn end(&self) -> Prefix {
        self.end
    }

    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// Labels from broadest to narrowest.
    pub fn iter(&self) -> Iter<'_> {
        Iter { next: Some(self) }
    }
}

pub struct Iter<'a> {
    next: Option<&'a LabelChain>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Label;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.tail.as_deref();
        Some(&link.label)
    }
}

// ==============================================================================
// Cache
// ==============================================================================

/// Bounded LRU from a masked prefix to the chain rooted at it.
///
/// A single mutex guards the map and is held for exactly one lookup or one
/// insertion. Lookups promote the entry.
pub struct PrefixLabelCache {
    entries: Mutex<LruCache<Prefix, Arc<LabelChain>>>,
}

impl PrefixLabelCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        debug!(capacity = capacity.get(), "creating cidr label cache");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, prefix: &Prefix) -> Option<Arc<LabelChain>> {
        self.lock().get(prefix).cloned()
    }

    /// Store `chain` under `prefix`, replacing any previous chain and
    /// evicting the least recently used entry when full.
    pub fn insert(&self, prefix: Prefix, chain: Arc<LabelChain>) {
        let displaced = self.lock().push(prefix, chain);
        // Dropped outside the lock: releasing a chain can free many links.
        if let Some((old, _)) = displaced {
            if old != prefix {
                trace!(prefix = %old, "evicted cidr label chain");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Drop every entry.
    pub fn purge(&self) {
        let old = {
            let mut entries = self.lock();
            let cap = entries.cap();
            std::mem::replace(&mut *entries, LruCache::new(cap))
        };
        // Chains are released after the lock, as in `insert`.
        let dropped = old.len();
        drop(old);
        debug!(dropped, "purged cidr label cache");
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Prefix, Arc<LabelChain>>> {
        // Entries are independent, so a panic elsewhere cannot leave the
        // map half-updated.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PrefixLabelCache {
    fn default() -> Self {
        Self::new(
            NonZeroUsize::new(CIDR_LABELS_CACHE_CAP).expect("CIDR_LABELS_CACHE_CAP is non-zero"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::label_for_masked;

    fn prefix(s: &str) -> Prefix {
        s.parse::<Prefix>().expect("valid test prefix").masked()
    }

    fn single(p: Prefix) -> Arc<LabelChain> {
        Arc::new(LabelChain::link(label_for_masked(p.addr(), p.bits()), None, p))
    }

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero test capacity")
    }

    #[test]
    fn chain_iterates_broadest_first() {
        let p2 = prefix("10.0.0.0/2");
        let tail = single(p2);
        let p1 = prefix("10.0.0.0/1");
        let chain = LabelChain::link(
            label_for_masked(p1.addr(), 1),
            Some(Arc::clone(&tail)),
            p2,
        );

        let keys: Vec<&str> = chain.iter().map(Label::key).collect();
        assert_eq!(keys, vec!["0.0.0.0/1", "0.0.0.0/2"]);
        assert_eq!(chain.label_count(), 2);
        assert_eq!(chain.end(), p2);
        assert_eq!(chain.head().key(), "0.0.0.0/1");
        assert_eq!(Arc::strong_count(&tail), 2, "tail is shared, not copied");
    }

    #[test]
    fn get_returns_inserted_chain() {
        let cache = PrefixLabelCache::new(cap(4));
        let p = prefix("10.0.0.0/8");
        assert!(cache.get(&p).is_none());
        assert!(cache.is_empty());

        let chain = single(p);
        cache.insert(p, Arc::clone(&chain));
        let hit = cache.get(&p).expect("cached chain");
        assert!(Arc::ptr_eq(&hit, &chain));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = PrefixLabelCache::new(cap(2));
        let a = prefix("10.0.0.0/8");
        let b = prefix("11.0.0.0/8");
        let c = prefix("12.0.0.0/8");

        cache.insert(a, single(a));
        cache.insert(b, single(b));
        // Touch `a` so `b` becomes the eviction candidate.
        assert!(cache.get(&a).is_some());
        cache.insert(c, single(c));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&c).is_some());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let cache = PrefixLabelCache::new(cap(2));
        let p = prefix("10.0.0.0/8");
        let first = single(p);
        let second = single(p);
        cache.insert(p, Arc::clone(&first));
        cache.insert(p, Arc::clone(&second));

        assert_eq!(cache.len(), 1);
        let hit = cache.get(&p).expect("cached chain");
        assert!(Arc::ptr_eq(&hit, &second));
    }

    #[test]
    fn purge_empties_cache() {
        let cache = PrefixLabelCache::new(cap(8));
        let p = prefix("10.0.0.0/8");
        cache.insert(p, single(p));
        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 8);
    }

    #[test]
    fn purge_releases_chains_and_keeps_cache_usable() {
        let cache = PrefixLabelCache::new(cap(4));
        let p = prefix("10.0.0.0/8");
        let chain = single(p);
        cache.insert(p, Arc::clone(&chain));
        assert_eq!(Arc::strong_count(&chain), 2);

        cache.purge();
        assert_eq!(Arc::strong_count(&chain), 1, "cache no longer holds the chain");

        cache.insert(p, Arc::clone(&chain));
        assert!(cache.get(&p).is_some());
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn default_capacity() {
        assert_eq!(PrefixLabelCache::default().capacity(), CIDR_LABELS_CACHE_CAP);
    }
}
