//! Expansion of a prefix into the labels of itself and every broader prefix.
//!
//! For `10.0.0.0/8` the result is
//!
//! ```text
//! cidr:10.0.0.0/8  cidr:10.0.0.0/7  cidr:8.0.0.0/6  cidr:8.0.0.0/5
//! cidr:0.0.0.0/4   cidr:0.0.0.0/3   cidr:0.0.0.0/2  cidr:0.0.0.0/1
//! cidr:0.0.0.0/0   reserved:world
//! ```
//!
//! A world label is always added since it contains every prefix. Partial
//! chains are kept in a shared [`PrefixLabelCache`] so repeated expansions
//! skip the formatting and hand out the same key allocations.

use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::{Arc, OnceLock};

use crate::cache::{LabelChain, PrefixLabelCache};
use crate::codec::label_for_masked;
use crate::labels::{Label, Labels, ID_NAME_WORLD, ID_NAME_WORLD_IPV4, ID_NAME_WORLD_IPV6};
use crate::option::{DualStack, ProcessOptions};
use crate::prefix::Prefix;

// ==============================================================================
// Labeler
// ==============================================================================

/// Expands prefixes into ancestor labels, backed by a bounded cache.
pub struct CidrLabeler {
    cache: PrefixLabelCache,
    dual_stack: Arc<dyn DualStack>,
    world: Label,
    world_v4: Label,
    world_v6: Label,
}

impl CidrLabeler {
    /// A labeler with the default cache capacity.
    pub fn new(dual_stack: Arc<dyn DualStack>) -> Self {
        Self::with_cache(PrefixLabelCache::default(), dual_stack)
    }

    pub fn with_capacity(capacity: NonZeroUsize, dual_stack: Arc<dyn DualStack>) -> Self {
        Self::with_cache(PrefixLabelCache::new(capacity), dual_stack)
    }

    fn with_cache(cache: PrefixLabelCache, dual_stack: Arc<dyn DualStack>) -> Self {
        Self {
            cache,
            dual_stack,
            world: Label::reserved(ID_NAME_WORLD),
            world_v4: Label::reserved(ID_NAME_WORLD_IPV4),
            world_v6: Label::reserved(ID_NAME_WORLD_IPV6),
        }
    }

    /// Labels for `prefix`, every broader prefix down to `/0`, and the
    /// applicable world label. A `/0` prefix yields only the world label.
    pub fn cidr_labels(&self, prefix: Prefix) -> Labels {
        let addr = prefix.addr();
        let ones = prefix.bits();
        let mut labels = Labels::with_capacity(usize::from(ones) + 2);

        if ones > 0 {
            let end = prefix.masked();
            let chain = self.compute_chain(addr, ones, 0, end);
            for label in chain.iter() {
                labels.insert(label.clone());
            }
        }
        labels.insert(self.world_label(addr).clone());

        labels
    }

    /// The world label for `addr` under the current dual-stack setting.
    pub fn world_label(&self, addr: IpAddr) -> &Label {
        if !self.dual_stack.is_dual_stack() {
            &self.world
        } else if addr.is_ipv4() {
            &self.world_v4
        } else {
            &self.world_v6
        }
    }

    /// Number of partial chains currently cached.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn purge_cache(&self) {
        self.cache.purge();
    }

    /// The chain for lengths `i..=ones` of `addr`, broadest first.
    ///
    /// A cached chain is only reused when it ends at `end`; a chain cached
    /// for the same `/i` by a different expansion still lends its head
    /// label so the key string is shared. Every step masks the original
    /// address to its own length.
    fn compute_chain(&self, addr: IpAddr, ones: u8, i: u8, end: Prefix) -> Arc<LabelChain> {
        let prefix = Prefix::masked_from(addr, i);

        let cached = self.cache.get(&prefix);
        let label = match cached {
            Some(chain) if chain.end() == end => return chain,
            Some(chain) => chain.head().clone(),
            None => label_for_masked(prefix.addr(), i),
        };

        let tail = (i < ones).then(|| self.compute_chain(addr, ones, i + 1, end));
        let chain = Arc::new(LabelChain::link(label, tail, end));
        self.cache.insert(prefix, Arc::clone(&chain));
        chain
    }
}

// ==============================================================================
// Process-wide Labeler
// ==============================================================================

static GLOBAL: OnceLock<CidrLabeler> = OnceLock::new();

/// The shared labeler, created on first use. It reads the dual-stack flag
/// from [`crate::option::config`].
pub fn global() -> &'static CidrLabeler {
    GLOBAL.get_or_init(|| CidrLabeler::new(Arc::new(ProcessOptions)))
}

/// Expand `prefix` with the process-wide labeler.
pub fn cidr_labels(prefix: Prefix) -> Labels {
    global().cidr_labels(prefix)
}

/// Drop every cached chain held by the process-wide labeler.
pub fn purge_cache() {
    global().purge_cache();
}
