//! Label records and label sets.
//!
//! A label is a `(key, source)` pair. Keys are `Arc<str>` so the ancestor
//! cache can hand the same allocation to every caller that expands an
//! overlapping prefix.

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Key of the world label used when dual-stack is disabled.
pub const ID_NAME_WORLD: &str = "world";
/// Key of the IPv4 world label under dual-stack.
pub const ID_NAME_WORLD_IPV4: &str = "world-ipv4";
/// Key of the IPv6 world label under dual-stack.
pub const ID_NAME_WORLD_IPV6: &str = "world-ipv6";

// ==============================================================================
// Label Source
// ==============================================================================

/// Where a label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSource {
    /// Derived from an IP prefix.
    Cidr,
    /// One of the fixed world labels.
    Reserved,
}

impl LabelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cidr => "cidr",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Label
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub key: Arc<str>,
    pub source: LabelSource,
}

impl Label {
    pub fn new(key: impl Into<Arc<str>>, source: LabelSource) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    pub fn cidr(key: impl Into<Arc<str>>) -> Self {
        Self::new(key, LabelSource::Cidr)
    }

    pub fn reserved(key: impl Into<Arc<str>>) -> Self {
        Self::new(key, LabelSource::Reserved)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Renders as `source:key`, e.g. `cidr:10.0.0.0/8`.
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.key)
    }
}

// ==============================================================================
// Label Set
// ==============================================================================

/// Labels keyed by their key string. Each key occurs at most once.
///
/// Iteration order is unspecified; use [`Labels::sorted`] when a stable
/// order is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Labels(HashMap<Arc<str>, Label>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    /// Insert `label` under its own key, returning the label it replaced.
    pub fn insert(&mut self, label: Label) -> Option<Label> {
        self.0.insert(Arc::clone(&label.key), label)
    }

    pub fn get(&self, key: &str) -> Option<&Label> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Values<'_, Arc<str>, Label> {
        self.0.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| &**k)
    }

    /// Labels ordered by key.
    pub fn sorted(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = self.0.values().collect();
        labels.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        labels
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

impl FromIterator<Label> for Labels {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut labels = Self::with_capacity(iter.size_hint().0);
        for label in iter {
            labels.insert(label);
        }
        labels
    }
}

impl IntoIterator for Labels {
    type Item = Label;
    type IntoIter = hash_map::IntoValues<Arc<str>, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a Label;
    type IntoIter = hash_map::Values<'a, Arc<str>, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}
