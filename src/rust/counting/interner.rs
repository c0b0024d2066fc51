use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Canonicalizes structurally-equal values to a single shared instance.
///
/// Values are compared by `Eq`/`Hash`, so two distinct `String`s with the
/// same contents intern to the same `Arc`. Interned values are never removed.
#[derive(Debug, Clone)]
pub struct Interner<K> {
    canonical: HashSet<Arc<K>>,
}

impl<K> Default for Interner<K> {
    fn default() -> Self {
        Self {
            canonical: HashSet::new(),
        }
    }
}

impl<K> Interner<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            canonical: HashSet::with_capacity(capacity),
        }
    }

    /// Returns the canonical instance for `value`, registering a copy of it
    /// on first sight.
    pub fn intern(&mut self, value: &K) -> Arc<K> {
        if let Some(canonical) = self.canonical.get(value) {
            return Arc::clone(canonical);
        }
        let canonical = Arc::new(value.clone());
        self.canonical.insert(Arc::clone(&canonical));
        canonical
    }

    /// Looks up the canonical instance without registering anything.
    pub fn get(&self, value: &K) -> Option<&Arc<K>> {
        self.canonical.get(value)
    }

    pub fn contains(&self, value: &K) -> bool {
        self.canonical.contains(value)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}
