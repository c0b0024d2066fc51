use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use super::error::CountingError;
use super::interner::Interner;
use super::utils::grow_doubling;

/// Default number of keys an encoding is sized for when no hint is given.
pub const DEFAULT_CAPACITY: usize = 128;

/// A bidirectional table between keys and dense integer codes.
///
/// Codes are handed out in first-seen order, so an encoding holding `n` keys
/// always uses exactly the codes `0..n`. Codes are never reused or revoked.
///
/// # Example
/// ```
/// use tallier::Encoding;
///
/// let mut encoding = Encoding::new();
/// let spam = encoding.encode(&"spam".to_string());
/// let ham = encoding.encode(&"ham".to_string());
/// assert_eq!((spam, ham), (0, 1));
/// assert_eq!(encoding.encode(&"spam".to_string()), spam);
/// assert_eq!(encoding.decode(ham).unwrap(), "ham");
/// ```
#[derive(Debug, Clone)]
pub struct Encoding<K> {
    interner: Interner<K>,
    codes: HashMap<Arc<K>, usize>,
    keys: Vec<Arc<K>>,
}

impl<K> Default for Encoding<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<K> Encoding<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            interner: Interner::with_capacity(capacity),
            codes: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity.max(1)),
        }
    }

    /// Returns the code for `key`, assigning the next free code if the key
    /// has not been seen before.
    pub fn encode(&mut self, key: &K) -> usize {
        if let Some(&code) = self.codes.get(key) {
            return code;
        }
        let canonical = self.interner.intern(key);
        let code = self.keys.len();
        grow_doubling(&mut self.keys, code + 1);
        self.keys.push(Arc::clone(&canonical));
        self.codes.insert(canonical, code);
        code
    }

    pub fn decode(&self, code: usize) -> Result<&K, CountingError> {
        self.keys
            .get(code)
            .map(|key| key.as_ref())
            .ok_or(CountingError::IndexOutOfRange {
                code,
                size: self.keys.len(),
            })
    }

    /// Returns the code already assigned to `key`, if any.
    pub fn code_of(&self, key: &K) -> Option<usize> {
        self.codes.get(key).copied()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.codes.contains_key(key)
    }

    /// Keys in code order, which is the order they were first encoded in.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.keys.iter().map(|key| key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys the decode array can hold before it has to grow.
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> String {
        value.to_string()
    }

    #[test]
    fn test_codes_follow_first_seen_order() {
        let mut encoding = Encoding::new();
        let words = ["b", "a", "b", "c", "a", "d"];
        let codes: Vec<usize> = words.iter().map(|w| encoding.encode(&s(w))).collect();
        assert_eq!(codes, vec![0, 1, 0, 2, 1, 3]);
        assert_eq!(encoding.len(), 4);
        let keys: Vec<&String> = encoding.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_round_trip() {
        let mut encoding = Encoding::with_capacity(2);
        for word in ["porn", "vote", "spam", "ham", "vote"] {
            let code = encoding.encode(&s(word));
            assert_eq!(encoding.decode(code).unwrap(), word);
        }
    }

    #[test]
    fn test_decode_out_of_range() {
        let mut encoding = Encoding::new();
        encoding.encode(&7u64);
        assert_eq!(
            encoding.decode(1),
            Err(CountingError::IndexOutOfRange { code: 1, size: 1 })
        );
    }

    #[test]
    fn test_contains_key_does_not_encode() {
        let mut encoding = Encoding::new();
        encoding.encode(&s("spam"));
        assert!(encoding.contains_key(&s("spam")));
        assert!(!encoding.contains_key(&s("ham")));
        assert_eq!(encoding.code_of(&s("ham")), None);
        assert_eq!(encoding.len(), 1);
    }

    #[test]
    fn test_capacity_doubles() {
        let mut encoding = Encoding::with_capacity(1);
        for i in 0..5u32 {
            encoding.encode(&i);
        }
        assert!(encoding.capacity() >= 8);
        assert_eq!(encoding.len(), 5);
    }
}
