use std::fmt;
use std::hash::Hash;

use log::warn;

use super::encoding::{Encoding, DEFAULT_CAPACITY};
use super::error::CountingError;
use super::utils::resize_doubling;

/// How a counter stores values and what `normalize` turns them into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterMode {
    /// Raw counts; normalizing divides by the total.
    #[default]
    Linear,
    /// Raw counts; normalizing replaces each count with its log-probability.
    Log,
}

impl CounterMode {
    /// The value reported for a key that has never been incremented.
    pub fn default_value(self) -> f64 {
        match self {
            CounterMode::Linear => 0.0,
            CounterMode::Log => f64::NEG_INFINITY,
        }
    }
}

/// A sparse frequency vector over the code space of one [`Encoding`].
///
/// A slot becomes *known* the first time its key is incremented. Lookups of
/// keys that were never incremented return the mode's default value and
/// leave the counter untouched.
///
/// ```
/// use tallier::{Counter, CounterMode};
///
/// let mut counter = Counter::new(4, CounterMode::Linear);
/// counter.increment_count(&"a", 3.0)?;
/// counter.increment_count(&"b", 2.0)?;
/// counter.normalize()?;
/// assert!((counter.get_count(&"a") - 0.6).abs() < 1e-9);
/// assert_eq!(counter.arg_max(), Some(&"a"));
/// # Ok::<(), tallier::CountingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Counter<K> {
    encoding: Encoding<K>,
    values: Vec<Option<f64>>,
    mode: CounterMode,
    normalized: bool,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Counter<String>>();
    }
};

impl<K> Default for Counter<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, CounterMode::Linear)
    }
}

impl<K> Counter<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty counter with its own private encoding.
    pub fn new(capacity: usize, mode: CounterMode) -> Self {
        Self::with_encoding(Encoding::with_capacity(capacity), mode)
    }

    /// Creates a counter over an existing encoding. Keys already in the
    /// encoding start out unobserved.
    ///
    /// The counter owns its encoding: pass a clone to start from another
    /// table's code space. Codes agree with the source for every key it held
    /// at the time; keys added to either side afterwards are not shared.
    pub fn with_encoding(encoding: Encoding<K>, mode: CounterMode) -> Self {
        let size = encoding.len().max(encoding.capacity()).max(1);
        Self {
            encoding,
            values: vec![None; size],
            mode,
            normalized: false,
        }
    }

    pub fn mode(&self) -> CounterMode {
        self.mode
    }

    pub fn encoding(&self) -> &Encoding<K> {
        &self.encoding
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Number of keys in the underlying encoding.
    pub fn len(&self) -> usize {
        self.encoding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoding.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.encoding.keys()
    }

    pub fn get_count(&self, key: &K) -> f64 {
        self.encoding
            .code_of(key)
            .and_then(|code| self.values.get(code).copied().flatten())
            .unwrap_or(self.mode.default_value())
    }

    /// Adds `delta` to the count for `key`, encoding the key if it is new.
    ///
    /// # Errors
    /// - `ArgumentError` if `delta` is NaN or infinite; the counter is left unchanged
    pub fn increment_count(&mut self, key: &K, delta: f64) -> Result<(), CountingError> {
        if !delta.is_finite() {
            return Err(CountingError::non_finite_delta(delta));
        }
        if self.normalized {
            warn!("Incrementing a counter that has already been normalized");
        }
        let code = self.encoding.encode(key);
        resize_doubling(&mut self.values, code + 1, None);
        let slot = &mut self.values[code];
        *slot = Some(slot.unwrap_or(0.0) + delta);
        Ok(())
    }

    /// Sum over all known slots.
    pub fn total_count(&self) -> f64 {
        self.known().map(|(_, value)| value).sum()
    }

    /// Turns the raw counts into a distribution over the known keys.
    ///
    /// In linear mode every slot is divided by the total; in log mode every
    /// slot becomes `ln(value) - ln(total)`.
    ///
    /// # Errors
    /// - `InvalidState` if the total is not a positive finite number (an
    ///   overflowed total included), or if a log-mode counter holds a negative
    ///   count; the counter is left unchanged
    pub fn normalize(&mut self) -> Result<(), CountingError> {
        let total = self.total_count();
        if !total.is_finite() || total <= 0.0 {
            return Err(CountingError::InvalidState(format!(
                "Cannot normalize a counter with total {}",
                total
            )));
        }
        match self.mode {
            CounterMode::Linear => {
                for value in self.values.iter_mut().flatten() {
                    *value /= total;
                }
            }
            CounterMode::Log => {
                if self.known().any(|(_, value)| value < 0.0) {
                    return Err(CountingError::InvalidState(
                        "Cannot take the log of a negative count".into(),
                    ));
                }
                let log_total = total.ln();
                for value in self.values.iter_mut().flatten() {
                    *value = value.ln() - log_total;
                }
            }
        }
        self.normalized = true;
        Ok(())
    }

    /// The key with the largest value; ties go to the key encoded first.
    pub fn arg_max(&self) -> Option<&K> {
        let mut best: Option<(usize, f64)> = None;
        for (code, value) in self.known() {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((code, value)),
            }
        }
        best.and_then(|(code, _)| self.encoding.decode(code).ok())
    }

    /// Known keys and their values in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.known()
            .filter_map(move |(code, value)| self.encoding.decode(code).ok().map(|key| (key, value)))
    }

    fn known(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(code, value)| value.map(|value| (code, value)))
    }
}

impl<K> fmt::Display for Counter<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (key, value) in self.iter() {
            write!(f, "{} : {}, ", key, value)?;
        }
        write!(f, "]")
    }
}
