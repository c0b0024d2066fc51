use std::fmt;
use std::hash::Hash;

use log::{debug, warn};
use ndarray::Array1;

use super::encoding::Encoding;
use super::error::CountingError;
use super::utils::{grow_doubling, resize_doubling};

const NOT_PRESENT: usize = usize::MAX;

/// Sparse storage for one primary key.
///
/// Slots are allocated in the order secondary keys first appear in this row.
/// `slot_codes` maps a slot to its secondary code and `slot_of` maps a
/// secondary code back to its slot.
#[derive(Debug, Clone, Default)]
struct Row {
    values: Vec<f64>,
    slot_codes: Vec<usize>,
    slot_of: Vec<usize>,
}

impl Row {
    fn slot(&self, code: usize) -> Option<usize> {
        self.slot_of.get(code).copied().filter(|&slot| slot != NOT_PRESENT)
    }

    fn slot_or_insert(&mut self, code: usize, initial_capacity: usize) -> usize {
        if let Some(slot) = self.slot(code) {
            return slot;
        }
        let slot = self.values.len();
        if self.values.capacity() == 0 {
            self.values.reserve_exact(initial_capacity);
            self.slot_codes.reserve_exact(initial_capacity);
        }
        grow_doubling(&mut self.values, slot + 1);
        grow_doubling(&mut self.slot_codes, slot + 1);
        self.values.push(0.0);
        self.slot_codes.push(code);
        resize_doubling(&mut self.slot_of, code + 1, NOT_PRESENT);
        self.slot_of[code] = slot;
        slot
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A two-level count table: every primary key owns an independent sparse
/// row over a secondary code space shared by all rows.
///
/// Rows only store the secondary keys they have actually been incremented
/// with. [`CounterMap::normalize`] normalizes each row over those populated
/// slots alone, so rows can end up as distributions over different supports
/// and a secondary key a row never saw keeps reading as zero. This is a
/// deliberately weak form of smoothing, not a dense normalization over every
/// secondary key.
///
/// ```
/// use tallier::CounterMap;
///
/// let mut table = CounterMap::new(4, 4);
/// table.increment_count(&"porn", &"spam", 3.0)?;
/// table.increment_count(&"porn", &"ham", 2.0)?;
/// table.increment_count(&"vote", &"spam", 1.0)?;
/// table.increment_count(&"vote", &"ham", 5.0)?;
/// table.normalize()?;
///
/// assert!((table.get_counter(&"porn").get_count(&"spam") - 0.6).abs() < 1e-9);
/// assert_eq!(table.arg_max(&"vote"), Some(&"ham"));
/// # Ok::<(), tallier::CountingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CounterMap<P, S> {
    primary: Encoding<P>,
    secondary: Encoding<S>,
    rows: Vec<Row>,
    row_capacity: usize,
    normalized: bool,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<CounterMap<usize, String>>();
    }
};

impl<P, S> Default for CounterMap<P, S>
where
    P: Eq + Hash + Clone,
    S: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(64, 64)
    }
}

impl<P, S> CounterMap<P, S>
where
    P: Eq + Hash + Clone,
    S: Eq + Hash + Clone,
{
    /// Creates an empty table sized for `primary_capacity` rows, each row
    /// starting with room for `secondary_capacity` slots once it is first used.
    pub fn new(primary_capacity: usize, secondary_capacity: usize) -> Self {
        let primary_capacity = primary_capacity.max(1);
        Self {
            primary: Encoding::with_capacity(primary_capacity),
            secondary: Encoding::with_capacity(secondary_capacity),
            rows: vec![Row::default(); primary_capacity],
            row_capacity: secondary_capacity.max(1),
            normalized: false,
        }
    }

    /// Number of primary keys.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Primary keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &P> + '_ {
        self.primary.keys()
    }

    pub fn primary_encoding(&self) -> &Encoding<P> {
        &self.primary
    }

    pub fn secondary_encoding(&self) -> &Encoding<S> {
        &self.secondary
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn increment(&mut self, primary: &P, secondary: &S) -> Result<(), CountingError> {
        self.increment_count(primary, secondary, 1.0)
    }

    /// Adds `delta` to the cell `(primary, secondary)`, encoding either key
    /// and allocating a row slot as needed.
    ///
    /// # Errors
    /// - `ArgumentError` if `delta` is NaN or infinite; nothing is encoded
    pub fn increment_count(
        &mut self,
        primary: &P,
        secondary: &S,
        delta: f64,
    ) -> Result<(), CountingError> {
        if !delta.is_finite() {
            return Err(CountingError::non_finite_delta(delta));
        }
        if self.normalized {
            warn!("Incrementing a counter map that has already been normalized");
        }
        let primary_code = self.primary.encode(primary);
        let secondary_code = self.secondary.encode(secondary);
        resize_doubling(&mut self.rows, primary_code + 1, Row::default());

        let row = &mut self.rows[primary_code];
        let slot = row.slot_or_insert(secondary_code, self.row_capacity);
        row.values[slot] += delta;
        Ok(())
    }

    pub fn get_count(&self, primary: &P, secondary: &S) -> f64 {
        self.get_counter(primary).get_count(secondary)
    }

    /// A read-only view of `primary`'s row. Unknown primaries give an empty
    /// view.
    pub fn get_counter(&self, primary: &P) -> CounterView<'_, S> {
        let row = self
            .primary
            .code_of(primary)
            .and_then(|code| self.rows.get(code));
        CounterView {
            secondary: &self.secondary,
            row,
        }
    }

    /// Normalizes every row over its own populated slots.
    ///
    /// Rows that were never incremented are skipped.
    ///
    /// # Errors
    /// - `InvalidState` if a populated row sums to zero or less, or its sum
    ///   overflows to infinity; no row is modified in that case
    pub fn normalize(&mut self) -> Result<(), CountingError> {
        let populated = self.primary.len();
        for (code, row) in self.rows.iter().enumerate().take(populated) {
            if row.len() == 0 {
                continue;
            }
            let total = row.total();
            if !total.is_finite() || total <= 0.0 {
                return Err(CountingError::InvalidState(format!(
                    "Cannot normalize row {} with total {}",
                    code, total
                )));
            }
        }

        for row in self.rows.iter_mut().take(populated) {
            if row.len() == 0 {
                continue;
            }
            let total = row.total();
            for value in row.values.iter_mut() {
                *value /= total;
            }
        }
        self.normalized = true;
        debug!("Normalized {} rows", populated);
        Ok(())
    }

    pub fn arg_max(&self, primary: &P) -> Option<&S> {
        self.get_counter(primary).arg_max()
    }
}

impl<P, S> fmt::Display for CounterMap<P, S>
where
    P: Eq + Hash + Clone + fmt::Display,
    S: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for primary in self.keys() {
            writeln!(f, "{} : {}", primary, self.get_counter(primary))?;
        }
        Ok(())
    }
}

/// A borrowed, read-only distribution over one [`CounterMap`] row.
///
/// Only the row's populated slots are visible; every other secondary key
/// reads as zero.
#[derive(Debug)]
pub struct CounterView<'a, S> {
    secondary: &'a Encoding<S>,
    row: Option<&'a Row>,
}

impl<S> Clone for CounterView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for CounterView<'_, S> {}

impl<'a, S> CounterView<'a, S>
where
    S: Eq + Hash + Clone,
{
    pub fn get_count(&self, secondary: &S) -> f64 {
        let Some(row) = self.row else {
            return 0.0;
        };
        self.secondary
            .code_of(secondary)
            .and_then(|code| row.slot(code))
            .map_or(0.0, |slot| row.values[slot])
    }

    /// Number of populated slots in the row.
    pub fn len(&self) -> usize {
        self.row.map_or(0, Row::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_count(&self) -> f64 {
        self.row.map_or(0.0, Row::total)
    }

    /// The secondary key with the largest value; ties go to the key with the
    /// lowest secondary code.
    pub fn arg_max(&self) -> Option<&'a S> {
        let row = self.row?;
        let secondary = self.secondary;
        let mut best: Option<(usize, f64)> = None;
        for (&code, &value) in row.slot_codes.iter().zip(row.values.iter()) {
            match best {
                Some((best_code, best_value))
                    if value < best_value || (value == best_value && code > best_code) => {}
                _ => best = Some((code, value)),
            }
        }
        best.and_then(|(code, _)| secondary.decode(code).ok())
    }

    /// Populated secondary keys and their values, in the order they first
    /// appeared in this row.
    pub fn iter(&self) -> impl Iterator<Item = (&'a S, f64)> + 'a {
        let secondary = self.secondary;
        self.row
            .into_iter()
            .flat_map(|row| row.slot_codes.iter().zip(row.values.iter()))
            .filter_map(move |(&code, &value)| secondary.decode(code).ok().map(|key| (key, value)))
    }

    /// Projects the row onto the full secondary code space, with zeros for
    /// keys the row never saw.
    pub fn dense(&self) -> Array1<f64> {
        let mut dense = Array1::zeros(self.secondary.len());
        if let Some(row) = self.row {
            for (&code, &value) in row.slot_codes.iter().zip(row.values.iter()) {
                dense[code] = value;
            }
        }
        dense
    }
}

impl<S> fmt::Display for CounterView<'_, S>
where
    S: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (key, value) in self.iter() {
            write!(f, "{} : {}, ", key, value)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn spam_table() -> Result<CounterMap<&'static str, &'static str>, CountingError> {
        let mut table = CounterMap::new(2, 2);
        table.increment_count(&"porn", &"spam", 3.0)?;
        table.increment_count(&"porn", &"ham", 2.0)?;
        table.increment_count(&"vote", &"spam", 1.0)?;
        table.increment_count(&"vote", &"ham", 5.0)?;
        Ok(table)
    }

    #[test]
    fn test_rows_are_independent() -> Result<(), CountingError> {
        let mut table = CounterMap::new(4, 4);
        table.increment(&"x", &"p")?;
        table.increment(&"y", &"q")?;
        assert_eq!(table.get_count(&"x", &"q"), 0.0);
        assert_eq!(table.get_count(&"y", &"p"), 0.0);
        assert_eq!(table.get_count(&"x", &"p"), 1.0);
        assert_eq!(table.get_counter(&"x").len(), 1);
        Ok(())
    }

    #[test]
    fn test_lookup_miss_does_not_mutate() -> Result<(), CountingError> {
        let mut table = CounterMap::new(4, 4);
        table.increment(&"x", &"p")?;
        assert_eq!(table.get_count(&"x", &"unseen"), 0.0);
        assert_eq!(table.get_count(&"unseen", &"p"), 0.0);
        assert!(table.get_counter(&"unseen").is_empty());
        assert_eq!(table.arg_max(&"unseen"), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.secondary_encoding().len(), 1);
        Ok(())
    }

    #[test]
    fn test_normalize_per_row() -> Result<(), CountingError> {
        let mut table = spam_table()?;
        table.normalize()?;
        assert!((table.get_counter(&"porn").get_count(&"spam") - 0.6).abs() < TOLERANCE);
        assert!((table.get_counter(&"porn").get_count(&"ham") - 0.4).abs() < TOLERANCE);
        assert!((table.get_counter(&"vote").get_count(&"ham") - 5.0 / 6.0).abs() < TOLERANCE);
        assert_eq!(table.arg_max(&"porn"), Some(&"spam"));
        assert_eq!(table.arg_max(&"vote"), Some(&"ham"));
        Ok(())
    }

    #[test]
    fn test_normalize_keeps_sparse_support() -> Result<(), CountingError> {
        let mut table = CounterMap::new(2, 2);
        table.increment_count(&"a", &"x", 1.0)?;
        table.increment_count(&"a", &"y", 3.0)?;
        table.increment_count(&"b", &"z", 2.0)?;
        table.normalize()?;
        assert_eq!(table.get_count(&"b", &"z"), 1.0);
        assert_eq!(table.get_count(&"b", &"x"), 0.0);
        assert!((table.get_count(&"a", &"y") - 0.75).abs() < TOLERANCE);
        assert_eq!(table.get_counter(&"b").dense().to_vec(), vec![0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_normalize_zero_row_fails_without_mutation() -> Result<(), CountingError> {
        let mut table = CounterMap::new(2, 2);
        table.increment_count(&"a", &"x", 2.0)?;
        table.increment_count(&"b", &"x", 0.0)?;
        assert!(matches!(table.normalize(), Err(CountingError::InvalidState(_))));
        assert_eq!(table.get_count(&"a", &"x"), 2.0);
        assert!(!table.is_normalized());
        Ok(())
    }

    #[test]
    fn test_normalize_overflowed_row_fails_without_mutation() -> Result<(), CountingError> {
        let mut table = CounterMap::new(2, 2);
        table.increment_count(&"ok", &"a", 1.0)?;
        table.increment_count(&"r", &"a", 1e308)?;
        table.increment_count(&"r", &"a", 1e308)?;
        table.increment_count(&"r", &"b", 1.0)?;
        assert!(matches!(table.normalize(), Err(CountingError::InvalidState(_))));
        assert_eq!(table.get_count(&"r", &"a"), f64::INFINITY);
        assert_eq!(table.get_count(&"r", &"b"), 1.0);
        assert_eq!(table.get_count(&"ok", &"a"), 1.0);
        assert!(!table.is_normalized());
        Ok(())
    }

    #[test]
    fn test_non_finite_delta_rejected() {
        let mut table: CounterMap<&str, &str> = CounterMap::new(2, 2);
        assert!(matches!(
            table.increment_count(&"a", &"x", f64::NAN),
            Err(CountingError::ArgumentError(_))
        ));
        assert!(table.is_empty());
        assert!(table.secondary_encoding().is_empty());
    }

    #[test]
    fn test_growth_cascade() -> Result<(), CountingError> {
        let mut table = CounterMap::new(1, 1);
        for i in 0..200u32 {
            table.increment_count(&(i % 7), &i, f64::from(i))?;
            table.increment_count(&i, &0, 1.0)?;
        }
        for i in 0..200u32 {
            assert_eq!(table.get_count(&(i % 7), &i), f64::from(i) + if i == 0 { 1.0 } else { 0.0 });
        }
        assert_eq!(table.len(), 200);
        assert!(table.rows.len().is_power_of_two());
        for row in &table.rows {
            assert!(row.len() <= row.values.capacity());
        }
        Ok(())
    }

    #[test]
    fn test_arg_max_tie_goes_to_lowest_code() -> Result<(), CountingError> {
        let mut table = CounterMap::new(2, 2);
        table.increment(&"other", &"first")?;
        table.increment(&"row", &"second")?;
        table.increment(&"row", &"first")?;
        assert_eq!(table.arg_max(&"row"), Some(&"first"));
        Ok(())
    }

    #[test]
    fn test_view_iter_and_display() -> Result<(), CountingError> {
        let table = spam_table()?;
        let view = table.get_counter(&"vote");
        let entries: Vec<_> = view.iter().collect();
        assert_eq!(entries, vec![(&"spam", 1.0), (&"ham", 5.0)]);
        assert_eq!(view.total_count(), 6.0);
        assert_eq!(table.to_string(), "porn : [ spam : 3, ham : 2, ]\nvote : [ spam : 1, ham : 5, ]\n");
        Ok(())
    }
}
