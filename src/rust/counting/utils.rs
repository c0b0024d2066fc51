use ndarray::{Array1, Zip};

use super::error::CountingError;

/// Grows `vec` so it can hold at least `needed` elements, doubling its
/// capacity on every step. Never shrinks.
pub(crate) fn grow_doubling<T>(vec: &mut Vec<T>, needed: usize) {
    let capacity = vec.capacity();
    if needed <= capacity {
        return;
    }
    let mut target = capacity.max(1);
    while target < needed {
        target *= 2;
    }
    vec.reserve_exact(target - vec.len());
}

/// Resizes `vec` to at least `needed` elements filled with `fill`, doubling
/// its length on every step.
pub(crate) fn resize_doubling<T: Clone>(vec: &mut Vec<T>, needed: usize, fill: T) {
    if needed <= vec.len() {
        return;
    }
    let mut target = vec.len().max(1);
    while target < needed {
        target *= 2;
    }
    grow_doubling(vec, target);
    vec.resize(target, fill);
}

pub fn sum(values: &Array1<f64>) -> f64 {
    values.iter().sum()
}

/// Index of the first strict maximum, or `None` for an empty vector.
pub fn arg_max(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

pub fn add_in_place(x: &mut Array1<f64>, y: &Array1<f64>) -> Result<(), CountingError> {
    if x.len() != y.len() {
        return Err(CountingError::length_mismatch(x.len(), y.len()));
    }
    Zip::from(x).and(y).for_each(|a, &b| *a += b);
    Ok(())
}

pub fn ln_in_place(x: &mut Array1<f64>) {
    x.mapv_inplace(f64::ln);
}

/// Divides every element by the vector's sum.
pub fn normalize_in_place(x: &mut Array1<f64>) -> Result<(), CountingError> {
    let total = sum(x);
    if total <= 0.0 || !total.is_finite() {
        return Err(CountingError::InvalidState(format!(
            "Cannot normalize a vector with total {}",
            total
        )));
    }
    x.mapv_inplace(|v| v / total);
    Ok(())
}
