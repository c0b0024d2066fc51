use thiserror::Error;

/// Errors raised by the interning, encoding and counting tables.
///
/// Every error is returned synchronously from the call that caused it. A
/// failed call leaves the table it was invoked on unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CountingError {
    /// A code was decoded that the encoding never assigned
    #[error("Code {code} is out of range for an encoding of size {size}")]
    IndexOutOfRange { code: usize, size: usize },
    /// The table is in a state the operation cannot handle, such as
    /// normalizing a counter whose total is zero
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A caller-supplied value was rejected: a non-finite delta, or vectors
    /// of mismatched length
    #[error("Invalid argument: {0}")]
    ArgumentError(String),
}

impl CountingError {
    pub(crate) fn non_finite_delta(delta: f64) -> Self {
        CountingError::ArgumentError(format!("Delta must be a finite number, got {}", delta))
    }

    pub(crate) fn length_mismatch(left: usize, right: usize) -> Self {
        CountingError::ArgumentError(format!(
            "Vector lengths do not match: {} vs {}",
            left, right
        ))
    }
}
