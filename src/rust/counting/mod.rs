//! Interning, dense encodings and sparse count tables.
//!
//! Values are first canonicalized by an [`Interner`], then given dense codes
//! by an [`Encoding`]. [`Counter`] and [`CounterMap`] accumulate counts over
//! those codes and turn them into distributions.

mod counter;
mod counter_map;
mod encoding;
mod error;
mod interner;
pub mod utils;

pub use counter::{Counter, CounterMode};
pub use counter_map::{CounterMap, CounterView};
pub use encoding::{Encoding, DEFAULT_CAPACITY};
pub use error::CountingError;
pub use interner::Interner;
