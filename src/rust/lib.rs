//! Symbol interning, dense encodings and sparse count tables, with a small
//! Naive Bayes text classifier built on top of them.
//!
//! # Count tables
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tallier::CounterMap;
//!
//! let mut table = CounterMap::new(64, 4);
//! table.increment(&"porn".to_string(), &"spam".to_string())?;
//! table.increment(&"vote".to_string(), &"ham".to_string())?;
//! table.normalize()?;
//!
//! assert_eq!(table.arg_max(&"vote".to_string()), Some(&"ham".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! # Classification
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tallier::{LabeledDatum, NaiveBayesClassifier};
//!
//! let mut classifier = NaiveBayesClassifier::builder().build()?;
//! classifier.train(&[
//!     LabeledDatum::new("Aspirin", "drug"),
//!     LabeledDatum::new("Ibuprofen", "drug"),
//!     LabeledDatum::new("Lake Geneva", "place"),
//!     LabeledDatum::new("Port Townsend", "place"),
//! ])?;
//!
//! let (label, scores) = classifier.predict("Lake City")?;
//! println!("Predicted label: {} ({:.2})", label, scores[&label]);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! None of the tables lock internally. Lookups take `&self` and updates take
//! `&mut self`, so a trained classifier can be shared across threads with `Arc`
//! while training needs exclusive access.

pub mod classifier;
pub mod config;
pub mod counting;
pub mod data;

pub use classifier::{
    BiCharacterExtractor, CharacterExtractor, ClassifierBuilder, ClassifierError, ClassifierInfo,
    ExtractorKind, FeatureExtractor, IdentityExtractor, NaiveBayesClassifier,
};
pub use config::ClassifierConfig;
pub use counting::{
    Counter, CounterMap, CounterMode, CounterView, CountingError, Encoding, Interner,
};
pub use data::{parse_delimited, read_delimited, DataError, LabeledDatum};

pub fn init_logger() {
    env_logger::init();
}
