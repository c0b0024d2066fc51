use std::collections::HashMap;

mod error;
mod features;
mod naive_bayes;
pub mod builder;

pub use error::ClassifierError;
pub use features::{
    BiCharacterExtractor, CharacterExtractor, ExtractorKind, FeatureExtractor, IdentityExtractor,
};
pub use naive_bayes::NaiveBayesClassifier;
pub use builder::ClassifierBuilder;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of distinct labels seen during training
    pub num_labels: usize,
    /// Labels in the order they were first seen
    pub labels: Vec<String>,
    /// Number of distinct features seen during training
    pub num_features: usize,
    /// Names of the feature extractors, in application order
    pub extractors: Vec<String>,
    /// How many training items carried each label
    pub label_counts: HashMap<String, f64>,
}
