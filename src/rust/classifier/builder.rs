use log::info;

use super::error::ClassifierError;
use super::features::FeatureExtractor;
use super::naive_bayes::NaiveBayesClassifier;
use crate::config::ClassifierConfig;

/// A builder for constructing a NaiveBayesClassifier with a fluent interface.
#[derive(Debug, Default)]
pub struct ClassifierBuilder {
    config: ClassifierConfig,
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl ClassifierBuilder {
    /// Creates a new ClassifierBuilder with the default configuration
    ///
    /// # Example
    /// ```
    /// use tallier::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
            extractors: Vec::new(),
        }
    }

    /// Sets the configuration used for table sizing and, unless extractors
    /// are added explicitly, for choosing feature extractors
    ///
    /// # Example
    /// ```
    /// use tallier::{ClassifierBuilder, ClassifierConfig};
    ///
    /// let config = ClassifierConfig {
    ///     feature_capacity: 1024,
    ///     ..ClassifierConfig::default()
    /// };
    /// let builder = ClassifierBuilder::new().with_config(config);
    /// ```
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a feature extractor. Once any extractor is added explicitly, the
    /// extractors listed in the configuration are ignored.
    ///
    /// # Example
    /// ```
    /// use tallier::{ClassifierBuilder, IdentityExtractor};
    ///
    /// let builder = ClassifierBuilder::new().with_extractor(IdentityExtractor);
    /// ```
    pub fn with_extractor(mut self, extractor: impl FeatureExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Builds an untrained classifier
    ///
    /// # Returns
    /// * `Result<NaiveBayesClassifier, ClassifierError>` - The classifier if successful, or an error if:
    ///   - No feature extractor is configured
    ///   - A capacity hint is zero
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use tallier::{ClassifierBuilder, LabeledDatum};
    ///
    /// let mut classifier = ClassifierBuilder::new().build()?;
    /// classifier.train(&[LabeledDatum::new("Aspirin", "drug")])?;
    /// assert_eq!(classifier.label("Aspirin")?, "drug");
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<NaiveBayesClassifier, ClassifierError> {
        let ClassifierBuilder { config, extractors } = self;

        if config.feature_capacity == 0 || config.label_capacity == 0 {
            return Err(ClassifierError::ValidationError(
                "Capacity hints must be greater than zero".into(),
            ));
        }

        let extractors = if extractors.is_empty() {
            config.extractors.iter().map(|kind| kind.build()).collect()
        } else {
            extractors
        };
        if extractors.is_empty() {
            return Err(ClassifierError::BuildError(
                "At least one feature extractor is required".into(),
            ));
        }

        info!(
            "Building classifier with extractors: {}",
            extractors
                .iter()
                .map(|e| e.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(NaiveBayesClassifier::new(
            extractors,
            config.feature_capacity,
            config.label_capacity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CharacterExtractor, ExtractorKind, IdentityExtractor};

    #[test]
    fn test_default_extractors() -> Result<(), ClassifierError> {
        let classifier = ClassifierBuilder::new().build()?;
        assert_eq!(classifier.info().extractors, vec!["character", "bi_character"]);
        Ok(())
    }

    #[test]
    fn test_explicit_extractors_override_config() -> Result<(), ClassifierError> {
        let classifier = ClassifierBuilder::new()
            .with_extractor(IdentityExtractor)
            .with_extractor(CharacterExtractor)
            .build()?;
        assert_eq!(classifier.info().extractors, vec!["identity", "character"]);
        Ok(())
    }

    #[test]
    fn test_no_extractors() {
        let config = ClassifierConfig {
            extractors: Vec::new(),
            ..ClassifierConfig::default()
        };
        let result = ClassifierBuilder::new().with_config(config).build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_zero_capacity() {
        let config = ClassifierConfig {
            label_capacity: 0,
            extractors: vec![ExtractorKind::Identity],
            ..ClassifierConfig::default()
        };
        let result = ClassifierBuilder::new().with_config(config).build();
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }
}
