use std::collections::HashMap;

use log::{debug, info};
use ndarray::Array1;

use super::builder::ClassifierBuilder;
use super::error::ClassifierError;
use super::features::FeatureExtractor;
use super::ClassifierInfo;
use crate::counting::utils::{add_in_place, arg_max, ln_in_place, normalize_in_place};
use crate::counting::{Counter, CounterMap, CounterMode, Encoding};
use crate::data::LabeledDatum;

/// A Naive Bayes text classifier over extracted string features.
///
/// Training counts how often each feature occurs with each label and turns
/// every feature's counts into a label distribution. Labeling starts from a
/// uniform prior over labels and multiplies in `P(label | feature)` for every
/// feature of the datum that was seen during training; features never seen
/// during training are ignored.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use tallier::{IdentityExtractor, LabeledDatum, NaiveBayesClassifier};
///
/// let mut classifier = NaiveBayesClassifier::builder()
///     .with_extractor(IdentityExtractor)
///     .build()?;
/// classifier.train(&[
///     LabeledDatum::new("porn", "spam"),
///     LabeledDatum::new("vote", "ham"),
/// ])?;
///
/// let (label, scores) = classifier.predict("vote")?;
/// assert_eq!(label, "ham");
/// assert_eq!(scores["ham"], 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NaiveBayesClassifier {
    extractors: Vec<Box<dyn FeatureExtractor>>,
    features: Encoding<String>,
    distribution: CounterMap<usize, String>,
    label_counts: Counter<String>,
    trained: bool,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<NaiveBayesClassifier>();
    }
};

impl NaiveBayesClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }

    pub(crate) fn new(
        extractors: Vec<Box<dyn FeatureExtractor>>,
        feature_capacity: usize,
        label_capacity: usize,
    ) -> Self {
        Self {
            extractors,
            features: Encoding::with_capacity(feature_capacity),
            distribution: CounterMap::new(feature_capacity, label_capacity),
            label_counts: Counter::new(label_capacity, CounterMode::Linear),
            trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// The per-feature label distributions, keyed by feature code.
    pub fn feature_distribution(&self) -> &CounterMap<usize, String> {
        &self.distribution
    }

    /// Maps feature names to the codes used as primary keys of
    /// [`feature_distribution`](Self::feature_distribution).
    pub fn feature_encoding(&self) -> &Encoding<String> {
        &self.features
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            num_labels: self.distribution.secondary_encoding().len(),
            labels: self.distribution.secondary_encoding().keys().cloned().collect(),
            num_features: self.features.len(),
            extractors: self.extractors.iter().map(|e| e.name().to_string()).collect(),
            label_counts: self
                .label_counts
                .iter()
                .map(|(label, count)| (label.clone(), count))
                .collect(),
        }
    }

    /// Counts features against labels and normalizes the counts into
    /// per-feature label distributions.
    ///
    /// # Errors
    /// - `ValidationError` if `data` is empty, contains an empty label, or
    ///   contains an item the extractors produce no features for
    /// - `TrainingError` if the classifier was already trained
    pub fn train(&mut self, data: &[LabeledDatum]) -> Result<(), ClassifierError> {
        if self.trained {
            return Err(ClassifierError::TrainingError(
                "Classifier has already been trained".into(),
            ));
        }
        if data.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Training data cannot be empty".into(),
            ));
        }
        if let Some(pos) = data.iter().position(|d| d.label.is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Label of training item {} cannot be empty",
                pos + 1
            )));
        }

        info!("Extracting features from {} training items", data.len());
        let extracted: Vec<Vec<String>> =
            data.iter().map(|item| self.extract_features(&item.datum)).collect();
        if let Some(pos) = extracted.iter().position(Vec::is_empty) {
            return Err(ClassifierError::ValidationError(format!(
                "Training item {} produces no features",
                pos + 1
            )));
        }

        for (item, features) in data.iter().zip(&extracted) {
            for feature in features {
                let code = self.features.encode(feature);
                self.distribution.increment(&code, &item.label)?;
            }
        }

        // Every label now has a code in the distribution; count labels over
        // that same code space.
        self.label_counts = Counter::with_encoding(
            self.distribution.secondary_encoding().clone(),
            CounterMode::Linear,
        );
        for item in data {
            self.label_counts.increment_count(&item.label, 1.0)?;
        }

        info!("Normalizing feature distribution");
        self.distribution.normalize()?;
        self.trained = true;

        info!(
            "Trained on {} items: {} features, {} labels",
            data.len(),
            self.features.len(),
            self.label_counts.len()
        );
        if let Some(label) = self.label_counts.arg_max() {
            debug!("Most frequent training label: {}", label);
        }
        Ok(())
    }

    /// Predicts the label of the input text and returns label scores.
    ///
    /// # Returns
    /// A tuple containing:
    /// * The predicted label; ties go to the label seen first during training
    /// * A HashMap of labels to their posterior probabilities. All scores are
    ///   zero when every label was ruled out by some feature
    ///
    /// # Errors
    /// - `ValidationError` if `text` is empty
    /// - `PredictionError` if the classifier has not been trained
    pub fn predict(&self, text: &str) -> Result<(String, HashMap<String, f64>), ClassifierError> {
        let log_scores = self.log_scores(text)?;
        let labels = self.distribution.secondary_encoding();

        let best = arg_max(&log_scores)
            .ok_or_else(|| ClassifierError::PredictionError("No labels available".into()))?;
        let label = labels.decode(best)?.clone();

        let best_score = log_scores[best];
        let posterior = if best_score == f64::NEG_INFINITY {
            debug!("Every label was ruled out for {:?}", text);
            Array1::zeros(log_scores.len())
        } else {
            let mut posterior = log_scores.mapv(|v| (v - best_score).exp());
            normalize_in_place(&mut posterior)?;
            posterior
        };

        let scores = labels
            .keys()
            .cloned()
            .zip(posterior.iter().copied())
            .collect();
        Ok((label, scores))
    }

    pub fn label(&self, text: &str) -> Result<String, ClassifierError> {
        self.predict(text).map(|(label, _)| label)
    }

    /// Posterior probability of the predicted label.
    pub fn score(&self, text: &str) -> Result<f64, ClassifierError> {
        let (label, scores) = self.predict(text)?;
        Ok(scores.get(&label).copied().unwrap_or(0.0))
    }

    /// Labels every datum, keyed by the datum itself.
    pub fn label_all<'a, I>(&self, data: I) -> Result<HashMap<String, String>, ClassifierError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        data.into_iter()
            .map(|datum| Ok((datum.to_string(), self.label(datum)?)))
            .collect()
    }

    fn extract_features(&self, datum: &str) -> Vec<String> {
        self.extractors
            .iter()
            .flat_map(|extractor| extractor.extract(datum))
            .collect()
    }

    /// Unnormalized log-posterior of every label, indexed by label code.
    fn log_scores(&self, text: &str) -> Result<Array1<f64>, ClassifierError> {
        if text.is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }
        if !self.trained {
            return Err(ClassifierError::PredictionError(
                "Classifier has not been trained".into(),
            ));
        }

        let num_labels = self.distribution.secondary_encoding().len();
        let mut scores = Array1::from_elem(num_labels, 1.0 / num_labels as f64);
        ln_in_place(&mut scores);

        let mut unseen = 0usize;
        for feature in self.extract_features(text) {
            let Some(code) = self.features.code_of(&feature) else {
                unseen += 1;
                continue;
            };
            let mut probabilities = self.distribution.get_counter(&code).dense();
            ln_in_place(&mut probabilities);
            add_in_place(&mut scores, &probabilities)?;
        }
        if unseen > 0 {
            debug!("Skipped {} unseen features in {:?}", unseen, text);
        }
        Ok(scores)
    }
}
