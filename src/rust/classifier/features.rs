use std::fmt;

use serde::{Deserialize, Serialize};

/// Turns a datum into the names of the features it exhibits.
///
/// Extractors only produce feature names. The classifier maps names to codes
/// through its feature encoding, assigning new codes while training and only
/// looking codes up while labeling.
pub trait FeatureExtractor: fmt::Debug + Send + Sync {
    /// Short name used in logs and classifier info
    fn name(&self) -> &'static str;

    /// Returns the feature names for `datum`, one entry per occurrence
    fn extract(&self, datum: &str) -> Vec<String>;
}

/// Emits the whole datum as a single feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl FeatureExtractor for IdentityExtractor {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn extract(&self, datum: &str) -> Vec<String> {
        vec![format!("IDENTITY-{}", datum)]
    }
}

/// Emits one feature per character.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterExtractor;

impl FeatureExtractor for CharacterExtractor {
    fn name(&self) -> &'static str {
        "character"
    }

    fn extract(&self, datum: &str) -> Vec<String> {
        datum.chars().map(|c| format!("CHAR-{}", c)).collect()
    }
}

/// Emits one feature per character paired with the character before it.
/// The first character is paired with `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiCharacterExtractor;

impl FeatureExtractor for BiCharacterExtractor {
    fn name(&self) -> &'static str {
        "bi_character"
    }

    fn extract(&self, datum: &str) -> Vec<String> {
        let mut last = '_';
        datum
            .chars()
            .map(|c| {
                let feature = format!("CHAR-{}{}", last, c);
                last = c;
                feature
            })
            .collect()
    }
}

/// Names a built-in extractor in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    Identity,
    Character,
    BiCharacter,
}

impl ExtractorKind {
    pub fn build(self) -> Box<dyn FeatureExtractor> {
        match self {
            ExtractorKind::Identity => Box::new(IdentityExtractor),
            ExtractorKind::Character => Box::new(CharacterExtractor),
            ExtractorKind::BiCharacter => Box::new(BiCharacterExtractor),
        }
    }
}
