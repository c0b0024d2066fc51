use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::ExtractorKind;
use crate::data::DataError;

/// Sizing and feature settings for a classifier.
///
/// Capacities are only starting sizes; every table grows by doubling past them.
///
/// ```
/// use tallier::ClassifierConfig;
///
/// let config: ClassifierConfig = serde_json::from_str(r#"{ "extractors": ["identity"] }"#)?;
/// assert_eq!(config.feature_capacity, ClassifierConfig::default().feature_capacity);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Expected number of distinct features
    pub feature_capacity: usize,
    /// Expected number of distinct labels
    pub label_capacity: usize,
    /// Feature extractors applied to every datum, in order
    pub extractors: Vec<ExtractorKind>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            feature_capacity: 128,
            label_capacity: 4,
            extractors: vec![ExtractorKind::Character, ExtractorKind::BiCharacter],
        }
    }
}

impl ClassifierConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(
            config.extractors,
            vec![ExtractorKind::Character, ExtractorKind::BiCharacter]
        );
    }

    #[test]
    fn test_config_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{ "feature_capacity": 16, "extractors": ["identity"] }}"#)?;
        let config = ClassifierConfig::from_json_file(file.path())?;
        assert_eq!(config.feature_capacity, 16);
        assert_eq!(config.label_capacity, 4);
        assert_eq!(config.extractors, vec![ExtractorKind::Identity]);
        Ok(())
    }

    #[test]
    fn test_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{ "extractors": ["trigram"] }}"#)?;
        assert!(matches!(
            ClassifierConfig::from_json_file(file.path()),
            Err(DataError::ConfigError(_))
        ));
        Ok(())
    }
}
