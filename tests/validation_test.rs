use tallier::{
    parse_delimited, CharacterExtractor, ClassifierConfig, ClassifierError, DataError,
    LabeledDatum, NaiveBayesClassifier,
};

#[test]
fn test_predict_before_training() -> Result<(), ClassifierError> {
    let classifier = NaiveBayesClassifier::builder().build()?;
    assert!(!classifier.is_trained());
    assert!(matches!(
        classifier.predict("Aspirin"),
        Err(ClassifierError::PredictionError(_))
    ));
    Ok(())
}

#[test]
fn test_empty_input() -> Result<(), ClassifierError> {
    let mut classifier = NaiveBayesClassifier::builder().build()?;
    classifier.train(&[LabeledDatum::new("Aspirin", "drug")])?;
    let result = classifier.predict("");
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    Ok(())
}

#[test]
fn test_empty_training_set() -> Result<(), ClassifierError> {
    let mut classifier = NaiveBayesClassifier::builder().build()?;
    assert!(matches!(
        classifier.train(&[]),
        Err(ClassifierError::ValidationError(_))
    ));
    assert!(!classifier.is_trained());
    Ok(())
}

#[test]
fn test_training_item_without_features() -> Result<(), ClassifierError> {
    let mut classifier = NaiveBayesClassifier::builder()
        .with_extractor(CharacterExtractor)
        .build()?;
    let data = vec![
        LabeledDatum::new("Aspirin", "drug"),
        LabeledDatum::new("", "spam"),
    ];
    assert!(matches!(
        classifier.train(&data),
        Err(ClassifierError::ValidationError(_))
    ));
    assert!(!classifier.is_trained());
    assert_eq!(classifier.info().num_labels, 0);
    Ok(())
}

#[test]
fn test_retraining_is_rejected() -> Result<(), ClassifierError> {
    let mut classifier = NaiveBayesClassifier::builder().build()?;
    let data = vec![LabeledDatum::new("Aspirin", "drug")];
    classifier.train(&data)?;
    let result = classifier.train(&data);
    assert!(matches!(result, Err(ClassifierError::TrainingError(_))));
    Ok(())
}

#[test]
fn test_build_without_extractors() {
    let config = ClassifierConfig {
        extractors: vec![],
        ..ClassifierConfig::default()
    };
    let result = NaiveBayesClassifier::builder().with_config(config).build();
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_malformed_data_converts_to_classifier_error() {
    let err = parse_delimited("just one column", "\t").unwrap_err();
    assert!(matches!(err, DataError::Malformed { line: 1, .. }));
    let err: ClassifierError = err.into();
    assert!(err.to_string().starts_with("Data error:"));
}
