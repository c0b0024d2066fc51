use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tallier::{ClassifierConfig, Counter, CounterMode, NaiveBayesClassifier, read_delimited};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Training data, one `label<delimiter>datum` pair per line
    #[arg(long)]
    train: PathBuf,

    /// Test data in the same format as the training data
    #[arg(long)]
    test: PathBuf,

    /// Separator between label and datum
    #[arg(short, long, default_value = "\t")]
    delimiter: String,

    /// JSON classifier configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the chosen label for every test item
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("*** Naive Bayes Classifier ***");

    let config = match &args.config {
        Some(path) => ClassifierConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ClassifierConfig::default(),
    };

    let training = read_delimited(&args.train, &args.delimiter)
        .with_context(|| format!("Failed to read training data from {}", args.train.display()))?;
    let test = read_delimited(&args.test, &args.delimiter)
        .with_context(|| format!("Failed to read test data from {}", args.test.display()))?;

    let start_time = Instant::now();
    let mut classifier = NaiveBayesClassifier::builder().with_config(config).build()?;
    classifier.train(&training)?;
    info!("Training took {:.2?}", start_time.elapsed());

    let guessed: HashMap<String, String> =
        classifier.label_all(test.iter().map(|item| item.datum.as_str()))?;

    let mut misses = Counter::new(8, CounterMode::Linear);
    let mut correct = 0usize;
    for item in &test {
        let guess = &guessed[&item.datum];
        if args.verbose {
            println!("{}: Chose label {}", item.datum, guess);
        }
        if *guess == item.label {
            correct += 1;
        } else {
            misses.increment_count(&item.label, 1.0)?;
        }
    }

    println!("Correctly labeled {} of {}", correct, test.len());
    if let Some(label) = misses.arg_max() {
        println!("Most often missed label: {} ({})", label, misses.get_count(label));
    }
    info!("Total time: {:.2?}", start_time.elapsed());

    Ok(())
}
