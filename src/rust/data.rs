use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Malformed line {line}: {content:?}")]
    Malformed { line: usize, content: String },
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
}

/// A datum paired with its gold label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabeledDatum {
    pub datum: String,
    pub label: String,
}

impl LabeledDatum {
    pub fn new(datum: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            datum: datum.into(),
            label: label.into(),
        }
    }
}

/// Reads `label<delimiter>datum` lines from `path`.
///
/// Blank lines are skipped. Everything after the first delimiter belongs to
/// the datum; a line with an empty label or an empty datum is malformed.
pub fn read_delimited<P: AsRef<Path>>(
    path: P,
    delimiter: &str,
) -> Result<Vec<LabeledDatum>, DataError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let data = parse_lines(reader.lines(), delimiter)?;
    debug!("Read {} labeled items from {}", data.len(), path.display());
    Ok(data)
}

/// Parses `label<delimiter>datum` lines from in-memory text.
pub fn parse_delimited(text: &str, delimiter: &str) -> Result<Vec<LabeledDatum>, DataError> {
    parse_lines(text.lines().map(|line| Ok(line.to_string())), delimiter)
}

fn parse_lines<I>(lines: I, delimiter: &str) -> Result<Vec<LabeledDatum>, DataError>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut data = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let malformed = || DataError::Malformed {
            line: idx + 1,
            content: line.to_string(),
        };
        let (label, datum) = line.split_once(delimiter).ok_or_else(malformed)?;
        if label.is_empty() || datum.is_empty() {
            return Err(malformed());
        }
        data.push(LabeledDatum::new(datum, label));
    }
    Ok(data)
}
