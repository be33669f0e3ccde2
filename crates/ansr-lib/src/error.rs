use std::path::PathBuf;
use thiserror::Error;

/// Rejected pipeline construction arguments. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample_rate must be a positive integer (got {0})")]
    BadSampleRate(u32),
    #[error("time_window must be a positive integer (got {0})")]
    BadTimeWindow(u32),
    #[error("data path {} does not exist", .0.display())]
    MissingDataPath(PathBuf),
}

/// Rejected weight set. Fatal when constructing, reported and ignored when
/// swapping weights on a live pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightsError {
    #[error("expected exactly 3 weights, got {0}")]
    WrongCount(usize),
    #[error("weights must be listed as ECG, GSR, RESP (got {0:?})")]
    BadNames(Vec<String>),
    #[error("weight {name} must be a finite number (got {value})")]
    NotFinite { name: &'static str, value: f64 },
    #[error("weight {name} must be non-negative (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("weights must sum to 1 (got {0})")]
    BadSum(f64),
}

/// Failure to materialize a recording from the input table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reading input table: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected 4 columns (TIME, ECG, GSR, RESP), got {0}")]
    ColumnCount(usize),
    #[error("row {row}, column {column}: {value:?} is not a finite number")]
    BadValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Failure reported by a beat detector or respiration estimator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("chunk of {samples} samples is below the detector minimum")]
    ChunkTooShort { samples: usize },
    #[error("found {found} beats, need at least 2")]
    TooFewBeats { found: usize },
    #[error("found {found} breath cycles, need at least 2")]
    TooFewBreaths { found: usize },
    #[error("rate series has {got} samples, expected {expected}")]
    RateLengthMismatch { expected: usize, got: usize },
}

/// Umbrella error for pipeline stage transitions.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("breathing-rate extraction failed: {0}")]
    Extraction(#[from] DetectionError),
}
