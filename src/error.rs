use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Problems with the filter configuration, reported before any record is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Nonnumeric value ({value}) for operator {operator}")]
    NonNumericThreshold { operator: String, value: String },

    #[error("Unknown operation for filter: {0}")]
    UnknownOperator(String),

    #[error("Invalid region bound: {0} (use -1 for an open bound)")]
    InvalidRegionBound(String),

    #[error("Call rate must be between 0 and 1, got {0}")]
    InvalidCallRate(f64),

    #[error("Only one inheritance model may be given (dominant or recessive)")]
    ConflictingInheritanceModels,
}

/// Problems with a single data line. The stream driver skips such records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed record: expected {expected} fields, found {found}")]
    MalformedRecord { expected: usize, found: usize },

    #[error("Invalid QUAL value: {0}")]
    InvalidQual(String),

    #[error("Invalid POS value: {0}")]
    InvalidPos(String),

    #[error("Invalid genotype: {0}")]
    InvalidGenotype(String),

    #[error("Line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: niffler::Error,
    },

    #[error("File given is not a VCF file")]
    MissingSignature,

    #[error("Malformed line {line_number} before the column header: {line}")]
    MalformedHeader { line_number: usize, line: String },

    #[error("No column header (#CHROM ...) found")]
    MissingHeader,

    #[error("Invalid column header: {0}")]
    InvalidHeader(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Line {line_number}: {source}")]
    Record {
        line_number: usize,
        #[source]
        source: RecordError,
    },
}

impl Error {
    /// Whether the error concerns a single data line rather than the whole run.
    pub fn is_record_error(&self) -> bool {
        matches!(self, Error::Record { .. })
    }
}
