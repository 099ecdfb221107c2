use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Load-time errors
// ---------------------------------------------------------------------------

/// The source could not be turned into a dataset at all. Nothing partial is
/// ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV input: {0}")]
    Malformed(#[from] csv::Error),

    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// A single row whose field could not be parsed into its typed form.
///
/// Rows carrying one of these are dropped by the loader and kept on
/// [`Dataset::rejected`](super::model::Dataset::rejected).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row}: cannot parse {field} from '{value}': {reason}")]
pub struct FieldParseError {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Query-time errors
// ---------------------------------------------------------------------------

/// An aggregate that needs at least one record was asked of an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{aggregate} is undefined for an empty selection")]
pub struct EmptyResultError {
    pub aggregate: &'static str,
}

impl EmptyResultError {
    pub(crate) fn new(aggregate: &'static str) -> Self {
        Self { aggregate }
    }
}

/// Rejected filter or chart parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CriteriaError {
    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("range bound {0} is not a finite number")]
    NonFiniteBound(f64),

    #[error("a histogram needs at least one bin")]
    ZeroBins,
}
