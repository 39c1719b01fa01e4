//! Error types for sortplot.

use std::{fmt, path::PathBuf};
use thiserror::Error;

/// The wrapper for the error kind, with an optional hint.
#[derive(Debug)]
pub struct SortplotError {
    kind: SortplotErrorKind,
    hint: Option<String>,
}

/// All types of errors that can occur in sortplot.
#[derive(Error, Debug)]
pub enum SortplotErrorKind {
    #[error("Input file does not exist: {path}")]
    InputFileNotFound { path: PathBuf },

    #[error("Missing column '{column}' in header of {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Invalid value for n on line {line}: '{value}' is not a non-negative integer")]
    InvalidSize { value: String, line: u64 },

    #[error("Invalid value for time_ms on line {line}: '{value}' is not a non-negative number")]
    InvalidTime { value: String, line: u64 },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chart generation error: {0}")]
    ChartGenerationError(#[from] charming::EchartsError),

    #[error("Failed to write chart {path}: {reason}")]
    ChartWriteFailed { path: PathBuf, reason: String },

    #[error("{failed} of {total} chart(s) could not be written")]
    RenderFailures { failed: usize, total: usize },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Config file does not exist: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

impl SortplotError {
    /// Attaches a hint to the error
    pub fn with_hint(mut self, hint: Option<impl Into<String>>) -> Self {
        if let Some(hint) = hint {
            self.hint = Some(hint.into());
        }
        self
    }

    pub fn kind(&self) -> &SortplotErrorKind {
        &self.kind
    }
}

impl fmt::Display for SortplotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint_text) = &self.hint {
            write!(f, " ({hint_text})")?;
        }

        Ok(())
    }
}

impl std::error::Error for SortplotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Convert anything a SortplotErrorKind can be built from
impl<E> From<E> for SortplotError
where
    SortplotErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        SortplotError {
            kind: SortplotErrorKind::from(error),
            hint: None,
        }
    }
}

impl From<figment::Error> for SortplotErrorKind {
    fn from(error: figment::Error) -> Self {
        SortplotErrorKind::ConfigError(Box::new(error))
    }
}

/// A convenient result type for sortplot
pub type Result<T> = std::result::Result<T, SortplotError>;
