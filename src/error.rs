//! Error types for medcost operations.
//!
//! Every failure the pipeline can produce is returned as a [`MedcostError`]
//! value. Callers match on [`MedcostError::kind`] to pick a user-facing
//! message; nothing in this crate aborts the host process.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the prediction pipeline.
///
/// # Examples
///
/// ```
/// use medcost::error::{ErrorKind, MedcostError};
///
/// let err = MedcostError::UnrecognizedCategory {
///     field: "region",
///     value: "midwest".to_string(),
/// };
/// assert_eq!(err.kind(), ErrorKind::UnrecognizedCategory);
/// assert!(err.to_string().contains("midwest"));
/// ```
#[derive(Error, Debug)]
pub enum MedcostError {
    /// A raw category label matched none of the known categories.
    #[error("unrecognized {field} category: {value:?}")]
    UnrecognizedCategory {
        /// Input field the label was supplied for
        field: &'static str,
        /// Label as received
        value: String,
    },

    /// A numeric input lies outside its documented range.
    #[error("{field} = {value} is out of range, expected {min}..={max}")]
    OutOfRange {
        /// Input field name
        field: &'static str,
        /// Value as received
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// The model artifact could not be located or deserialized.
    #[error("model artifact unavailable at {}: {source}", path.display())]
    ArtifactUnavailable {
        /// Configured artifact location
        path: PathBuf,
        /// Underlying load failure
        #[source]
        source: ArtifactError,
    },

    /// Encoder output disagrees with the artifact's declared feature names.
    #[error("feature schema mismatch: {detail}")]
    SchemaMismatch {
        /// Feature names declared by the artifact
        expected: Vec<String>,
        /// Feature names carried by the vector
        actual: Vec<String>,
        /// First discrepancy found
        detail: String,
    },

    /// The model raised an error while predicting.
    #[error("inference failed: {0}")]
    InferenceFailure(String),

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Reason an artifact failed to load.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Nothing exists at the configured path.
    #[error("file not found")]
    NotFound,

    /// The file exists but could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but its contents are not a valid artifact.
    #[error("corrupt artifact: {0}")]
    Corrupt(String),
}

impl ArtifactError {
    /// Classify an I/O error, keeping `NotFound` distinct.
    #[must_use]
    pub fn from_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(err)
        }
    }
}

/// Failure class of a [`MedcostError`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`MedcostError::UnrecognizedCategory`]
    UnrecognizedCategory,
    /// See [`MedcostError::OutOfRange`]
    OutOfRange,
    /// See [`MedcostError::ArtifactUnavailable`]
    ArtifactUnavailable,
    /// See [`MedcostError::SchemaMismatch`]
    SchemaMismatch,
    /// See [`MedcostError::InferenceFailure`]
    InferenceFailure,
    /// See [`MedcostError::Config`]
    Config,
}

impl MedcostError {
    /// Returns the failure class.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedCategory { .. } => ErrorKind::UnrecognizedCategory,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::ArtifactUnavailable { .. } => ErrorKind::ArtifactUnavailable,
            Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            Self::InferenceFailure(_) => ErrorKind::InferenceFailure,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Create an artifact error for `path`.
    #[must_use]
    pub fn artifact(path: impl Into<PathBuf>, source: ArtifactError) -> Self {
        Self::ArtifactUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True when the artifact file simply does not exist.
    #[must_use]
    pub fn is_missing_artifact(&self) -> bool {
        matches!(
            self,
            Self::ArtifactUnavailable {
                source: ArtifactError::NotFound,
                ..
            }
        )
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, MedcostError>;
