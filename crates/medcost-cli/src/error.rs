//! Error types for medcost-cli

use medcost::error::{ErrorKind, MedcostError};
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Pipeline failure, shown to the user through the report layer
    #[error("{}", medcost::report::error_message(.0))]
    Prediction(#[from] MedcostError),

    /// Output could not be serialized
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Get exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            Self::Prediction(err) => match err.kind() {
                ErrorKind::UnrecognizedCategory | ErrorKind::OutOfRange => 2,
                ErrorKind::ArtifactUnavailable => 3,
                ErrorKind::SchemaMismatch => 4,
                ErrorKind::InferenceFailure => 5,
                ErrorKind::Config => 6,
            },
            Self::Json(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcost::error::ArtifactError;

    #[test]
    fn test_exit_codes_per_kind() {
        let cases = [
            (
                MedcostError::UnrecognizedCategory {
                    field: "sex",
                    value: "x".into(),
                },
                2,
            ),
            (
                MedcostError::OutOfRange {
                    field: "age",
                    value: 130.0,
                    min: 0.0,
                    max: 120.0,
                },
                2,
            ),
            (MedcostError::artifact("m.apr", ArtifactError::NotFound), 3),
            (
                MedcostError::SchemaMismatch {
                    expected: vec![],
                    actual: vec![],
                    detail: String::new(),
                },
                4,
            ),
            (MedcostError::InferenceFailure("boom".into()), 5),
            (MedcostError::Config("bad".into()), 6),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).code(), code);
        }
    }

    #[test]
    fn test_missing_artifact_displays_rendered_message() {
        let err = CliError::from(MedcostError::artifact("rfr_model.apr", ArtifactError::NotFound));
        assert!(err.to_string().contains("'rfr_model.apr' was not found"));
    }
}
