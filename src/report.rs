//! User-facing messages for prediction outcomes.
//!
//! Collaborators that display results (a form, a terminal) call [`render`]
//! and show the text as-is.

use crate::error::{ErrorKind, MedcostError, Result};
use crate::inference::Prediction;

/// Tone of a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prediction succeeded
    Success,
    /// Prediction failed
    Error,
}

/// Message for a successful prediction.
#[must_use]
pub fn success_message(prediction: &Prediction) -> String {
    format!("Based on the data you entered, the predicted medical cost for this customer is {prediction}")
}

/// Message for a failed prediction.
#[must_use]
pub fn error_message(err: &MedcostError) -> String {
    match err {
        MedcostError::ArtifactUnavailable { path, .. } if err.is_missing_artifact() => format!(
            "Model file '{}' was not found. Make sure the model artifact is available at the configured location.",
            path.display()
        ),
        _ => match err.kind() {
            ErrorKind::UnrecognizedCategory | ErrorKind::OutOfRange => {
                format!("Invalid input: {err}")
            }
            _ => format!("Prediction failed: {err}"),
        },
    }
}

/// Renders an outcome into its severity and display text.
///
/// # Examples
///
/// ```
/// use medcost::inference::Prediction;
/// use medcost::report::{render, Severity};
///
/// let (severity, text) = render(&Ok(Prediction::new(4500.125)));
/// assert_eq!(severity, Severity::Success);
/// assert!(text.ends_with("4500.13"));
/// ```
#[must_use]
pub fn render(outcome: &Result<Prediction>) -> (Severity, String) {
    match outcome {
        Ok(prediction) => (Severity::Success, success_message(prediction)),
        Err(err) => (Severity::Error, error_message(err)),
    }
}
