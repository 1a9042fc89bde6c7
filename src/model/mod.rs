//! Model artifacts: the black box the prediction service calls.
//!
//! A [`ModelArtifact`] declares the ordered feature names it was trained on
//! and predicts one value per input row. The shipped implementation is
//! [`ForestModel`], read from an APR container or a bincode file by
//! [`load_artifact`].

mod forest;

pub use forest::{ForestModel, FOREST_MODEL_TYPE};

use crate::error::{ArtifactError, MedcostError, Result};
use crate::serialization::AprReader;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Result of a model call. Model internals report plain messages; the
/// prediction service wraps them into [`MedcostError::InferenceFailure`].
pub type ModelResult<T> = std::result::Result<T, String>;

/// A trained regression model, read-only after load.
pub trait ModelArtifact: Send + Sync + fmt::Debug {
    /// Feature names in the order the model was trained with.
    fn feature_names(&self) -> &[String];

    /// Predicts one value per row.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the model could not predict.
    fn predict(&self, rows: &[&[f32]]) -> ModelResult<Vec<f64>>;

    /// Descriptive summary for inspection tooling.
    fn describe(&self) -> ArtifactSummary {
        ArtifactSummary {
            model_type: "unknown".to_string(),
            n_estimators: None,
            max_depth: None,
            feature_names: self.feature_names().to_vec(),
        }
    }
}

/// What an artifact reports about itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactSummary {
    /// Model family identifier
    pub model_type: String,
    /// Ensemble size, if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<usize>,
    /// Deepest tree, if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Declared feature names, in order
    pub feature_names: Vec<String>,
}

/// On-disk encoding of an artifact, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// APR container (`"APR1"` magic)
    Apr,
    /// bincode-serialized [`ForestModel`]
    Bincode,
}

impl ArtifactFormat {
    /// Detects the encoding of `bytes`.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        if AprReader::is_apr(bytes) {
            Self::Apr
        } else {
            Self::Bincode
        }
    }
}

/// Decodes an artifact from bytes.
///
/// # Errors
///
/// Returns [`ArtifactError::Corrupt`] if the bytes are not a valid artifact.
pub fn decode_artifact(bytes: Vec<u8>) -> std::result::Result<ForestModel, ArtifactError> {
    let model = match ArtifactFormat::detect(&bytes) {
        ArtifactFormat::Apr => {
            let reader = AprReader::from_bytes(bytes).map_err(ArtifactError::Corrupt)?;
            ForestModel::from_apr(&reader)
        }
        ArtifactFormat::Bincode => ForestModel::from_bincode(&bytes),
    }
    .map_err(ArtifactError::Corrupt)?;
    Ok(model)
}

/// Reads and decodes the artifact at `path`.
///
/// # Errors
///
/// Returns [`MedcostError::ArtifactUnavailable`] if the file is missing,
/// unreadable, or not a valid artifact.
pub fn load_artifact(path: &Path) -> Result<Arc<dyn ModelArtifact>> {
    let bytes =
        std::fs::read(path).map_err(|e| MedcostError::artifact(path, ArtifactError::from_io(e)))?;
    let model = decode_artifact(bytes).map_err(|e| MedcostError::artifact(path, e))?;
    log::info!(
        "loaded {} with {} trees and {} features from {}",
        FOREST_MODEL_TYPE,
        model.forest().n_estimators(),
        model.feature_names().len(),
        path.display()
    );
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests;
