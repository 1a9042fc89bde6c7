//! Prediction service configuration.
//!
//! ```toml
//! model_path = "models/rfr_model.apr"
//! eager_load = true
//! ```

use crate::error::{MedcostError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default artifact file name, resolved relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "rfr_model.apr";

/// Settings for [`crate::inference::PredictionService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    /// Location of the model artifact.
    pub model_path: PathBuf,
    /// Load the artifact when the service opens rather than on first use.
    pub eager_load: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            eager_load: false,
        }
    }
}

impl PredictorConfig {
    /// Config pointing at `model_path`, other settings default.
    #[must_use]
    pub fn with_model_path(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::Config`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MedcostError::Config(e.to_string()))
    }

    /// Reads a TOML file.
    ///
    /// A relative `model_path` inside the file is resolved against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MedcostError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml_str(&text)?;
        if config.model_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.model_path = dir.join(&config.model_path);
            }
        }
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::Config`] if the path is not valid UTF-8.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MedcostError::Config(e.to_string()))
    }
}
