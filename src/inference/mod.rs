//! Prediction service: load the artifact once, check the schema, invoke.
//!
//! # Example
//!
//! ```
//! use medcost::inference::PredictionService;
//! use medcost::input::{RawInput, Region, Sex, Smoker};
//! use medcost::model::ForestModel;
//! use medcost::preprocessing::FEATURE_NAMES;
//! use medcost::tree::{DecisionTreeRegressor, RandomForestRegressor, RegressionTreeNode};
//! use std::sync::Arc;
//!
//! let forest = RandomForestRegressor::from_trees(vec![DecisionTreeRegressor::from_root(
//!     RegressionTreeNode::leaf(4500.125, 1),
//! )])
//! .unwrap();
//! let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
//! let service = PredictionService::from_model(Arc::new(ForestModel::new(names, forest).unwrap()));
//!
//! let raw = RawInput::new(30, 25.5, 1, Sex::Male, Smoker::No, Region::Southeast);
//! let prediction = service.predict_input(&raw).unwrap();
//! assert_eq!(prediction.to_string(), "4500.13");
//! ```

mod schema;

pub use schema::check_schema;

use crate::config::PredictorConfig;
use crate::error::{MedcostError, Result};
use crate::input::RawInput;
use crate::model::{load_artifact, ModelArtifact};
use crate::preprocessing::{encode, FeatureVector};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Decimal places shown to users.
pub const DISPLAY_DECIMALS: i32 = 2;

/// Rounds half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// A successful model output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    value: f64,
    rounded: f64,
}

impl Prediction {
    /// Wraps a raw model output.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            rounded: round_to(value, DISPLAY_DECIMALS),
        }
    }

    /// Unrounded model output.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Output rounded for display.
    #[must_use]
    pub fn rounded(&self) -> f64 {
        self.rounded
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", DISPLAY_DECIMALS as usize, self.rounded)
    }
}

/// Source of model artifacts.
pub trait ArtifactLoader: Send + Sync {
    /// Loads the artifact stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::ArtifactUnavailable`] if it cannot be loaded.
    fn load(&self, path: &Path) -> Result<Arc<dyn ModelArtifact>>;
}

/// Reads artifacts from the filesystem via [`load_artifact`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl ArtifactLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn ModelArtifact>> {
        load_artifact(path)
    }
}

/// Runs predictions against a lazily loaded, shared model artifact.
///
/// The artifact is loaded at most once per service. Concurrent first callers
/// wait for that single load; a failed load is not remembered, so the next
/// call tries again.
pub struct PredictionService {
    model_path: PathBuf,
    loader: Box<dyn ArtifactLoader>,
    model: OnceCell<Arc<dyn ModelArtifact>>,
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("model_path", &self.model_path)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Service reading the configured artifact from disk on first use.
    #[must_use]
    pub fn new(config: &PredictorConfig) -> Self {
        Self::with_loader(&config.model_path, FileLoader)
    }

    /// Like [`new`](Self::new), loading immediately when `eager_load` is set.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::ArtifactUnavailable`] if an eager load fails.
    pub fn open(config: &PredictorConfig) -> Result<Self> {
        let service = Self::new(config);
        if config.eager_load {
            service.load()?;
        }
        Ok(service)
    }

    /// Service using a custom loader.
    #[must_use]
    pub fn with_loader(
        model_path: impl Into<PathBuf>,
        loader: impl ArtifactLoader + 'static,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            loader: Box::new(loader),
            model: OnceCell::new(),
        }
    }

    /// Service around an already loaded model.
    #[must_use]
    pub fn from_model(model: Arc<dyn ModelArtifact>) -> Self {
        Self {
            model_path: PathBuf::new(),
            loader: Box::new(FileLoader),
            model: OnceCell::with_value(model),
        }
    }

    /// Configured artifact location (empty for in-memory models).
    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// True once the artifact has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Returns the artifact, loading it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::ArtifactUnavailable`] if loading fails.
    pub fn load(&self) -> Result<&Arc<dyn ModelArtifact>> {
        self.model
            .get_or_try_init(|| self.loader.load(&self.model_path))
            .map_err(|err| {
                log::warn!("{err}");
                err
            })
    }

    /// Predicts the cost for an encoded row.
    ///
    /// # Errors
    ///
    /// - [`MedcostError::ArtifactUnavailable`] if the artifact cannot be loaded
    /// - [`MedcostError::SchemaMismatch`] if the row's columns differ from the
    ///   model's declared features
    /// - [`MedcostError::InferenceFailure`] if a feature is NaN or infinite,
    ///   or if the model errors, panics, or returns anything but one finite
    ///   value
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let model = self.load()?;

        if let Err(err) = check_schema(model.feature_names(), features.names()) {
            log::warn!("{err}");
            return Err(err);
        }

        let started = Instant::now();
        let value = check_finite(features)
            .and_then(|()| invoke(&**model, features.values()))
            .map_err(|err| {
                log::warn!("{err}");
                err
            })?;
        log::debug!("prediction {value} in {:?}", started.elapsed());

        Ok(Prediction::new(value))
    }

    /// Encodes `raw` and predicts.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict).
    pub fn predict_input(&self, raw: &RawInput) -> Result<Prediction> {
        self.predict(&encode(raw))
    }
}

/// Rejects rows a tree would silently route down one branch.
fn check_finite(features: &FeatureVector) -> Result<()> {
    match features.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(MedcostError::InferenceFailure(format!(
            "feature {name} is {value}, expected a finite number"
        ))),
        None => Ok(()),
    }
}

/// Calls the model on one row, containing any failure it raises.
fn invoke(model: &dyn ModelArtifact, row: &[f32]) -> Result<f64> {
    let outputs = panic::catch_unwind(AssertUnwindSafe(|| model.predict(&[row])))
        .map_err(|payload| {
            MedcostError::InferenceFailure(format!("model panicked: {}", panic_message(&*payload)))
        })?
        .map_err(MedcostError::InferenceFailure)?;

    let [value] = outputs.as_slice() else {
        return Err(MedcostError::InferenceFailure(format!(
            "expected exactly one output for one row, got {}",
            outputs.len()
        )));
    };
    if !value.is_finite() {
        return Err(MedcostError::InferenceFailure(format!(
            "model returned non-finite value {value}"
        )));
    }
    Ok(*value)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
