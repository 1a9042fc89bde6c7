//! Convenience re-exports for common usage.

pub use crate::config::PredictorConfig;
pub use crate::error::{ErrorKind, MedcostError, Result};
pub use crate::inference::{Prediction, PredictionService};
pub use crate::input::{RawInput, Region, Sex, Smoker};
pub use crate::model::{load_artifact, ForestModel, ModelArtifact};
pub use crate::preprocessing::{encode, FeatureVector, FEATURE_NAMES};
pub use crate::tree::{DecisionTreeRegressor, RandomForestRegressor, RegressionTreeNode};
