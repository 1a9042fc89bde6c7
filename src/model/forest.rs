//! Random forest regressor artifact.

use super::{ArtifactSummary, ModelArtifact, ModelResult};
use crate::serialization::{AprReader, AprWriter};
use crate::tree::{
    flatten_tree, reconstruct_tree, DecisionTreeRegressor, FlatTree, RandomForestRegressor,
    MAX_TREE_DEPTH,
};
use bincode::Options;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// `model_type` metadata value identifying a forest artifact.
pub const FOREST_MODEL_TYPE: &str = "random_forest_regressor";

const TREE_ARRAYS: [&str; 6] = ["features", "thresholds", "values", "samples", "left", "right"];

/// A random forest regressor together with the feature schema it was
/// trained on.
///
/// # Example
///
/// ```
/// use medcost::model::{ForestModel, ModelArtifact};
/// use medcost::tree::{DecisionTreeRegressor, RandomForestRegressor, RegressionTreeNode};
///
/// let forest = RandomForestRegressor::from_trees(vec![DecisionTreeRegressor::from_root(
///     RegressionTreeNode::leaf(4500.125, 1),
/// )])
/// .unwrap();
/// let model = ForestModel::new(vec!["age".into()], forest).unwrap();
///
/// let bytes = model.to_apr_bytes().unwrap();
/// let restored = medcost::model::decode_artifact(bytes).unwrap();
/// assert_eq!(restored.predict(&[&[30.0]]).unwrap(), vec![4500.125]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForestModel {
    feature_names: Vec<String>,
    forest: RandomForestRegressor,
}

/// bincode payload: trees travel in the same flat pre-order layout as the
/// APR tensors, so decoding never recurses over untrusted input.
#[derive(Serialize, Deserialize)]
struct ForestRecord {
    feature_names: Vec<String>,
    trees: Vec<FlatTree>,
}

fn rebuild_forest(trees: &[FlatTree]) -> Result<RandomForestRegressor, String> {
    let trees = trees
        .iter()
        .enumerate()
        .map(|(i, flat)| {
            reconstruct_tree(flat)
                .map(DecisionTreeRegressor::from_root)
                .map_err(|e| format!("tree {i}: {e}"))
        })
        .collect::<Result<Vec<_>, String>>()?;
    RandomForestRegressor::from_trees(trees)
}

impl ForestModel {
    /// Pairs a forest with its feature schema.
    ///
    /// # Errors
    ///
    /// Returns an error if names are empty or repeated, if any tree splits
    /// on a feature index outside the schema, or if a tree is too deep to
    /// be stored.
    pub fn new(feature_names: Vec<String>, forest: RandomForestRegressor) -> Result<Self, String> {
        if feature_names.is_empty() {
            return Err("feature_names_in is empty".to_string());
        }
        let mut seen = HashSet::with_capacity(feature_names.len());
        for name in &feature_names {
            if name.is_empty() || !seen.insert(name.as_str()) {
                return Err(format!("invalid or duplicate feature name {name:?}"));
            }
        }
        if forest.max_depth() > MAX_TREE_DEPTH {
            return Err(format!(
                "tree depth {} exceeds the limit of {MAX_TREE_DEPTH}",
                forest.max_depth()
            ));
        }
        if let Some(idx) = forest.max_feature_idx() {
            if idx >= feature_names.len() {
                return Err(format!(
                    "tree splits on feature {idx} but only {} features are declared",
                    feature_names.len()
                ));
            }
        }
        Ok(Self {
            feature_names,
            forest,
        })
    }

    /// The underlying forest.
    #[must_use]
    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    // ========================================================================
    // APR container
    // ========================================================================

    /// Builds an APR writer holding this model.
    #[must_use]
    pub fn to_apr_writer(&self) -> AprWriter {
        let mut writer = AprWriter::new();
        writer.set_metadata("model_type", json!(FOREST_MODEL_TYPE));
        writer.set_metadata("feature_names_in", json!(self.feature_names));
        writer.set_metadata("n_estimators", json!(self.forest.n_estimators()));

        for (i, tree) in self.forest.trees().iter().enumerate() {
            let flat = flatten_tree(tree.root());
            let arrays = [
                &flat.features,
                &flat.thresholds,
                &flat.values,
                &flat.samples,
                &flat.left,
                &flat.right,
            ];
            for (suffix, data) in TREE_ARRAYS.iter().zip(arrays) {
                writer.add_tensor_f32(format!("tree.{i}.{suffix}"), vec![data.len()], data);
            }
        }
        writer
    }

    /// Serializes to APR bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_apr_bytes(&self) -> Result<Vec<u8>, String> {
        self.to_apr_writer().to_bytes()
    }

    /// Writes an APR file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save_apr<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        self.to_apr_writer().write(path)
    }

    /// Reads a model from a parsed APR container.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata is missing or malformed, the model type
    /// is not a forest, or any tree is invalid.
    pub fn from_apr(reader: &AprReader) -> Result<Self, String> {
        let model_type = reader
            .get_metadata("model_type")
            .and_then(|v| v.as_str())
            .ok_or("missing model_type metadata")?;
        if model_type != FOREST_MODEL_TYPE {
            return Err(format!(
                "unsupported model_type {model_type:?}, expected {FOREST_MODEL_TYPE:?}"
            ));
        }

        let feature_names: Vec<String> = reader
            .get_metadata("feature_names_in")
            .cloned()
            .ok_or("missing feature_names_in metadata")
            .and_then(|v| {
                serde_json::from_value(v).map_err(|_| "feature_names_in must be a string array")
            })?;

        let n_estimators = reader
            .get_metadata("n_estimators")
            .and_then(serde_json::Value::as_u64)
            .ok_or("missing n_estimators metadata")? as usize;

        let mut trees = Vec::new();
        for i in 0..n_estimators {
            let read = |suffix: &str| reader.read_tensor_f32(&format!("tree.{i}.{suffix}"));
            trees.push(FlatTree {
                features: read("features")?,
                thresholds: read("thresholds")?,
                values: read("values")?,
                samples: read("samples")?,
                left: read("left")?,
                right: read("right")?,
            });
        }

        Self::new(feature_names, rebuild_forest(&trees)?)
    }

    // ========================================================================
    // bincode
    // ========================================================================

    /// Writes a bincode file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let record = ForestRecord {
            feature_names: self.feature_names.clone(),
            trees: self
                .forest
                .trees()
                .iter()
                .map(|tree| flatten_tree(tree.root()))
                .collect(),
        };
        let bytes =
            bincode::serialize(&record).map_err(|e| format!("Serialization failed: {e}"))?;
        fs::write(path, bytes).map_err(|e| format!("File write failed: {e}"))?;
        Ok(())
    }

    /// Decodes a bincode payload, rebuilds each tree and re-checks the
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization or validation fails.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self, String> {
        // Same wire format as `bincode::serialize`, with allocations capped
        // by the payload size.
        let record: ForestRecord = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(bytes.len() as u64)
            .deserialize(bytes)
            .map_err(|e| format!("Deserialization failed: {e}"))?;
        Self::new(record.feature_names, rebuild_forest(&record.trees)?)
    }
}

impl ModelArtifact for ForestModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[&[f32]]) -> ModelResult<Vec<f64>> {
        let n_features = self.feature_names.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != n_features) {
            return Err(format!(
                "expected {n_features} features per row, got {}",
                bad.len()
            ));
        }
        self.forest.predict(rows)
    }

    fn describe(&self) -> ArtifactSummary {
        ArtifactSummary {
            model_type: FOREST_MODEL_TYPE.to_string(),
            n_estimators: Some(self.forest.n_estimators()),
            max_depth: Some(self.forest.max_depth()),
            feature_names: self.feature_names.clone(),
        }
    }
}
