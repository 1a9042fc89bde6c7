use super::*;
use crate::preprocessing::FEATURE_NAMES;
use crate::tree::{DecisionTreeRegressor, RandomForestRegressor, RegressionTreeNode};

fn schema() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect()
}

fn two_tree_model() -> ForestModel {
    let smoker_split = RegressionTreeNode::split(
        6,
        0.5,
        RegressionTreeNode::leaf(8000.0, 500),
        RegressionTreeNode::leaf(32000.0, 150),
    );
    let age_split = RegressionTreeNode::split(
        0,
        40.0,
        RegressionTreeNode::leaf(6000.0, 400),
        RegressionTreeNode::leaf(14000.0, 250),
    );
    let forest = RandomForestRegressor::from_trees(vec![
        DecisionTreeRegressor::from_root(smoker_split),
        DecisionTreeRegressor::from_root(age_split),
    ])
    .unwrap();
    ForestModel::new(schema(), forest).unwrap()
}

fn row(age: f32, smoker_yes: f32) -> Vec<f32> {
    let mut x = vec![0.0; 11];
    x[0] = age;
    x[6] = smoker_yes;
    x
}

#[test]
fn test_forest_model_predicts_mean() {
    let model = two_tree_model();
    let young = row(30.0, 0.0);
    let old_smoker = row(55.0, 1.0);
    let preds = model.predict(&[young.as_slice(), old_smoker.as_slice()]).unwrap();
    assert_eq!(preds, vec![7000.0, 23000.0]);
}

#[test]
fn test_forest_model_rejects_wrong_width() {
    let model = two_tree_model();
    let err = model.predict(&[&[1.0, 2.0]]).unwrap_err();
    assert!(err.contains("expected 11 features"));
}

#[test]
fn test_new_rejects_split_outside_schema() {
    let forest = RandomForestRegressor::from_trees(vec![DecisionTreeRegressor::from_root(
        RegressionTreeNode::split(
            20,
            1.0,
            RegressionTreeNode::leaf(1.0, 1),
            RegressionTreeNode::leaf(2.0, 1),
        ),
    )])
    .unwrap();
    let err = ForestModel::new(schema(), forest).unwrap_err();
    assert!(err.contains("feature 20"));
}

#[test]
fn test_new_rejects_duplicate_names() {
    let forest = RandomForestRegressor::from_trees(vec![DecisionTreeRegressor::from_root(
        RegressionTreeNode::leaf(1.0, 1),
    )])
    .unwrap();
    assert!(ForestModel::new(vec!["age".into(), "age".into()], forest.clone()).is_err());
    assert!(ForestModel::new(Vec::new(), forest).is_err());
}

#[test]
fn test_describe() {
    let summary = two_tree_model().describe();
    assert_eq!(summary.model_type, FOREST_MODEL_TYPE);
    assert_eq!(summary.n_estimators, Some(2));
    assert_eq!(summary.max_depth, Some(1));
    assert_eq!(summary.feature_names, schema());
}

// ========================================================================
// Encodings
// ========================================================================

#[test]
fn test_apr_decode_preserves_model() {
    let model = two_tree_model();
    let decoded = decode_artifact(model.to_apr_bytes().unwrap()).unwrap();
    assert_eq!(decoded, model);
}

#[test]
fn test_apr_metadata_layout() {
    let bytes = two_tree_model().to_apr_bytes().unwrap();
    let reader = AprReader::from_bytes(bytes).unwrap();
    assert_eq!(
        reader.get_metadata("model_type").unwrap(),
        FOREST_MODEL_TYPE
    );
    assert_eq!(reader.get_metadata("n_estimators").unwrap(), 2);
    let names: Vec<String> =
        serde_json::from_value(reader.get_metadata("feature_names_in").unwrap().clone()).unwrap();
    assert_eq!(names, schema());
    assert!(reader.tensor_names().any(|n| n == "tree.1.thresholds"));
}

#[test]
fn test_bincode_file_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let model = two_tree_model();
    model.save_bincode(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(ArtifactFormat::detect(&bytes), ArtifactFormat::Bincode);
    assert_eq!(decode_artifact(bytes).unwrap(), model);
}

/// A single right-leaning chain of `splits` internal nodes in pre-order.
fn chain_tree(splits: usize) -> crate::tree::FlatTree {
    let n = 2 * splits + 1;
    let is_split = |i: usize| i % 2 == 0 && i < 2 * splits;
    crate::tree::FlatTree {
        features: (0..n).map(|i| if is_split(i) { 0.0 } else { -1.0 }).collect(),
        thresholds: vec![1.0; n],
        values: vec![100.0; n],
        samples: vec![1.0; n],
        left: (0..n).map(|i| if is_split(i) { (i + 1) as f32 } else { -1.0 }).collect(),
        right: (0..n).map(|i| if is_split(i) { (i + 2) as f32 } else { -1.0 }).collect(),
    }
}

#[test]
fn test_bincode_over_deep_tree_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deep.bin");
    // Field order matches the stored record: feature names, then trees.
    let payload = (schema(), vec![chain_tree(crate::tree::MAX_TREE_DEPTH + 1)]);
    std::fs::write(&path, bincode::serialize(&payload).unwrap()).unwrap();

    let err = load_artifact(&path).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::ArtifactUnavailable);
    assert!(err.to_string().contains("deeper than"), "{err}");
}

#[test]
fn test_bincode_chain_within_limit_loads() {
    let payload = (schema(), vec![chain_tree(100)]);
    let model = decode_artifact(bincode::serialize(&payload).unwrap()).unwrap();
    assert_eq!(model.forest().max_depth(), 100);
}

#[test]
fn test_bincode_huge_length_prefix_is_corrupt() {
    let mut bytes = bincode::serialize(&schema()).unwrap();
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 64]);
    let err = decode_artifact(bytes).unwrap_err();
    assert!(matches!(err, ArtifactError::Corrupt(_)));
}

#[test]
fn test_apr_shared_child_is_corrupt() {
    let mut flat = chain_tree(3);
    flat.left[2] = 4.0;
    let mut writer = crate::serialization::AprWriter::new();
    writer.set_metadata("model_type", serde_json::json!(FOREST_MODEL_TYPE));
    writer.set_metadata("feature_names_in", serde_json::json!(schema()));
    writer.set_metadata("n_estimators", serde_json::json!(1));
    for (suffix, data) in [
        ("features", &flat.features),
        ("thresholds", &flat.thresholds),
        ("values", &flat.values),
        ("samples", &flat.samples),
        ("left", &flat.left),
        ("right", &flat.right),
    ] {
        writer.add_tensor_f32(format!("tree.0.{suffix}"), vec![data.len()], data);
    }
    let err = decode_artifact(writer.to_bytes().unwrap()).unwrap_err();
    assert!(matches!(err, ArtifactError::Corrupt(ref m) if m.contains("invalid child index")));
}

#[test]
fn test_new_rejects_over_deep_tree() {
    let mut node = RegressionTreeNode::leaf(1.0, 1);
    for _ in 0..=crate::tree::MAX_TREE_DEPTH {
        node = RegressionTreeNode::split(0, 1.0, RegressionTreeNode::leaf(2.0, 1), node);
    }
    let forest =
        RandomForestRegressor::from_trees(vec![DecisionTreeRegressor::from_root(node)]).unwrap();
    assert!(ForestModel::new(schema(), forest).unwrap_err().contains("exceeds the limit"));
}

#[test]
fn test_unknown_model_type_is_corrupt() {
    let mut writer = two_tree_model().to_apr_writer();
    writer.set_metadata("model_type", serde_json::json!("linear_regression"));
    let err = decode_artifact(writer.to_bytes().unwrap()).unwrap_err();
    assert!(matches!(err, ArtifactError::Corrupt(ref m) if m.contains("linear_regression")));
}

#[test]
fn test_missing_feature_names_is_corrupt() {
    let mut writer = crate::serialization::AprWriter::new();
    writer.set_metadata("model_type", serde_json::json!(FOREST_MODEL_TYPE));
    writer.set_metadata("n_estimators", serde_json::json!(0));
    let err = decode_artifact(writer.to_bytes().unwrap()).unwrap_err();
    assert!(matches!(err, ArtifactError::Corrupt(_)));
}

#[test]
fn test_garbage_bytes_are_corrupt() {
    let err = decode_artifact(b"not a model at all".to_vec()).unwrap_err();
    assert!(matches!(err, ArtifactError::Corrupt(_)));
}

#[test]
fn test_load_artifact_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_artifact(&dir.path().join("rfr_model.apr")).unwrap_err();
    assert!(err.is_missing_artifact());
}

#[test]
fn test_load_artifact_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rfr_model.apr");
    two_tree_model().save_apr(&path).unwrap();

    let model = load_artifact(&path).unwrap();
    assert_eq!(model.feature_names(), schema().as_slice());
}
