//! Flat array layout for regression trees.
//!
//! Artifacts store each tree as parallel f32 arrays in pre-order. A leaf has
//! `feature = -1`; internal nodes carry child indices in `left`/`right`.

use super::{RegressionLeaf, RegressionNode, RegressionTreeNode};
use serde::{Deserialize, Serialize};

/// Parallel arrays describing one tree in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct FlatTree {
    pub features: Vec<f32>,
    pub thresholds: Vec<f32>,
    pub values: Vec<f32>,
    pub samples: Vec<f32>,
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl FlatTree {
    fn len(&self) -> usize {
        self.features.len()
    }

    fn push(&mut self, feature: f32, threshold: f32, value: f32, samples: f32) -> usize {
        let idx = self.len();
        self.features.push(feature);
        self.thresholds.push(threshold);
        self.values.push(value);
        self.samples.push(samples);
        self.left.push(-1.0);
        self.right.push(-1.0);
        idx
    }
}

/// Flattens a tree into parallel arrays via pre-order traversal.
pub(crate) fn flatten_tree(root: &RegressionTreeNode) -> FlatTree {
    let mut flat = FlatTree::default();
    flatten_node(root, &mut flat);
    flat
}

fn flatten_node(node: &RegressionTreeNode, flat: &mut FlatTree) -> usize {
    match node {
        RegressionTreeNode::Leaf(leaf) => flat.push(-1.0, 0.0, leaf.value, leaf.n_samples as f32),
        RegressionTreeNode::Node(internal) => {
            let idx = flat.push(internal.feature_idx as f32, internal.threshold, 0.0, 0.0);
            let left_idx = flatten_node(&internal.left, flat);
            let right_idx = flatten_node(&internal.right, flat);
            flat.left[idx] = left_idx as f32;
            flat.right[idx] = right_idx as f32;
            idx
        }
    }
}

/// Deepest tree accepted from an artifact.
pub(crate) const MAX_TREE_DEPTH: usize = 512;

/// Reconstructs a tree from parallel arrays.
///
/// # Errors
///
/// Returns an error if the arrays disagree in length, are empty, or are not
/// an exact pre-order layout: every left child must follow its parent, every
/// right child must follow its left subtree, and every node must be used
/// once. Trees deeper than [`MAX_TREE_DEPTH`] are rejected.
pub(crate) fn reconstruct_tree(flat: &FlatTree) -> Result<RegressionTreeNode, String> {
    let n = flat.len();
    if n == 0 {
        return Err("tree has no nodes".to_string());
    }
    let lengths = [
        flat.thresholds.len(),
        flat.values.len(),
        flat.samples.len(),
        flat.left.len(),
        flat.right.len(),
    ];
    if lengths.iter().any(|&len| len != n) {
        return Err(format!("tree arrays disagree in length: {n} vs {lengths:?}"));
    }
    let (root, end) = reconstruct_node(0, 0, flat)?;
    if end != n {
        return Err(format!("tree uses {end} of {n} nodes"));
    }
    Ok(root)
}

fn child_index(raw: f32, parent: usize, expected: usize) -> Result<usize, String> {
    if raw != expected as f32 {
        return Err(format!(
            "node {parent} has invalid child index {raw}, expected {expected}"
        ));
    }
    Ok(expected)
}

/// Rebuilds the subtree at `idx`, returning it with the index one past its
/// last node.
fn reconstruct_node(
    idx: usize,
    depth: usize,
    flat: &FlatTree,
) -> Result<(RegressionTreeNode, usize), String> {
    if idx >= flat.len() {
        return Err(format!("node index {idx} out of bounds"));
    }
    let feature = flat.features[idx];

    if feature < 0.0 {
        let value = flat.values[idx];
        if !value.is_finite() {
            return Err(format!("leaf {idx} has non-finite value {value}"));
        }
        let leaf = RegressionTreeNode::Leaf(RegressionLeaf {
            value,
            n_samples: flat.samples[idx].max(0.0) as usize,
        });
        return Ok((leaf, idx + 1));
    }

    if !feature.is_finite() || feature.fract() != 0.0 {
        return Err(format!("node {idx} has invalid feature index {feature}"));
    }
    if depth >= MAX_TREE_DEPTH {
        return Err(format!("tree deeper than {MAX_TREE_DEPTH} levels"));
    }

    let left_idx = child_index(flat.left[idx], idx, idx + 1)?;
    let (left, left_end) = reconstruct_node(left_idx, depth + 1, flat)?;
    let right_idx = child_index(flat.right[idx], idx, left_end)?;
    let (right, end) = reconstruct_node(right_idx, depth + 1, flat)?;

    let node = RegressionTreeNode::Node(RegressionNode {
        feature_idx: feature as usize,
        threshold: flat.thresholds[idx],
        left: Box::new(left),
        right: Box::new(right),
    });
    Ok((node, end))
}
