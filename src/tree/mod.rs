//! Regression trees and random forest ensembles (inference only).
//!
//! Trees are produced by an external training process and arrive through
//! one of the artifact encodings in [`crate::model`]. This module evaluates
//! them: walk each tree from the root, compare the split feature against its
//! threshold, and average the leaf values across the forest.
//!
//! # Example
//!
//! ```
//! use medcost::tree::{DecisionTreeRegressor, RandomForestRegressor, RegressionTreeNode};
//!
//! // x[0] <= 18.0 ? 1000.0 : 3000.0
//! let tree = DecisionTreeRegressor::from_root(RegressionTreeNode::split(
//!     0,
//!     18.0,
//!     RegressionTreeNode::leaf(1000.0, 10),
//!     RegressionTreeNode::leaf(3000.0, 12),
//! ));
//! let forest = RandomForestRegressor::from_trees(vec![tree]).unwrap();
//!
//! assert_eq!(forest.predict_one(&[30.0]).unwrap(), 3000.0);
//! ```

mod helpers;

pub(crate) use helpers::{flatten_tree, reconstruct_tree, FlatTree, MAX_TREE_DEPTH};

/// Leaf node in a regression tree.
///
/// Contains the predicted value (mean of training targets) and the number
/// of training samples that reached this leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Creates a leaf.
    #[must_use]
    pub fn leaf(value: f32, n_samples: usize) -> Self {
        Self::Leaf(RegressionLeaf { value, n_samples })
    }

    /// Creates a split on `feature_idx <= threshold`.
    #[must_use]
    pub fn split(feature_idx: usize, threshold: f32, left: Self, right: Self) -> Self {
        Self::Node(RegressionNode {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Largest feature index referenced by any split, if there are splits.
    pub fn max_feature_idx(&self) -> Option<usize> {
        match self {
            RegressionTreeNode::Leaf(_) => None,
            RegressionTreeNode::Node(node) => [
                Some(node.feature_idx),
                node.left.max_feature_idx(),
                node.right.max_feature_idx(),
            ]
            .into_iter()
            .flatten()
            .max(),
        }
    }
}

/// A fitted CART regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeRegressor {
    tree: RegressionTreeNode,
}

impl DecisionTreeRegressor {
    /// Wraps an already-built tree.
    #[must_use]
    pub fn from_root(tree: RegressionTreeNode) -> Self {
        Self { tree }
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &RegressionTreeNode {
        &self.tree
    }

    /// Tree depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Predicts the value for a single sample.
    ///
    /// # Errors
    ///
    /// Returns an error if a split references a feature the sample does not
    /// have.
    pub fn predict_one(&self, x: &[f32]) -> Result<f32, String> {
        let mut node = &self.tree;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return Ok(leaf.value),
                RegressionTreeNode::Node(internal) => {
                    let value = x.get(internal.feature_idx).ok_or_else(|| {
                        format!(
                            "split on feature {} but sample has {} features",
                            internal.feature_idx,
                            x.len()
                        )
                    })?;
                    node = if *value <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// Random forest regressor: the mean of its trees' predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
}

impl RandomForestRegressor {
    /// Builds a forest from fitted trees.
    ///
    /// # Errors
    ///
    /// Returns an error if `trees` is empty.
    pub fn from_trees(trees: Vec<DecisionTreeRegressor>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("Random forest must contain at least one tree".to_string());
        }
        Ok(Self { trees })
    }

    /// Fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }

    /// Number of trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Deepest tree in the forest.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTreeRegressor::depth).max().unwrap_or(0)
    }

    /// Largest feature index any tree splits on.
    #[must_use]
    pub fn max_feature_idx(&self) -> Option<usize> {
        self.trees
            .iter()
            .filter_map(|t| t.root().max_feature_idx())
            .max()
    }

    /// Predicts one sample by averaging all trees.
    ///
    /// Leaf values are f32; the mean is accumulated and returned in f64 so
    /// costs in the tens of thousands keep their cents.
    ///
    /// # Errors
    ///
    /// Propagates the first tree error.
    pub fn predict_one(&self, x: &[f32]) -> Result<f64, String> {
        let mut sum = 0.0f64;
        for tree in &self.trees {
            sum += f64::from(tree.predict_one(x)?);
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Predicts each row.
    ///
    /// # Errors
    ///
    /// Propagates the first tree error.
    pub fn predict(&self, rows: &[&[f32]]) -> Result<Vec<f64>, String> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}
