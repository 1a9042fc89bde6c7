//! medcost: medical cost prediction from insured-person attributes.
//!
//! The crate turns a handful of form fields into the feature row a
//! pre-trained random forest expects, runs the model, and classifies every
//! failure into a typed error a front end can display.
//!
//! # Quick Start
//!
//! ```
//! use medcost::prelude::*;
//! use std::sync::Arc;
//!
//! // A one-tree forest: smokers cost more.
//! let tree = RegressionTreeNode::split(
//!     6, // smoker_yes
//!     0.5,
//!     RegressionTreeNode::leaf(8000.0, 900),
//!     RegressionTreeNode::leaf(32000.0, 300),
//! );
//! let forest = RandomForestRegressor::from_trees(vec![DecisionTreeRegressor::from_root(tree)]).unwrap();
//! let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
//! let model = ForestModel::new(names, forest).unwrap();
//!
//! let service = PredictionService::from_model(Arc::new(model));
//! let raw = RawInput::from_labels(30, 25.5, 1, "male", "yes", "southeast").unwrap();
//! let prediction = service.predict_input(&raw).unwrap();
//! assert_eq!(prediction.to_string(), "32000.00");
//! ```
//!
//! # Modules
//!
//! - [`input`]: Raw request attributes and category parsing
//! - [`preprocessing`]: Feature encoder (one-hot, fixed column order)
//! - [`inference`]: Prediction service (load once, schema check, invoke)
//! - [`model`]: Model artifact trait and the random forest artifact
//! - [`tree`]: Regression tree and forest evaluation
//! - [`serialization`]: APR artifact container
//! - [`config`]: Service configuration
//! - [`report`]: User-facing outcome messages

pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod model;
pub mod prelude;
pub mod preprocessing;
pub mod report;
pub mod serialization;
pub mod tree;

pub use error::{MedcostError, Result};
pub use inference::{Prediction, PredictionService};
pub use input::RawInput;
pub use preprocessing::{encode, FeatureVector};
