//! Model artifact serialization.
//!
//! ## APR Format
//! Compact binary container with JSON metadata and named f32 tensors.
//! ```text
//! [4-byte magic: "APR1"]
//! [4-byte metadata_len][JSON metadata]
//! [4-byte n_tensors][4-byte index_len][tensor index][tensor data]
//! [4-byte CRC32]
//! ```
//!
//! Example:
//! ```rust
//! use medcost::serialization::apr::{AprReader, AprWriter};
//! use serde_json::json;
//!
//! let mut writer = AprWriter::new();
//! writer.set_metadata("model_type", json!("random_forest_regressor"));
//! writer.add_tensor_f32("tree.0.values", vec![1], &[4500.125]);
//!
//! let bytes = writer.to_bytes().unwrap();
//! let reader = AprReader::from_bytes(bytes).unwrap();
//! assert_eq!(reader.get_metadata("model_type").unwrap(), "random_forest_regressor");
//! assert_eq!(reader.read_tensor_f32("tree.0.values").unwrap(), vec![4500.125]);
//! ```

pub mod apr;

pub use apr::{AprReader, AprWriter};
