//! Feature encoding for the medical-cost model.
//!
//! Turns a [`RawInput`] into the fixed-order numeric row the model was
//! trained on. Numeric fields pass through; each categorical field is
//! expanded into one-hot indicator columns.
//!
//! # Example
//!
//! ```
//! use medcost::input::{RawInput, Region, Sex, Smoker};
//! use medcost::preprocessing::{encode, FEATURE_NAMES};
//!
//! let raw = RawInput::new(30, 25.5, 1, Sex::Male, Smoker::No, Region::Southeast);
//! let features = encode(&raw);
//!
//! assert_eq!(features.len(), FEATURE_NAMES.len());
//! assert_eq!(
//!     features.values(),
//!     &[30.0, 25.5, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
//! );
//! ```

use crate::error::{MedcostError, Result};
use crate::input::{RawInput, Region, Sex, Smoker};
use serde::Serialize;

/// Column names of an encoded row, in the order the model was trained with.
///
/// The region block is northeast, southeast, northwest, southwest; this is
/// the training order and is deliberately not alphabetical.
pub const FEATURE_NAMES: [&str; 11] = [
    "age",
    "bmi",
    "children",
    "sex_female",
    "sex_male",
    "smoker_no",
    "smoker_yes",
    "region_northeast",
    "region_southeast",
    "region_northwest",
    "region_southwest",
];

/// Column ranges of the one-hot indicator groups within [`FEATURE_NAMES`].
pub const ONE_HOT_GROUPS: [(&str, std::ops::Range<usize>); 3] =
    [("sex", 3..5), ("smoker", 5..7), ("region", 7..11)];

/// A single encoded row with named columns.
///
/// Names travel with the values so the prediction service can check them
/// against the artifact's declared schema instead of trusting position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Builds a row from `(name, value)` columns.
    ///
    /// # Errors
    ///
    /// Returns [`MedcostError::SchemaMismatch`] if a name is empty or
    /// repeated.
    pub fn from_columns(columns: Vec<(String, f32)>) -> Result<Self> {
        let (names, values): (Vec<String>, Vec<f32>) = columns.into_iter().unzip();

        let mut seen = std::collections::HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() || !seen.insert(name.as_str()) {
                return Err(MedcostError::SchemaMismatch {
                    expected: Vec::new(),
                    actual: names.clone(),
                    detail: format!("invalid or duplicate column name {name:?}"),
                });
            }
        }

        Ok(Self { names, values })
    }

    /// Column names, in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column values, in order.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value of the named column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    /// Iterates `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn indicator(hit: bool) -> f32 {
    if hit {
        1.0
    } else {
        0.0
    }
}

/// Encodes a request into the model's feature row.
///
/// Pure and deterministic. Range validation is the caller's concern; any
/// `u32`/`f32` input encodes without panicking.
#[must_use]
pub fn encode(raw: &RawInput) -> FeatureVector {
    let values = vec![
        raw.age as f32,
        raw.bmi,
        raw.children as f32,
        indicator(raw.sex == Sex::Female),
        indicator(raw.sex == Sex::Male),
        indicator(raw.smoker == Smoker::No),
        indicator(raw.smoker == Smoker::Yes),
        indicator(raw.region == Region::Northeast),
        indicator(raw.region == Region::Southeast),
        indicator(raw.region == Region::Northwest),
        indicator(raw.region == Region::Southwest),
    ];
    log::debug!("encoded {raw:?} -> {values:?}");

    FeatureVector {
        names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
        values,
    }
}

/// Parses form labels and encodes them in one step.
///
/// # Errors
///
/// Returns [`MedcostError::UnrecognizedCategory`] if any label is unknown;
/// no vector is produced in that case.
pub fn encode_labels(
    age: u32,
    bmi: f32,
    children: u32,
    sex: &str,
    smoker: &str,
    region: &str,
) -> Result<FeatureVector> {
    let raw = RawInput::from_labels(age, bmi, children, sex, smoker, region)?;
    Ok(encode(&raw))
}
