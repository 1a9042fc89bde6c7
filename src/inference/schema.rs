//! Feature schema alignment between encoder output and model.

use crate::error::{MedcostError, Result};

/// Confirms `actual` names the same columns as `expected`, in the same order.
///
/// # Errors
///
/// Returns [`MedcostError::SchemaMismatch`] describing the missing and extra
/// columns, or the first position where the order diverges.
pub fn check_schema(expected: &[String], actual: &[String]) -> Result<()> {
    if expected == actual {
        return Ok(());
    }

    let missing: Vec<&str> = expected
        .iter()
        .filter(|name| !actual.contains(name))
        .map(String::as_str)
        .collect();
    let extra: Vec<&str> = actual
        .iter()
        .filter(|name| !expected.contains(name))
        .map(String::as_str)
        .collect();

    let detail = if missing.is_empty() && extra.is_empty() {
        match expected.iter().zip(actual).position(|(e, a)| e != a) {
            Some(pos) => format!(
                "column {pos} is {:?}, model expects {:?}",
                actual[pos], expected[pos]
            ),
            // Same set, same prefix: only possible with repeated names.
            None => format!(
                "model expects {} columns, got {}",
                expected.len(),
                actual.len()
            ),
        }
    } else {
        format!("missing {missing:?}, unexpected {extra:?}")
    };

    Err(MedcostError::SchemaMismatch {
        expected: expected.to_vec(),
        actual: actual.to_vec(),
        detail,
    })
}
