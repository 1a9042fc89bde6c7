//! Inspect command implementation
//!
//! Loads an artifact and reports what it is and whether its declared
//! feature schema lines up with the encoder.

use crate::error::Result;
use crate::output;
use medcost::inference::check_schema;
use medcost::model::{load_artifact, ArtifactSummary, ModelArtifact};
use medcost::preprocessing::FEATURE_NAMES;
use serde::Serialize;
use std::path::Path;

/// Inspection result for JSON output
#[derive(Serialize)]
struct InspectResult {
    file: String,
    #[serde(flatten)]
    summary: ArtifactSummary,
    schema_aligned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_detail: Option<String>,
}

/// Run the inspect command
pub(crate) fn run(path: &Path, json_output: bool) -> Result<()> {
    let model = load_artifact(path)?;
    let summary = model.describe();

    let encoder: Vec<String> = FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect();
    let schema_detail = check_schema(model.feature_names(), &encoder)
        .err()
        .map(|err| err.to_string());

    let result = InspectResult {
        file: path.display().to_string(),
        schema_aligned: schema_detail.is_none(),
        schema_detail,
        summary,
    };

    if json_output {
        output::json(&result)
    } else {
        output_text(&result);
        Ok(())
    }
}

fn output_text(result: &InspectResult) {
    output::section(&result.file);
    output::kv("Model type", &result.summary.model_type);
    if let Some(n) = result.summary.n_estimators {
        output::kv("Estimators", n);
    }
    if let Some(depth) = result.summary.max_depth {
        output::kv("Max depth", depth);
    }

    output::section("Features");
    for (i, name) in result.summary.feature_names.iter().enumerate() {
        output::kv(&format!("{i:>2}"), name);
    }

    println!();
    match &result.schema_detail {
        None => output::success("schema matches encoder output"),
        Some(detail) => output::fail(detail),
    }
}
