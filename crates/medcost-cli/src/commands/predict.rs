//! Predict command implementation
//!
//! Parses form labels, runs the encoder and the prediction service, and
//! prints the rendered outcome.

use crate::error::Result;
use crate::output;
use medcost::config::PredictorConfig;
use medcost::input::RawInput;
use medcost::preprocessing::encode;
use medcost::report::success_message;
use medcost::PredictionService;
use serde::Serialize;
use std::path::Path;

/// Raw form fields as given on the command line.
#[derive(Debug, Clone)]
pub(crate) struct PredictArgs<'a> {
    pub age: u32,
    pub bmi: f32,
    pub children: u32,
    pub sex: &'a str,
    pub smoker: &'a str,
    pub region: &'a str,
}

/// Prediction result for JSON output
#[derive(Serialize)]
struct PredictResult<'a> {
    model: String,
    prediction: f64,
    rounded: f64,
    features: &'a medcost::FeatureVector,
}

/// Resolves the service configuration: `--model` wins over `--config`.
fn resolve_config(model: Option<&Path>, config: Option<&Path>) -> Result<PredictorConfig> {
    let mut resolved = match config {
        Some(path) => PredictorConfig::load(path)?,
        None => PredictorConfig::default(),
    };
    if let Some(model) = model {
        resolved.model_path = model.to_path_buf();
    }
    Ok(resolved)
}

/// Run the predict command
pub(crate) fn run(
    args: &PredictArgs<'_>,
    model: Option<&Path>,
    config: Option<&Path>,
    json_output: bool,
) -> Result<()> {
    let raw = RawInput::from_labels(
        args.age,
        args.bmi,
        args.children,
        args.sex,
        args.smoker,
        args.region,
    )?;
    raw.validate()?;

    let config = resolve_config(model, config)?;
    let service = PredictionService::open(&config)?;

    let features = encode(&raw);
    let prediction = service.predict(&features)?;

    if json_output {
        output::json(&PredictResult {
            model: config.model_path.display().to_string(),
            prediction: prediction.value(),
            rounded: prediction.rounded(),
            features: &features,
        })
    } else {
        output::success(&success_message(&prediction));
        Ok(())
    }
}
