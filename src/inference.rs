use log::{info, warn};

use crate::board::Position;
use crate::config::InferenceSettings;
use crate::encoder::{encode, Features};
use crate::error::Result;
use crate::model::ValueNet;
use crate::reference::{MaterialEval, ReferenceEval, Score, UciEngine};

/// Model output for one position next to the reference score.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub fen: String,
    pub diagram: String,
    pub features: Features,
    pub predicted: f32,
    pub expected: Score,
}

/// Encode `fen` and run it through `model`.
pub fn predict(model: &ValueNet, fen: &str, reference: &mut dyn ReferenceEval) -> Result<Prediction> {
    let pos = Position::from_fen(fen)?;
    let features = encode(&pos)?;
    let predicted = model.predict(&features)?;
    let expected = reference.evaluate(fen)?;
    Ok(Prediction { fen: fen.to_string(), diagram: pos.diagram(), features, predicted, expected })
}

/// Reference evaluator for the settings: the configured UCI engine, or
/// material count if none is set or it fails to start.
pub fn reference_for(settings: &InferenceSettings) -> Box<dyn ReferenceEval> {
    if let Some(bin) = &settings.engine {
        match UciEngine::spawn(bin, settings.engine_depth) {
            Ok(engine) => return Box::new(engine),
            Err(e) => warn!("reference engine unavailable ({}), using material count", e),
        }
    }
    Box::new(MaterialEval)
}

/// Load the checkpoint and evaluate the configured position.
pub fn run(settings: &InferenceSettings) -> Result<Prediction> {
    let model = ValueNet::load(&settings.checkpoint)?;
    info!(
        "loaded {} (hidden {}, version {})",
        settings.checkpoint.display(),
        model.meta.hidden_dim,
        model.meta.version
    );
    let mut reference = reference_for(settings);
    predict(&model, &settings.fen, reference.as_mut())
}
