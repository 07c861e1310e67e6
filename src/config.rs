use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::DEFAULT_PROGRESS_EVERY;
use crate::error::{Error, Result};

/// Position evaluated by the default inference run: 1. e4, black to move.
pub const DEFAULT_FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub inference: InferenceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetSettings {
    /// PGN file with the source games
    pub pgn: PathBuf,
    /// Feature file; generation is skipped if it exists
    pub output: PathBuf,
    pub progress_every: usize,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            pgn: PathBuf::from("ai/temp.pgn"),
            output: PathBuf::from("pos.txt"),
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceSettings {
    pub checkpoint: PathBuf,
    pub fen: String,
    /// UCI engine used for the reference score; material count when unset
    pub engine: Option<PathBuf>,
    pub engine_depth: u32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            checkpoint: PathBuf::from("model_checkpoint.bin"),
            fen: DEFAULT_FEN.to_string(),
            engine: None,
            engine_depth: 12,
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
