use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort an encoding, dataset or inference run.
///
/// None of these are recovered locally; callers propagate them to the
/// binary, which reports and exits.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("illegal move {mv:?} at ply {ply}: {reason}")]
    IllegalMove { ply: usize, mv: String, reason: String },

    #[error("game {game}: {reason}")]
    GameParse { game: usize, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model {what} is {found}, expected {expected}")]
    ModelShapeMismatch { what: &'static str, expected: usize, found: usize },

    #[error("bad checkpoint: {0}")]
    Checkpoint(String),

    #[error("config: {0}")]
    Config(String),

    #[error("reference engine: {0}")]
    Engine(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
