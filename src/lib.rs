// Position features for value-network datasets and inference
pub mod board;
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod model;
pub mod pgn;
pub mod reference;

pub use encoder::{encode, Features, FEATURE_LEN};
pub use error::{Error, Result};
