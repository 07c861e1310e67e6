pub mod cozy;
pub mod placement;

pub use cozy::Position;
pub use placement::Placement;
