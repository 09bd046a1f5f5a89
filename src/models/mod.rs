//! Core data models for the playoff engine.

mod bracket;
mod format;
mod game;
mod ids;
mod stats;
mod team;

pub use bracket::*;
pub use format::*;
pub use game::*;
pub use ids::*;
pub use stats::*;
pub use team::*;
