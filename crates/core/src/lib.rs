//! Scoring, turn order and match flow for chip-and-putt. Keep this crate free of IO and terminal concerns.

pub mod config;
pub mod events;
pub mod ids;
pub mod model;
pub mod order;
pub mod reducer;
pub mod scoring;
pub mod state;
pub mod validation;

pub use config::*;
pub use events::*;
pub use ids::*;
pub use model::*;
pub use order::*;
pub use reducer::*;
pub use scoring::*;
pub use state::*;
pub use validation::*;
