//! Report module - run summaries and metrics export

pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;
