//! Utilities - terminal styling and progress spinners

mod progress;
mod styling;

pub use progress::*;
pub use styling::*;
