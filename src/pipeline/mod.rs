//! Pipeline module - load, clean and annotate production runs

pub mod columns;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod missing;

pub use columns::*;
pub use error::*;
pub use loader::*;
pub use metrics::*;
pub use missing::*;
