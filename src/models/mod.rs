//! Data models

pub mod stop;
pub mod table;
pub mod prediction;

pub use stop::*;
pub use table::*;
pub use prediction::*;
