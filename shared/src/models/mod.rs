//! Domain models shared across the platform

pub mod prediction;
pub mod recommendation;

pub use prediction::*;
pub use recommendation::*;
