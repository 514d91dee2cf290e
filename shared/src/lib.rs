//! Shared types and models for the Will It Rain platform
//!
//! This crate contains the canonical prediction record and the sector
//! recommendation types exchanged between the backend and the frontend.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
