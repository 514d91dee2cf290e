//! Domain services: prediction models, the resolution cascade, geocoding,
//! and the sector recommendation engine

pub mod climate;
pub mod geocoding;
pub mod recommendation;
pub mod resolver;
pub mod sector_actions;
pub mod statistical;
pub mod trainer;
pub mod verdict;
