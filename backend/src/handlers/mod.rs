//! HTTP request handlers

pub mod geocoding;
pub mod ml;
pub mod recommendations;
pub mod weather;

pub use geocoding::geocode_location;
pub use ml::{get_ml_prediction, train_model};
pub use recommendations::get_recommendations;
pub use weather::get_weather_prediction;
