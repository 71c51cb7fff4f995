//! `WeatherWise` - energy saving tips from the weather forecast
//!
//! This library provides the `/api/tips` service (forecast retrieval, model
//! generated tips with a rule-based fallback) and the client that composes
//! and sends requests to it.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod models;
pub mod tips;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use client::{FormInput, RequestComposer, TipsClient, TipsSession};
pub use config::WeatherWiseConfig;
pub use error::WeatherWiseError;
pub use models::{DayForecast, DayReport, Focus, LocationQuery, TipsRequest, TipsResponse, UnitGroup};
pub use tips::TipsService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherWiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
