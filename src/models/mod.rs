//! Data models for the WeatherWise service
//!
//! This module contains the transient domain values organized by concern:
//! - Location: place names and coordinates
//! - Weather: unit groups and normalized daily forecasts
//! - Tips: the request/response contract of `POST /api/tips`

pub mod location;
pub mod tips;
pub mod weather;

// Re-export all public types for convenient access
pub use location::LocationQuery;
pub use tips::{
    DayReport, DayTips, FORECAST_DAYS, Focus, TIPS_PER_DAY, TipSource, TipsRequest,
    TipsRequestBody, TipsResponse,
};
pub use weather::{DayForecast, UnitGroup};
