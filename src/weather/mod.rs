//! Forecast providers
//!
//! Every provider yields exactly [`FORECAST_DAYS`](crate::models::FORECAST_DAYS)
//! normalized days starting tomorrow, or fails the whole request.

use async_trait::async_trait;

use crate::models::{DayForecast, LocationQuery, UnitGroup};

pub mod mock;
pub mod weather_api;

pub use mock::MockForecast;
pub use weather_api::WeatherApiClient;

/// Source of three-day forecasts
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Forecast for the three days after today, in the requested unit group
    async fn three_day_forecast(
        &self,
        location: &LocationQuery,
        units: UnitGroup,
    ) -> crate::Result<Vec<DayForecast>>;
}
