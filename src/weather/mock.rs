//! Randomized forecast for local development without a weather key

use async_trait::async_trait;
use chrono::{Days, Local};
use rand::RngExt;

use super::ForecastProvider;
use crate::models::{DayForecast, FORECAST_DAYS, LocationQuery, UnitGroup};

const DESCRIPTIONS: [&str; 5] = [
    "Clear skies",
    "Partly cloudy",
    "Light rain",
    "Sunny",
    "Scattered clouds",
];

/// Plausible US-unit weather for the next three days
pub struct MockForecast;

#[async_trait]
impl ForecastProvider for MockForecast {
    async fn three_day_forecast(
        &self,
        location: &LocationQuery,
        _units: UnitGroup,
    ) -> crate::Result<Vec<DayForecast>> {
        tracing::debug!("Serving mock forecast for {}", location.provider_param());
        Ok(mock_days())
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn mock_days() -> Vec<DayForecast> {
    let mut rng = rand::rng();
    let today = Local::now().date_naive();

    (1..=FORECAST_DAYS as u64)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| DayForecast {
            date,
            tempmin: round_to(60.0 + rng.random_range(-5.0..=5.0), 1),
            tempmax: round_to(75.0 + rng.random_range(-5.0..=10.0), 1),
            humidity: (35.0 + rng.random_range(0.0..50.0_f64)).floor(),
            windspeed: round_to(5.0 + rng.random_range(0.0..=20.0), 1),
            precip: round_to(rng.random_range(0.0..=0.5), 2),
            description: DESCRIPTIONS[rng.random_range(0..DESCRIPTIONS.len())].to_string(),
        })
        .collect()
}
