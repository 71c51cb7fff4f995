//! weatherapi.com client
//!
//! Fetches `forecast.json` for four days, drops today and normalizes the next
//! three days into [`DayForecast`] values for the requested unit group.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::ForecastProvider;
use crate::config::WeatherConfig;
use crate::error::WeatherWiseError;
use crate::models::{DayForecast, FORECAST_DAYS, LocationQuery, UnitGroup};

/// Today plus the three days we report on
const REQUESTED_DAYS: usize = FORECAST_DAYS + 1;

/// Weather API client for weatherapi.com
pub struct WeatherApiClient {
    /// HTTP client with retry middleware
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(api_key: String, config: &WeatherConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WeatherWise/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self, location_param: &str) -> String {
        format!(
            "{}/forecast.json?key={}&q={}&days={}&aqi=no&alerts=no",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(location_param),
            REQUESTED_DAYS
        )
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiClient {
    #[instrument(skip(self), fields(location = %location.provider_param(), units = %units))]
    async fn three_day_forecast(
        &self,
        location: &LocationQuery,
        units: UnitGroup,
    ) -> crate::Result<Vec<DayForecast>> {
        let start_time = Instant::now();
        let response = self
            .client
            .get(self.forecast_url(&location.provider_param()))
            .send()
            .await?;

        let status = response.status();
        debug!("Weather API responded with {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown error").to_string());
            return Err(WeatherWiseError::weather(format!(
                "Weather provider returned {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let payload: ForecastResponse = response.json().await.map_err(|e| {
            WeatherWiseError::weather(format!(
                "Invalid forecast data from weather provider: {}",
                e.without_url()
            ))
        })?;

        let days = normalize(payload, units)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {}-day forecast in {:.3}s",
            days.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow weather API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(days)
    }
}

/// Turn a provider payload into the three days after today
fn normalize(payload: ForecastResponse, units: UnitGroup) -> crate::Result<Vec<DayForecast>> {
    let forecast_days = payload.forecast.map(|f| f.forecastday).unwrap_or_default();

    let days: Vec<DayForecast> = forecast_days
        .into_iter()
        .skip(1)
        .take(FORECAST_DAYS)
        .map(|fd| normalize_day(fd, units))
        .collect::<crate::Result<_>>()?;

    if days.len() < FORECAST_DAYS {
        return Err(WeatherWiseError::weather(format!(
            "Weather provider returned {} future days, expected {}",
            days.len(),
            FORECAST_DAYS
        )));
    }

    Ok(days)
}

fn normalize_day(fd: ForecastDay, units: UnitGroup) -> crate::Result<DayForecast> {
    let day = fd.day;
    let (tempmin, tempmax) = if units.is_fahrenheit() {
        (day.mintemp_f, day.maxtemp_f)
    } else {
        (day.mintemp_c, day.maxtemp_c)
    };

    let missing = |field: &str| {
        WeatherWiseError::weather(format!("Forecast for {} is missing {field}", fd.date))
    };

    Ok(DayForecast {
        date: fd.date,
        tempmin: tempmin.ok_or_else(|| missing("minimum temperature"))?,
        tempmax: tempmax.ok_or_else(|| missing("maximum temperature"))?,
        humidity: day.avghumidity.ok_or_else(|| missing("humidity"))?,
        // Wind stays in mph and precipitation in inches for every unit group
        windspeed: day.maxwind_mph.ok_or_else(|| missing("wind speed"))?,
        precip: day.totalprecip_in.unwrap_or(0.0),
        description: day
            .condition
            .and_then(|c| c.text)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Clear".to_string()),
    })
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    forecast: Option<ForecastBlock>,
}

#[derive(Debug, Deserialize)]
struct ForecastBlock {
    #[serde(default)]
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: NaiveDate,
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    mintemp_f: Option<f64>,
    maxtemp_f: Option<f64>,
    mintemp_c: Option<f64>,
    maxtemp_c: Option<f64>,
    maxwind_mph: Option<f64>,
    totalprecip_in: Option<f64>,
    avghumidity: Option<f64>,
    condition: Option<Condition>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
