//! Tips service
//!
//! Combines a three-day forecast with per-day tips. Each day asks the model
//! (when one is configured) and falls back to the rule table on any model
//! problem; days are generated concurrently and fall back independently.
//! Forecast failures fail the whole request.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::config::{RuntimeEnvironment, WeatherWiseConfig};
use crate::error::WeatherWiseError;
use crate::llm::{GeminiClient, Prompt, SuggestionModel, parse_suggestions};
use crate::models::{
    DayForecast, DayReport, DayTips, FORECAST_DAYS, TipSource, TipsRequest, TipsResponse,
};
use crate::weather::{ForecastProvider, MockForecast, WeatherApiClient};

pub mod fallback;
pub mod focus;

pub use fallback::fallback_tips;
pub use focus::apply_focus_rules;

/// Request handler shared by all connections
#[derive(Clone)]
pub struct TipsService {
    weather: Arc<dyn ForecastProvider>,
    model: Option<Arc<dyn SuggestionModel>>,
}

impl TipsService {
    pub fn new(
        weather: Arc<dyn ForecastProvider>,
        model: Option<Arc<dyn SuggestionModel>>,
    ) -> Self {
        Self { weather, model }
    }

    /// Wire up providers from configuration
    pub fn from_config(config: &WeatherWiseConfig) -> anyhow::Result<Self> {
        let weather: Arc<dyn ForecastProvider> = match (&config.weather.api_key, config.environment) {
            (Some(key), _) => Arc::new(WeatherApiClient::new(key.clone(), &config.weather)?),
            (None, RuntimeEnvironment::Development) => {
                warn!("No weather API key configured, serving mock forecasts");
                Arc::new(MockForecast)
            }
            (None, RuntimeEnvironment::Production) => {
                return Err(WeatherWiseError::config("WEATHERAPI_KEY is required in production").into());
            }
        };

        let model: Option<Arc<dyn SuggestionModel>> = match &config.llm.api_key {
            Some(key) => {
                info!("Generating tips with {}", config.llm.model);
                Some(Arc::new(GeminiClient::new(key.clone(), &config.llm)?))
            }
            None => {
                info!("No LLM API key configured, using rule-based tips");
                None
            }
        };

        Ok(Self::new(weather, model))
    }

    /// Forecast plus three tips for each of the next three days
    #[instrument(skip(self, request), fields(location = %request.location.provider_param(), units = %request.unit_group))]
    pub async fn handle(&self, request: TipsRequest) -> crate::Result<TipsResponse> {
        let forecast = self
            .weather
            .three_day_forecast(&request.location, request.unit_group)
            .await?;

        if forecast.len() < FORECAST_DAYS {
            return Err(WeatherWiseError::weather(format!(
                "Forecast has {} days, expected {}",
                forecast.len(),
                FORECAST_DAYS
            )));
        }

        let days: Vec<DayForecast> = forecast.into_iter().take(FORECAST_DAYS).collect();
        let tips = join_all(days.iter().map(|day| self.tips_for_day(day))).await;

        let days = days
            .into_iter()
            .zip(tips)
            .map(|(weather, day_tips)| {
                let suggestions = apply_focus_rules(&weather, &request.focuses, day_tips.tips);
                DayReport {
                    date: weather.date,
                    weather,
                    suggestions: suggestions.into(),
                }
            })
            .collect();

        Ok(TipsResponse {
            location: request.location.provider_param(),
            unit_group: request.unit_group,
            days,
        })
    }

    /// Model tips when available and well-formed, rule tips otherwise
    pub async fn tips_for_day(&self, day: &DayForecast) -> DayTips {
        let Some(model) = &self.model else {
            return rule_tips(day);
        };

        match self.model_tips(model.as_ref(), day).await {
            Ok(tips) => {
                debug!("Model tips for {}", day.date);
                DayTips {
                    tips,
                    source: TipSource::Model,
                }
            }
            Err(e) => {
                warn!("Falling back to rule-based tips for {}: {}", day.date, e);
                rule_tips(day)
            }
        }
    }

    async fn model_tips(
        &self,
        model: &dyn SuggestionModel,
        day: &DayForecast,
    ) -> crate::Result<[String; 3]> {
        let prompt = Prompt::for_day(day)?;
        let reply = model.complete(&prompt).await?;
        parse_suggestions(&reply)
            .ok_or_else(|| WeatherWiseError::llm("Reply was not exactly three suggestions"))
    }
}

fn rule_tips(day: &DayForecast) -> DayTips {
    DayTips {
        tips: fallback_tips(day),
        source: TipSource::Rules,
    }
}
