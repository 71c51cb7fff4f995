//! LLM-backed tip suggestions
//!
//! The model only ever sees one day of forecast data and must answer with
//! `{"suggestions": [tip, tip, tip]}`. Anything else is treated as unusable
//! and the caller falls back to the rule table.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{DayForecast, TIPS_PER_DAY};

pub mod gemini;

pub use gemini::GeminiClient;

const SYSTEM_INSTRUCTION: &str = "You are WeatherWise, a friendly energy-saving assistant. \
Given a single day's weather data, produce three concrete, varied tips that help a typical \
household save energy, water, or money. Use short, crisp sentences. Avoid repeating the same \
structure or phrases across tips.";

/// Text sent to a model for one day
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the prompt for one day of forecast data
    pub fn for_day(day: &DayForecast) -> crate::Result<Self> {
        let weather = serde_json::to_string(day)
            .map_err(|e| crate::WeatherWiseError::llm(format!("Failed to encode forecast: {e}")))?;

        let user = format!(
            "Weather JSON: {weather}\n\n\
             Return strictly this JSON shape (no extra text):\n\
             {{\"suggestions\": [\"tip1\", \"tip2\", \"tip3\"]}}\n\n\
             Constraints:\n\
             - Exactly {TIPS_PER_DAY} tips.\n\
             - 6-20 words each.\n\
             - Each states an action and expected benefit (energy, water, or money).\n\
             - Vary wording and focus (HVAC, lighting, laundry, irrigation, EV, solar, cooking, etc).\n\
             - Use Fahrenheit-friendly phrasing if temps look like US units.\n"
        );

        Ok(Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            user,
        })
    }
}

/// A text-completion model
#[async_trait]
pub trait SuggestionModel: Send + Sync {
    /// Raw reply text for the prompt
    async fn complete(&self, prompt: &Prompt) -> crate::Result<String>;
}

#[derive(Deserialize)]
struct SuggestionsReply {
    suggestions: Vec<serde_json::Value>,
}

/// Extract exactly three string suggestions from a model reply
#[must_use]
pub fn parse_suggestions(reply: &str) -> Option<[String; TIPS_PER_DAY]> {
    let text = reply.trim().trim_matches(|c: char| c == '`' || c.is_whitespace());
    // Fenced replies often carry a language tag
    let text = text.strip_prefix("json").unwrap_or(text).trim();

    let parsed: SuggestionsReply = serde_json::from_str(text).ok()?;
    let suggestions = parsed
        .suggestions
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect::<Option<Vec<String>>>()?;

    suggestions.try_into().ok()
}
