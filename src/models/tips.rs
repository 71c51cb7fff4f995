//! Tips request/response contract shared by the service and the client

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DayForecast, LocationQuery, UnitGroup};
use crate::error::WeatherWiseError;

/// Number of forecast days in every response
pub const FORECAST_DAYS: usize = 3;

/// Number of tips generated for each day
pub const TIPS_PER_DAY: usize = 3;

/// Optional topic biasing tip generation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Thermostat,
    Sprinklers,
    Solar,
}

impl Focus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Thermostat => "thermostat",
            Focus::Sprinklers => "sprinklers",
            Focus::Solar => "solar",
        }
    }

    /// Keep the recognized topics, in first-seen order, without duplicates
    pub fn parse_all<I, S>(values: I) -> Vec<Focus>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut focuses = Vec::new();
        for focus in values.into_iter().filter_map(|v| v.as_ref().parse::<Focus>().ok()) {
            if !focuses.contains(&focus) {
                focuses.push(focus);
            }
        }
        focuses
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Focus {
    type Err = WeatherWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thermostat" => Ok(Focus::Thermostat),
            "sprinklers" => Ok(Focus::Sprinklers),
            "solar" => Ok(Focus::Solar),
            other => Err(WeatherWiseError::validation(format!("Unknown focus '{other}'"))),
        }
    }
}

/// A validated tips request
#[derive(Debug, Clone, PartialEq)]
pub struct TipsRequest {
    pub location: LocationQuery,
    pub unit_group: UnitGroup,
    pub focuses: Vec<Focus>,
}

/// JSON body of `POST /api/tips`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TipsRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focuses: Option<Vec<String>>,
}

impl TryFrom<TipsRequestBody> for TipsRequest {
    type Error = WeatherWiseError;

    fn try_from(body: TipsRequestBody) -> Result<Self, Self::Error> {
        let name = body
            .location
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        // A full coordinate pair wins over a place name
        let location = match (body.lat, body.lon, name) {
            (Some(lat), Some(lon), _) => LocationQuery::coordinates(lat, lon)?,
            (_, _, Some(name)) => LocationQuery::name(name)?,
            _ => return Err(WeatherWiseError::validation("Location is required")),
        };

        let unit_group = match body.unit_group.as_deref() {
            Some(value) => value.parse()?,
            None => UnitGroup::default(),
        };

        let focuses = match body.focuses {
            Some(values) if !values.is_empty() => Focus::parse_all(values),
            _ => Focus::parse_all(body.focus),
        };

        Ok(TipsRequest {
            location,
            unit_group,
            focuses,
        })
    }
}

impl From<&TipsRequest> for TipsRequestBody {
    fn from(request: &TipsRequest) -> Self {
        let (location, lat, lon) = match &request.location {
            LocationQuery::Name(name) => (Some(name.clone()), None, None),
            LocationQuery::Coordinates { lat, lon } => (None, Some(*lat), Some(*lon)),
        };

        Self {
            location,
            lat,
            lon,
            unit_group: Some(request.unit_group.to_string()),
            focus: None,
            focuses: (!request.focuses.is_empty())
                .then(|| request.focuses.iter().map(ToString::to_string).collect()),
        }
    }
}

/// Which branch produced a day's tips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipSource {
    /// Parsed from the LLM reply
    Model,
    /// Produced by the deterministic rule table
    Rules,
}

/// Exactly three tips for one day
#[derive(Debug, Clone, PartialEq)]
pub struct DayTips {
    pub tips: [String; TIPS_PER_DAY],
    pub source: TipSource,
}

/// One day of the response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub weather: DayForecast,
    pub suggestions: Vec<String>,
}

/// Body of a successful `POST /api/tips`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TipsResponse {
    pub location: String,
    pub unit_group: UnitGroup,
    pub days: Vec<DayReport>,
}

impl TipsResponse {
    /// Check the shape every successful response must have
    pub fn validate(&self) -> crate::Result<()> {
        if self.days.len() != FORECAST_DAYS {
            return Err(WeatherWiseError::validation(format!(
                "Expected {FORECAST_DAYS} days, got {}",
                self.days.len()
            )));
        }

        for day in &self.days {
            if day.suggestions.len() != TIPS_PER_DAY
                || day.suggestions.iter().any(|s| s.trim().is_empty())
            {
                return Err(WeatherWiseError::validation(format!(
                    "Expected {TIPS_PER_DAY} tips for {}",
                    day.date
                )));
            }
        }

        Ok(())
    }
}
