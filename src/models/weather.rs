//! Daily forecast model and unit groups

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WeatherWiseError;

/// Unit group selecting temperature presentation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitGroup {
    /// Fahrenheit temperatures
    #[default]
    Us,
    /// Celsius temperatures
    Metric,
    /// Celsius temperatures
    Uk,
}

impl UnitGroup {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitGroup::Us => "us",
            UnitGroup::Metric => "metric",
            UnitGroup::Uk => "uk",
        }
    }

    #[must_use]
    pub fn is_fahrenheit(&self) -> bool {
        matches!(self, UnitGroup::Us)
    }

    /// Temperature unit label
    #[must_use]
    pub fn temperature_label(&self) -> &'static str {
        if self.is_fahrenheit() { "°F" } else { "°C" }
    }
}

impl fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitGroup {
    type Err = WeatherWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(UnitGroup::Us),
            "metric" => Ok(UnitGroup::Metric),
            "uk" => Ok(UnitGroup::Uk),
            other => Err(WeatherWiseError::validation(format!(
                "Invalid unit_group '{other}'. Must be one of: us, metric, uk"
            ))),
        }
    }
}

/// One day of forecast data, normalized from the provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayForecast {
    /// Calendar day (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Minimum temperature in the requested unit group
    pub tempmin: f64,
    /// Maximum temperature in the requested unit group
    pub tempmax: f64,
    /// Average relative humidity in percent
    pub humidity: f64,
    /// Maximum wind speed in mph, whatever the unit group
    pub windspeed: f64,
    /// Total precipitation in inches
    pub precip: f64,
    /// Short condition text
    pub description: String,
}

impl DayForecast {
    /// Format the temperature range with its unit
    #[must_use]
    pub fn format_temperature(&self, units: UnitGroup) -> String {
        let label = units.temperature_label();
        format!("{:.0}{label} / {:.0}{label}", self.tempmin, self.tempmax)
    }
}
