//! Location model for place names and geographic coordinates

use serde::{Deserialize, Serialize};

use crate::error::WeatherWiseError;

/// Where a forecast is requested for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text place name (city, postal code, ...)
    Name(String),
    /// Latitude and longitude in decimal degrees
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Build a name query, rejecting blank input
    pub fn name<S: AsRef<str>>(name: S) -> crate::Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(WeatherWiseError::validation("Location is required"));
        }
        Ok(Self::Name(name.to_string()))
    }

    /// Build a coordinate query, validating ranges
    pub fn coordinates(lat: f64, lon: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(WeatherWiseError::validation(format!(
                "Latitude must be between -90 and 90, got: {lat}"
            )));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherWiseError::validation(format!(
                "Longitude must be between -180 and 180, got: {lon}"
            )));
        }

        Ok(Self::Coordinates { lat, lon })
    }

    /// Parameter handed to the weather provider. Doubles as the response label.
    #[must_use]
    pub fn provider_param(&self) -> String {
        match self {
            LocationQuery::Name(name) => name.clone(),
            LocationQuery::Coordinates { lat, lon } => format!("{lat},{lon}"),
        }
    }
}
