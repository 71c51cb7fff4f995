//! Turns form input into a tips request, locally rejecting what would be a
//! pointless network call

use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::{Focus, LocationQuery, TipsRequest, UnitGroup};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Please enter a location or allow location access")]
    LocationRequired,

    #[error("Nothing changed since the last request")]
    Unchanged,
}

/// What the user entered
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub location: String,
    pub unit_group: UnitGroup,
    pub focuses: Vec<Focus>,
}

#[derive(Debug, Clone, PartialEq)]
struct Submission {
    location: LocationQuery,
    unit_group: UnitGroup,
    focuses: BTreeSet<Focus>,
}

impl From<&TipsRequest> for Submission {
    fn from(request: &TipsRequest) -> Self {
        Self {
            location: request.location.clone(),
            unit_group: request.unit_group,
            focuses: request.focuses.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestComposer {
    coordinates: Option<LocationQuery>,
    last_success: Option<Submission>,
}

impl RequestComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember device coordinates. Only coordinate queries are accepted.
    pub fn set_coordinates(&mut self, coordinates: LocationQuery) {
        if matches!(coordinates, LocationQuery::Coordinates { .. }) {
            self.coordinates = Some(coordinates);
        }
    }

    /// Typed location first, device coordinates second
    pub fn compose(&self, form: &FormInput) -> Result<TipsRequest, ComposeError> {
        let location = match LocationQuery::name(&form.location) {
            Ok(name) => name,
            Err(_) => self
                .coordinates
                .clone()
                .ok_or(ComposeError::LocationRequired)?,
        };

        let request = TipsRequest {
            location,
            unit_group: form.unit_group,
            focuses: Focus::parse_all(form.focuses.iter().map(Focus::as_str)),
        };

        if self.last_success.as_ref() == Some(&Submission::from(&request)) {
            return Err(ComposeError::Unchanged);
        }

        Ok(request)
    }

    /// Called once a request has produced a rendered response
    pub fn record_success(&mut self, request: &TipsRequest) {
        self.last_success = Some(Submission::from(request));
    }
}
