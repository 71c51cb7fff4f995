//! Client side of `POST /api/tips`
//!
//! [`TipsSession`] holds what a form page would: the composer's memory of the
//! last successful submission, the most recent response, and whether a request
//! is in flight. A failed request never replaces the response on display.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::models::{LocationQuery, TipsResponse};

pub mod composer;
pub mod geolocation;
pub mod http;

pub use composer::{ComposeError, FormInput, RequestComposer};
pub use geolocation::{GEOLOCATION_TIMEOUT, acquire_coordinates};
pub use http::{ClientError, GENERIC_FAILURE, TipsClient};

/// Sets the busy flag, and clears it when dropped whatever the outcome
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TipsSession {
    composer: RequestComposer,
    client: TipsClient,
    busy: AtomicBool,
    last_response: Option<TipsResponse>,
}

impl TipsSession {
    pub fn new(client: TipsClient) -> Self {
        Self {
            composer: RequestComposer::new(),
            client,
            busy: AtomicBool::new(false),
            last_response: None,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: LocationQuery) {
        self.composer.set_coordinates(coordinates);
    }

    /// True while a fetch is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn last_response(&self) -> Option<&TipsResponse> {
        self.last_response.as_ref()
    }

    /// Compose, send, and on success remember both the submission and the
    /// response. Returns the response now on display.
    pub async fn submit(&mut self, form: &FormInput) -> Result<&TipsResponse, ClientError> {
        let request = self.composer.compose(form)?;

        let response = {
            let _busy = BusyGuard::set(&self.busy);
            self.client.fetch(&request).await?
        };
        info!(
            "Tips for {} ({} days)",
            response.location,
            response.days.len()
        );

        self.composer.record_success(&request);
        Ok(&*self.last_response.insert(response))
    }
}
