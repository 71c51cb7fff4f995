use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::models::LocationQuery;

pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(8);

/// Resolve device coordinates, giving up after `timeout`.
///
/// Denial, errors, out-of-range values and timeouts all yield `None`; the
/// caller then needs a typed location.
pub async fn acquire_coordinates<F>(lookup: F, timeout: Duration) -> Option<LocationQuery>
where
    F: Future<Output = anyhow::Result<(f64, f64)>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok((lat, lon))) => match LocationQuery::coordinates(lat, lon) {
            Ok(query) => {
                debug!("Device coordinates {},{}", lat, lon);
                Some(query)
            }
            Err(e) => {
                warn!("Ignoring device coordinates: {}", e);
                None
            }
        },
        Ok(Err(e)) => {
            debug!("Location unavailable: {}", e);
            None
        }
        Err(_) => {
            debug!("Location lookup timed out after {:?}", timeout);
            None
        }
    }
}
