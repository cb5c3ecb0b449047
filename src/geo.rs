//! Geocoding seam and distance helpers shared by the weather and places tools

use crate::Result;
use crate::models::Location;
use async_trait::async_trait;

/// Resolves free text to the single best-matching place
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the upstream answered but had no match; `Err` means
    /// the request itself failed.
    async fn geocode(&self, query: &str) -> Result<Option<Location>>;
}

/// Great-circle distance in metres
#[must_use]
pub fn distance_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.0,
            longitude: from.1,
        },
        haversine::Location {
            latitude: to.0,
            longitude: to.1,
        },
        haversine::Units::Kilometers,
    ) * 1_000.0
}
