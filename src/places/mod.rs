//! Fast-food tool: resolve a place with Nominatim, then list fast-food
//! outlets around it from Overpass, nearest first.

use crate::config::{MAX_RADIUS_METERS, MIN_RADIUS_METERS, PlacesConfig, UpstreamConfig};
use crate::geo::Geocoder;
use crate::models::places::PLACES_SOURCE;
use crate::models::{Place, PlacesReport, PlacesResult};
use crate::{AppsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub mod nominatim;
pub mod overpass;

pub use nominatim::NominatimClient;
pub use overpass::{OverpassClient, build_query};

/// Overpass cannot filter on tags in `out`, so ask for more than we keep
const OVERFETCH_FACTOR: usize = 3;

#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Named fast-food places within `radius_meters`, in no particular order
    async fn fast_food_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
        max_results: usize,
    ) -> Result<Vec<Place>>;
}

#[derive(Clone)]
pub struct PlacesService {
    geocoder: Arc<dyn Geocoder>,
    source: Arc<dyn PlaceSource>,
    defaults: PlacesConfig,
}

impl PlacesService {
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        source: Arc<dyn PlaceSource>,
        defaults: PlacesConfig,
    ) -> Self {
        Self {
            geocoder,
            source,
            defaults,
        }
    }

    #[must_use]
    pub fn openstreetmap(client: Client, upstream: &UpstreamConfig, defaults: PlacesConfig) -> Self {
        Self::new(
            Arc::new(NominatimClient::new(
                client.clone(),
                upstream.nominatim_base_url.clone(),
            )),
            Arc::new(OverpassClient::new(client, upstream.overpass_base_url.clone())),
            defaults,
        )
    }

    /// Radius actually searched for a requested one
    #[must_use]
    pub fn effective_radius(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.defaults.radius_meters)
            .clamp(MIN_RADIUS_METERS, MAX_RADIUS_METERS)
    }

    /// Search around `location`; failures come back as `PlacesResult::Error`
    #[instrument(skip(self))]
    pub async fn search(&self, location: &str, radius_meters: Option<u32>) -> PlacesResult {
        match self.try_search(location, radius_meters).await {
            Ok(report) => {
                info!(
                    "Found {} places near {}",
                    report.places.len(),
                    report.location.name
                );
                PlacesResult::FastFood(report)
            }
            Err(e) => {
                warn!("Fast-food search for '{}' failed: {}", location, e);
                PlacesResult::failure(location.trim(), e.user_message())
            }
        }
    }

    async fn try_search(&self, query: &str, radius_meters: Option<u32>) -> Result<PlacesReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppsError::validation("Location is required."));
        }
        let radius = self.effective_radius(radius_meters);

        let location = self.geocoder.geocode(query).await?.ok_or_else(|| {
            AppsError::not_found(format!(
                "No location found for \"{query}\". Try adding more detail, such as a city or country."
            ))
        })?;

        let limit = self.defaults.limit;
        let mut places = self
            .source
            .fast_food_near(
                location.latitude,
                location.longitude,
                radius,
                limit * OVERFETCH_FACTOR,
            )
            .await?;
        places.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
        places.truncate(limit);

        Ok(PlacesReport {
            query: query.to_string(),
            source: PLACES_SOURCE.to_string(),
            location,
            radius_meters: radius,
            places,
        })
    }
}
