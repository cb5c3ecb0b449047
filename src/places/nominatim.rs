//! Nominatim free-text search (`GET /search?format=jsonv2`)
//!
//! Nominatim's usage policy requires an identifying User-Agent; the shared
//! client sends the configured one.

use crate::geo::Geocoder;
use crate::http::{endpoint, get_json};
use crate::models::Location;
use crate::{AppsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const SERVICE: &str = "Nominatim";

/// Nominatim sends coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<SearchResult> for Location {
    type Error = AppsError;

    fn try_from(result: SearchResult) -> Result<Self> {
        let parse = |value: &str| {
            value.parse::<f64>().map_err(|_| {
                AppsError::upstream(SERVICE, None, format!("invalid coordinate '{value}'"))
            })
        };
        let latitude = parse(&result.lat)?;
        let longitude = parse(&result.lon)?;
        Ok(Location::new(result.display_name, latitude, longitude))
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&format=jsonv2&limit=1",
            endpoint(&self.base_url, "search"),
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Location>> {
        let results: Vec<SearchResult> =
            get_json(&self.client, SERVICE, &self.search_url(query)).await?;

        let Some(first) = results.into_iter().next() else {
            warn!("No results found for location '{}'", query);
            return Ok(None);
        };

        let location = Location::try_from(first)?;
        debug!("Found location: {} ({})", location.name, location.format_coordinates());
        Ok(Some(location))
    }
}
