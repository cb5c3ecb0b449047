//! Weather tool: geocode a city, fetch its forecast, translate the weather
//! code and fold everything into one [`WeatherResult`].
//!
//! Every failure short-circuits into a `weather_error` payload. Nothing here
//! retries and nothing is cached.

use crate::config::UpstreamConfig;
use crate::geo::Geocoder;
use crate::models::weather::WEATHER_SOURCE;
use crate::models::{CurrentConditions, ForecastSnapshot, WeatherReport, WeatherResult};
use crate::{AppsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub mod codes;
pub mod open_meteo;

pub use codes::describe_weather_code;
pub use open_meteo::OpenMeteoClient;

/// Current and day-0 forecast for a coordinate pair
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastSnapshot>;
}

/// Composes the geocoder and the forecast provider
#[derive(Clone)]
pub struct WeatherService {
    geocoder: Arc<dyn Geocoder>,
    forecasts: Arc<dyn ForecastProvider>,
}

impl WeatherService {
    #[must_use]
    pub fn new(geocoder: Arc<dyn Geocoder>, forecasts: Arc<dyn ForecastProvider>) -> Self {
        Self {
            geocoder,
            forecasts,
        }
    }

    /// Wire both roles to Open-Meteo at the configured base URLs
    #[must_use]
    pub fn open_meteo(client: Client, upstream: &UpstreamConfig) -> Self {
        let open_meteo = Arc::new(OpenMeteoClient::new(
            client,
            upstream.geocoding_base_url.clone(),
            upstream.forecast_base_url.clone(),
        ));
        Self::new(open_meteo.clone(), open_meteo)
    }

    /// Look up the weather for `city`. Never fails: problems come back as
    /// `WeatherResult::Error`.
    #[instrument(skip(self))]
    pub async fn lookup(&self, city: &str) -> WeatherResult {
        match self.try_lookup(city).await {
            Ok(report) => {
                info!(
                    "Weather for '{}' resolved to {}",
                    city, report.location.name
                );
                WeatherResult::Weather(report)
            }
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {}", city, e);
                WeatherResult::failure(city.trim(), e.user_message())
            }
        }
    }

    async fn try_lookup(&self, city: &str) -> Result<WeatherReport> {
        let query = city.trim();
        if query.is_empty() {
            return Err(AppsError::validation("City is required."));
        }

        let location = self.geocoder.geocode(query).await?.ok_or_else(|| {
            AppsError::not_found(format!(
                "No location found for \"{query}\". Try adding more detail, such as a state or country."
            ))
        })?;

        let snapshot = self
            .forecasts
            .forecast(location.latitude, location.longitude)
            .await?;

        Ok(WeatherReport {
            query: query.to_string(),
            source: WEATHER_SOURCE.to_string(),
            location,
            current: CurrentConditions::from_observed(snapshot.current),
            today: snapshot.today,
        })
    }
}
