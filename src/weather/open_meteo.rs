//! Open-Meteo geocoding and forecast adapters
//!
//! Both endpoints are key-free. The geocoder asks for a single English match;
//! the forecast asks for current conditions plus day 0 of the daily series in
//! the location's own timezone.

use super::ForecastProvider;
use crate::geo::Geocoder;
use crate::http::{endpoint, get_json};
use crate::models::{DailyForecast, ForecastSnapshot, Location, ObservedConditions};
use crate::{AppsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

const GEOCODING_SERVICE: &str = "Open-Meteo geocoding";
const FORECAST_SERVICE: &str = "Open-Meteo forecast";

const DEFAULT_TEMPERATURE_UNIT: &str = "°C";
const DEFAULT_WIND_SPEED_UNIT: &str = "km/h";
const DEFAULT_PRECIPITATION_UNIT: &str = "%";

/// Raw response types of the Open-Meteo API
mod dto {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingMatch>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingMatch {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
        pub admin1: Option<String>,
        pub timezone: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current_units: Option<CurrentUnits>,
        pub current: Option<Current>,
        pub daily_units: Option<DailyUnits>,
        pub daily: Option<Daily>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct CurrentUnits {
        pub temperature_2m: Option<String>,
        pub wind_speed_10m: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub time: String,
        pub temperature_2m: f64,
        pub wind_speed_10m: f64,
        pub weather_code: i64,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct DailyUnits {
        pub precipitation_probability_max: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Daily {
        #[serde(default)]
        pub time: Vec<String>,
        #[serde(default)]
        pub temperature_2m_max: Vec<Option<f64>>,
        #[serde(default)]
        pub temperature_2m_min: Vec<Option<f64>>,
        #[serde(default)]
        pub precipitation_probability_max: Vec<Option<f64>>,
    }
}

impl From<dto::GeocodingMatch> for Location {
    fn from(result: dto::GeocodingMatch) -> Self {
        let name = Location::compose_name(
            &result.name,
            &[result.admin1.as_deref(), result.country.as_deref()],
        );
        Location::new(name, result.latitude, result.longitude).with_timezone(result.timezone)
    }
}

/// Client for both Open-Meteo endpoints
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_base_url: String,
    forecast_base_url: String,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(
        client: Client,
        geocoding_base_url: impl Into<String>,
        forecast_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            geocoding_base_url: geocoding_base_url.into(),
            forecast_base_url: forecast_base_url.into(),
        }
    }

    fn geocoding_url(&self, query: &str) -> String {
        format!(
            "{}?name={}&count=1&language=en&format=json",
            endpoint(&self.geocoding_base_url, "v1/search"),
            urlencoding::encode(query)
        )
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={latitude}&longitude={longitude}\
             &current=temperature_2m,wind_speed_10m,weather_code\
             &daily=temperature_2m_max,temperature_2m_min,precipitation_probability_max\
             &timezone=auto&forecast_days=1",
            endpoint(&self.forecast_base_url, "v1/forecast"),
        )
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Location>> {
        info!("Geocoding location: '{}'", query);
        let response: dto::GeocodingResponse =
            get_json(&self.client, GEOCODING_SERVICE, &self.geocoding_url(query)).await?;

        let location = response
            .results
            .and_then(|results| results.into_iter().next())
            .map(Location::from);

        match &location {
            Some(location) => debug!(
                "Found location: {} ({})",
                location.name,
                location.format_coordinates()
            ),
            None => warn!("No results found for location '{}'", query),
        }

        Ok(location)
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastSnapshot> {
        info!(
            "Getting forecast for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let response: dto::ForecastResponse = get_json(
            &self.client,
            FORECAST_SERVICE,
            &self.forecast_url(latitude, longitude),
        )
        .await?;

        snapshot_from_response(response)
    }
}

/// Pick the fields the weather tool reports and fill in missing units
fn snapshot_from_response(response: dto::ForecastResponse) -> Result<ForecastSnapshot> {
    let current = response
        .current
        .ok_or_else(|| invalid_forecast("no current conditions"))?;
    let daily = response
        .daily
        .ok_or_else(|| invalid_forecast("no daily forecast"))?;
    let current_units = response.current_units.unwrap_or_default();
    let daily_units = response.daily_units.unwrap_or_default();

    let date = daily
        .time
        .first()
        .cloned()
        .ok_or_else(|| invalid_forecast("empty daily series"))?;
    let high = first_value(&daily.temperature_2m_max)
        .ok_or_else(|| invalid_forecast("no maximum temperature for today"))?;
    let low = first_value(&daily.temperature_2m_min)
        .ok_or_else(|| invalid_forecast("no minimum temperature for today"))?;

    Ok(ForecastSnapshot {
        current: ObservedConditions {
            time: current.time,
            temperature: current.temperature_2m,
            temperature_unit: unit_or(current_units.temperature_2m, DEFAULT_TEMPERATURE_UNIT),
            wind_speed: current.wind_speed_10m,
            wind_speed_unit: unit_or(current_units.wind_speed_10m, DEFAULT_WIND_SPEED_UNIT),
            weather_code: current.weather_code,
        },
        today: DailyForecast {
            date,
            high,
            low,
            precipitation_probability: first_value(&daily.precipitation_probability_max),
            precipitation_unit: unit_or(
                daily_units.precipitation_probability_max,
                DEFAULT_PRECIPITATION_UNIT,
            ),
        },
    })
}

fn first_value(series: &[Option<f64>]) -> Option<f64> {
    series.first().copied().flatten()
}

fn unit_or(unit: Option<String>, default: &str) -> String {
    unit.filter(|u| !u.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn invalid_forecast(reason: &str) -> AppsError {
    AppsError::upstream(FORECAST_SERVICE, None, format!("invalid response: {reason}"))
}

#[cfg(test)]
pub(crate) mod fixture {
    //! Fake Open-Meteo serving canned Paris data

    use axum::{Json, Router, extract::Query, routing::get};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    pub fn router() -> Router {
        Router::new()
            .route("/v1/search", get(search))
            .route("/v1/forecast", get(forecast))
    }

    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let name = params.get("name").map(String::as_str).unwrap_or_default();
        if name.to_lowercase().starts_with("paris") {
            Json(json!({
                "results": [{
                    "id": 2_988_507,
                    "name": "Paris",
                    "latitude": 48.853_41,
                    "longitude": 2.3488,
                    "country": "France",
                    "admin1": "Île-de-France",
                    "timezone": "Europe/Paris"
                }],
                "generationtime_ms": 0.5
            }))
        } else {
            Json(json!({ "generationtime_ms": 0.3 }))
        }
    }

    // Units are omitted on purpose so the defaults apply
    async fn forecast(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let latitude: f64 = params
            .get("latitude")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Json(json!({
            "latitude": latitude,
            "current": {
                "time": "2025-06-01T14:00",
                "interval": 900,
                "temperature_2m": 21.5,
                "wind_speed_10m": 12.0,
                "weather_code": 2
            },
            "daily": {
                "time": ["2025-06-01"],
                "temperature_2m_max": [24.0],
                "temperature_2m_min": [14.5],
                "precipitation_probability_max": [10]
            }
        }))
    }
}
