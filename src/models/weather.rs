//! Weather payloads exchanged between the forecast adapter, the composer and
//! the widget.
//!
//! Field names serialize in camelCase because the widget reads them as-is.

use super::Location;
use crate::weather::codes::describe_weather_code;
use serde::{Deserialize, Serialize};

pub const WEATHER_SOURCE: &str = "open-meteo.com";

/// Current observation as the forecast API reports it, before translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedConditions {
    pub time: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: f64,
    pub wind_speed_unit: String,
    pub weather_code: i64,
}

/// Current conditions with the weather code translated to text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub time: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: f64,
    pub wind_speed_unit: String,
    pub weather_code: i64,
    pub conditions: String,
}

impl CurrentConditions {
    #[must_use]
    pub fn from_observed(observed: ObservedConditions) -> Self {
        Self {
            conditions: describe_weather_code(observed.weather_code).to_string(),
            time: observed.time,
            temperature: observed.temperature,
            temperature_unit: observed.temperature_unit,
            wind_speed: observed.wind_speed,
            wind_speed_unit: observed.wind_speed_unit,
            weather_code: observed.weather_code,
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}{}", self.temperature, self.temperature_unit)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} {}", self.wind_speed, self.wind_speed_unit)
    }
}

/// Day-0 values of the daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub high: f64,
    pub low: f64,
    /// Absent when the upstream has no probability for the day
    pub precipitation_probability: Option<f64>,
    pub precipitation_unit: String,
}

/// What the forecast adapter hands back for one coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub current: ObservedConditions,
    pub today: DailyForecast,
}

/// Successful weather lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub query: String,
    pub source: String,
    pub location: Location,
    pub current: CurrentConditions,
    pub today: DailyForecast,
}

/// Failed weather lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherFailure {
    pub query: String,
    pub error: String,
}

/// Structured payload of the weather tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WeatherResult {
    #[serde(rename = "weather")]
    Weather(WeatherReport),
    #[serde(rename = "weather_error")]
    Error(WeatherFailure),
}

impl WeatherResult {
    #[must_use]
    pub fn failure(query: &str, error: impl Into<String>) -> Self {
        Self::Error(WeatherFailure {
            query: query.to_string(),
            error: error.into(),
        })
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// One or two sentences for the model to read back to the user
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Weather(report) => {
                let current = &report.current;
                let today = &report.today;
                let mut text = format!(
                    "Weather for {}: {}, {} with wind at {}. Today: high {}{}, low {}{}",
                    report.location.name,
                    current.conditions.to_lowercase(),
                    current.format_temperature(),
                    current.format_wind(),
                    today.high,
                    current.temperature_unit,
                    today.low,
                    current.temperature_unit,
                );
                if let Some(probability) = today.precipitation_probability {
                    text.push_str(&format!(
                        ", {probability}{} chance of precipitation",
                        today.precipitation_unit
                    ));
                }
                text.push('.');
                text
            }
            Self::Error(failure) => failure.error.clone(),
        }
    }
}
