//! Data models for the `mcp-apps` tools
//!
//! This module contains the payloads each tool returns, organized by concern:
//! - Location: resolved place names and coordinates
//! - Weather: forecast snapshot and the weather tool result
//! - Age: age prediction result
//! - Places: fast-food search result

pub mod age;
pub mod location;
pub mod places;
pub mod weather;

// Re-export all public types for convenient access
pub use age::{AgeFailure, AgePrediction, AgeResult};
pub use location::Location;
pub use places::{Place, PlacesFailure, PlacesReport, PlacesResult};
pub use weather::{
    CurrentConditions, DailyForecast, ForecastSnapshot, ObservedConditions, WeatherFailure,
    WeatherReport, WeatherResult,
};
