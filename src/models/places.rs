//! Fast-food search payloads

use super::Location;
use serde::{Deserialize, Serialize};

pub const PLACES_SOURCE: &str = "openstreetmap.org";

/// A named fast-food outlet near the search centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    /// Great-circle distance from the search centre
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacesReport {
    pub query: String,
    pub source: String,
    pub location: Location,
    pub radius_meters: u32,
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesFailure {
    pub query: String,
    pub error: String,
}

/// Structured payload of the fast-food tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PlacesResult {
    #[serde(rename = "fast_food")]
    FastFood(PlacesReport),
    #[serde(rename = "fast_food_error")]
    Error(PlacesFailure),
}

impl PlacesResult {
    #[must_use]
    pub fn failure(query: &str, error: impl Into<String>) -> Self {
        Self::Error(PlacesFailure {
            query: query.to_string(),
            error: error.into(),
        })
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::FastFood(report) if report.places.is_empty() => format!(
                "No fast-food places found within {} m of {}.",
                report.radius_meters, report.location.name
            ),
            Self::FastFood(report) => {
                let nearest = &report.places[0];
                format!(
                    "Found {} fast-food places within {} m of {}. Nearest: {} ({:.0} m away).",
                    report.places.len(),
                    report.radius_meters,
                    report.location.name,
                    nearest.name,
                    nearest.distance_meters
                )
            }
            Self::Error(failure) => failure.error.clone(),
        }
    }
}
