//! Overpass API adapter: fast-food amenities around a point

use super::PlaceSource;
use crate::Result;
use crate::geo::distance_meters;
use crate::http::{endpoint, post_form_json};
use crate::models::Place;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

const SERVICE: &str = "Overpass";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<Center>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
    lat: f64,
    lon: f64,
}

impl Element {
    /// Nodes carry their own position; ways only have `center` with `out center`
    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Some((lat, lon)),
            (_, _, Some(center)) => Some((center.lat, center.lon)),
            _ => None,
        }
    }

    fn tag(&self, key: &str) -> Option<String> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn address(&self) -> Option<String> {
        let street = match (self.tag("addr:street"), self.tag("addr:housenumber")) {
            (Some(street), Some(number)) => Some(format!("{street} {number}")),
            (street, _) => street,
        };
        let parts: Vec<String> = [street, self.tag("addr:city")].into_iter().flatten().collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Build the Overpass QL query for fast-food nodes and ways within `radius`
#[must_use]
pub fn build_query(latitude: f64, longitude: f64, radius_meters: u32, limit: usize) -> String {
    let around = format!("around:{radius_meters},{latitude},{longitude}");
    format!(
        "[out:json][timeout:25];\
         (node[\"amenity\"=\"fast_food\"]({around});\
         way[\"amenity\"=\"fast_food\"]({around}););\
         out center {limit};"
    )
}

/// Keep named elements with a position and measure them from `center`
fn places_from_elements(elements: Vec<Element>, center: (f64, f64)) -> Vec<Place> {
    elements
        .into_iter()
        .filter_map(|element| {
            let name = element.tag("name")?;
            let (latitude, longitude) = element.coordinates()?;
            Some(Place {
                name,
                latitude,
                longitude,
                cuisine: element.tag("cuisine"),
                brand: element.tag("brand"),
                address: element.address(),
                opening_hours: element.tag("opening_hours"),
                distance_meters: distance_meters(center, (latitude, longitude)),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    base_url: String,
}

impl OverpassClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PlaceSource for OverpassClient {
    #[instrument(skip(self))]
    async fn fast_food_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
        max_results: usize,
    ) -> Result<Vec<Place>> {
        let query = build_query(latitude, longitude, radius_meters, max_results);
        debug!("Overpass query: {}", query);

        let response: OverpassResponse = post_form_json(
            &self.client,
            SERVICE,
            &endpoint(&self.base_url, "api/interpreter"),
            &[("data", query.as_str())],
        )
        .await?;

        let total = response.elements.len();
        let places = places_from_elements(response.elements, (latitude, longitude));
        info!("Overpass returned {} elements, {} usable", total, places.len());
        Ok(places)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use axum::{Form, Json, Router, routing::post};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    pub fn router() -> Router {
        Router::new().route("/api/interpreter", post(interpreter))
    }

    async fn interpreter(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
        let query = form.get("data").cloned().unwrap_or_default();
        if !query.contains("\"amenity\"=\"fast_food\"") {
            return Json(json!({"elements": []}));
        }
        Json(json!({
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 52.5200, "lon": 13.4100,
                 "tags": {"amenity": "fast_food", "name": "Far Falafel", "cuisine": "falafel"}},
                {"type": "node", "id": 2, "lat": 52.5171, "lon": 13.3889,
                 "tags": {"amenity": "fast_food", "name": "Curry 36", "cuisine": "sausage",
                          "addr:street": "Mehringdamm", "addr:housenumber": "36"}},
                {"type": "node", "id": 3, "lat": 52.5172, "lon": 13.3890,
                 "tags": {"amenity": "fast_food"}},
                {"type": "way", "id": 4, "center": {"lat": 52.5180, "lon": 13.3900},
                 "tags": {"amenity": "fast_food", "name": "Burger Bar", "brand": "Burger Bar",
                          "opening_hours": "Mo-Su 11:00-23:00"}}
            ]
        }))
    }
}
