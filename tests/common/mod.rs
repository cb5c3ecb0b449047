//! Fake upstream APIs and helpers for driving the `mcp-apps` binary

#![allow(dead_code)]

use axum::{Form, Json, Router, extract::Query, routing::get, routing::post};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::net::TcpListener;
use tokio::process::Command;

/// One local host answering for Open-Meteo, Agify, Nominatim and Overpass
pub async fn spawn_upstreams() -> String {
    let router = Router::new()
        .route("/v1/search", get(geocoding))
        .route("/v1/forecast", get(forecast))
        .route("/", get(agify))
        .route("/search", get(nominatim))
        .route("/api/interpreter", post(overpass));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Command for the binary with every upstream pointed at `base_url`
pub fn binary(base_url: &str) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mcp-apps"));
    command
        .arg("--config")
        .arg("/nonexistent/mcp-apps.toml")
        .env("RUST_LOG", "warn")
        .env("MCP_APPS_UPSTREAM__GEOCODING_BASE_URL", base_url)
        .env("MCP_APPS_UPSTREAM__FORECAST_BASE_URL", base_url)
        .env("MCP_APPS_UPSTREAM__AGIFY_BASE_URL", base_url)
        .env("MCP_APPS_UPSTREAM__NOMINATIM_BASE_URL", base_url)
        .env("MCP_APPS_UPSTREAM__OVERPASS_BASE_URL", base_url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

/// A port that was free a moment ago
pub async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

async fn geocoding(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    if name.starts_with("Paris") {
        Json(json!({"results": [{
            "name": "Paris", "latitude": 48.85341, "longitude": 2.3488,
            "country": "France", "admin1": "Île-de-France", "timezone": "Europe/Paris"
        }]}))
    } else {
        Json(json!({}))
    }
}

async fn forecast() -> Json<Value> {
    Json(json!({
        "current_units": {"temperature_2m": "°C", "wind_speed_10m": "km/h"},
        "current": {"time": "2025-06-01T14:00", "temperature_2m": 18.2,
                    "wind_speed_10m": 9.4, "weather_code": 61},
        "daily_units": {"precipitation_probability_max": "%"},
        "daily": {"time": ["2025-06-01"], "temperature_2m_max": [20.1],
                  "temperature_2m_min": [12.3], "precipitation_probability_max": [70]}
    }))
}

async fn agify(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    if name == "Anna" {
        Json(json!({"count": 12_345, "name": name, "age": 38}))
    } else {
        Json(json!({"count": 0, "name": name, "age": null}))
    }
}

async fn nominatim(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("q").map(String::as_str) {
        Some("Berlin Mitte") => Json(json!([{
            "lat": "52.5200", "lon": "13.4050", "display_name": "Mitte, Berlin, Deutschland"
        }])),
        _ => Json(json!([])),
    }
}

async fn overpass(Form(_form): Form<HashMap<String, String>>) -> Json<Value> {
    Json(json!({"elements": [
        {"type": "node", "lat": 52.5230, "lon": 13.4050, "tags": {"name": "Döner Ecke"}},
        {"type": "node", "lat": 52.5201, "lon": 13.4051, "tags": {"name": "Imbiss am Platz"}},
        {"type": "node", "lat": 52.5202, "lon": 13.4052, "tags": {}}
    ]}))
}
