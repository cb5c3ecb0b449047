//! Outbound HTTP plumbing shared by every upstream client.
//!
//! One call, no retries: a non-success status or a network error becomes
//! [`AppsError::Upstream`] carrying the status code when there was one.

use crate::config::HttpConfig;
use crate::{AppsError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Build the pooled client shared by all tools
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());

    if let Some(seconds) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds.into()));
    }

    builder
        .build()
        .map_err(|e| AppsError::config(format!("Failed to create HTTP client: {e}")))
}

/// Join a configured base URL and a path without doubling slashes
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// GET `url` and decode the JSON body
#[instrument(skip(client))]
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: &str,
) -> Result<T> {
    let started = Instant::now();
    debug!("Sending request");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| network_error(service, &e))?;

    decode(service, response, started).await
}

/// POST an urlencoded form to `url` and decode the JSON body
#[instrument(skip(client, form))]
pub async fn post_form_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: &str,
    form: &[(&str, &str)],
) -> Result<T> {
    let started = Instant::now();
    debug!("Sending form request");

    let response = client
        .post(url)
        .form(form)
        .send()
        .await
        .map_err(|e| network_error(service, &e))?;

    decode(service, response, started).await
}

async fn decode<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
    started: Instant,
) -> Result<T> {
    let status = response.status();
    let elapsed = started.elapsed();

    if elapsed > SLOW_RESPONSE {
        warn!(
            "Slow {} response detected: {:.3}s",
            service,
            elapsed.as_secs_f64()
        );
    }

    if !status.is_success() {
        warn!("{} answered HTTP {}", service, status.as_u16());
        return Err(AppsError::upstream(
            service,
            Some(status.as_u16()),
            status.canonical_reason().unwrap_or("Unknown error"),
        ));
    }

    let body = response.json::<T>().await.map_err(|e| {
        AppsError::upstream(service, None, format!("invalid response body: {e}"))
    })?;

    info!(
        "{} request succeeded in {:.3}s",
        service,
        elapsed.as_secs_f64()
    );
    Ok(body)
}

fn network_error(service: &'static str, error: &reqwest::Error) -> AppsError {
    warn!("Network error calling {}: {}", service, error);
    AppsError::upstream(service, error.status().map(|s| s.as_u16()), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::{Value, json};

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("https://api.open-meteo.com/", "/v1/forecast"),
            "https://api.open-meteo.com/v1/forecast"
        );
        assert_eq!(endpoint("http://127.0.0.1:9", "search"), "http://127.0.0.1:9/search");
    }

    #[test]
    fn test_build_client_with_timeout() {
        let config = HttpConfig {
            user_agent: "mcp-apps-test".to_string(),
            timeout_seconds: Some(5),
        };
        assert!(build_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_get_json_reports_status_code() {
        let router = Router::new()
            .route("/ok", get(|| async { Json(json!({"hello": "world"})) }))
            .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = test_support::serve(router).await;
        let client = build_client(&HttpConfig::default()).unwrap();

        let body: Value = get_json(&client, "Fixture", &endpoint(&base, "ok"))
            .await
            .unwrap();
        assert_eq!(body["hello"], "world");

        let err = get_json::<Value>(&client, "Fixture", &endpoint(&base, "down"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.user_message().contains("503"));
    }

    #[tokio::test]
    async fn test_get_json_rejects_malformed_body() {
        let router = Router::new().route("/text", get(|| async { "not json" }));
        let base = test_support::serve(router).await;
        let client = build_client(&HttpConfig::default()).unwrap();

        let err = get_json::<Value>(&client, "Fixture", &endpoint(&base, "text"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppsError::Upstream { status: None, .. }));
    }
}
