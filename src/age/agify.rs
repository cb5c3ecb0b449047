//! Agify adapter (`GET /?name=`)

use super::{AgePredictor, RawPrediction};
use crate::Result;
use crate::http::get_json;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

const SERVICE: &str = "Agify";

#[derive(Debug, Deserialize)]
struct AgifyResponse {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    name: String,
    age: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AgifyClient {
    client: Client,
    base_url: String,
}

impl AgifyClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, name: &str) -> String {
        format!(
            "{}/?name={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }
}

#[async_trait]
impl AgePredictor for AgifyClient {
    #[instrument(skip(self))]
    async fn predict(&self, name: &str) -> Result<RawPrediction> {
        let response: AgifyResponse = get_json(&self.client, SERVICE, &self.url(name)).await?;
        debug!("Agify answered {:?}", response);
        Ok(RawPrediction {
            name: response.name,
            age: response.age,
            count: response.count,
        })
    }
}
