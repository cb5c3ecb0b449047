//! Age tool: ask Agify how old people with a given first name usually are

use crate::config::UpstreamConfig;
use crate::models::age::AGE_SOURCE;
use crate::models::{AgePrediction, AgeResult};
use crate::{AppsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub mod agify;

pub use agify::AgifyClient;

/// Raw prediction as the upstream reports it
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub name: String,
    pub age: Option<u32>,
    pub count: u64,
}

#[async_trait]
pub trait AgePredictor: Send + Sync {
    async fn predict(&self, name: &str) -> Result<RawPrediction>;
}

#[derive(Clone)]
pub struct AgeService {
    predictor: Arc<dyn AgePredictor>,
}

impl AgeService {
    #[must_use]
    pub fn new(predictor: Arc<dyn AgePredictor>) -> Self {
        Self { predictor }
    }

    #[must_use]
    pub fn agify(client: Client, upstream: &UpstreamConfig) -> Self {
        Self::new(Arc::new(AgifyClient::new(
            client,
            upstream.agify_base_url.clone(),
        )))
    }

    /// Predict an age for `name`; failures come back as `AgeResult::Error`
    #[instrument(skip(self))]
    pub async fn predict(&self, name: &str) -> AgeResult {
        match self.try_predict(name).await {
            Ok(prediction) => {
                info!("Predicted age {} for '{}'", prediction.age, prediction.name);
                AgeResult::Age(prediction)
            }
            Err(e) => {
                warn!("Age prediction for '{}' failed: {}", name, e);
                AgeResult::failure(name.trim(), e.user_message())
            }
        }
    }

    async fn try_predict(&self, name: &str) -> Result<AgePrediction> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppsError::validation("Name is required."));
        }

        let raw = self.predictor.predict(name).await?;
        let age = raw.age.ok_or_else(|| {
            AppsError::not_found(format!("No age prediction is available for {name}."))
        })?;

        Ok(AgePrediction {
            name: if raw.name.is_empty() {
                name.to_string()
            } else {
                raw.name
            },
            age,
            count: raw.count,
            source: AGE_SOURCE.to_string(),
        })
    }
}
