use crate::{
    Config, ForecastSample, Query, WeatherSnapshot, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

pub mod openweather;

/// Why a provider call failed.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status { endpoint: &'static str, status: StatusCode, body: String },

    #[error("failed to send {endpoint} request")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response contained an invalid timestamp: {ts}")]
    Timestamp { endpoint: &'static str, ts: i64 },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for the queried place.
    async fn current(&self, query: &Query) -> Result<WeatherSnapshot, ProviderError>;

    /// Every forecast sample the provider returns for the queried place.
    async fn forecast(&self, query: &Query) -> Result<Vec<ForecastSample>, ProviderError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Box::new(OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        config.provider.base_url.clone(),
    )))
}
