//! Finding the device's current coordinates.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;

use crate::{Config, model::Coordinates};

#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("location lookup is not available")]
    Unavailable,

    #[error("failed to reach location service")]
    Request(#[from] reqwest::Error),

    #[error("location service answered with status {0}")]
    Status(StatusCode),

    #[error("location service refused the lookup: {0}")]
    Denied(String),
}

#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocateError>;
}

/// Looks up coordinates from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    http: Client,
}

impl IpLocator {
    pub fn new(url: String) -> Self {
        Self { url, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Locator for IpLocator {
    async fn locate(&self) -> Result<Coordinates, LocateError> {
        tracing::debug!(url = %self.url, "looking up location");

        let res = self.http.get(&self.url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(LocateError::Status(status));
        }

        let body: IpLookupResponse = res.json().await?;
        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocateError::Denied(
                body.message.unwrap_or_else(|| format!("status {}", body.status)),
            )),
        }
    }
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocateError> {
        Ok(self.0)
    }
}

/// Used when location lookup is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocator;

#[async_trait]
impl Locator for NoLocator {
    async fn locate(&self) -> Result<Coordinates, LocateError> {
        Err(LocateError::Unavailable)
    }
}

/// Construct the locator described by config.
pub fn locator_from_config(config: &Config) -> Box<dyn Locator> {
    if config.locator.enabled {
        Box::new(IpLocator::new(config.locator.url.clone()))
    } else {
        Box::new(NoLocator)
    }
}
