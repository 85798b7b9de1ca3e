use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::model::{ForecastSample, Query, WeatherSnapshot};

use super::{ProviderError, WeatherProvider};

const CURRENT: &str = "weather";
const FORECAST: &str = "forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `{base_url}/{endpoint}` for `query` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &Query,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = query.params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        tracing::debug!(endpoint, ?query, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ProviderError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ProviderError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &Query) -> Result<WeatherSnapshot, ProviderError> {
        let parsed: OwCurrentResponse = self.get_json(CURRENT, query).await?;

        let observation_time = DateTime::<Utc>::from_timestamp(parsed.dt, 0)
            .ok_or(ProviderError::Timestamp { endpoint: CURRENT, ts: parsed.dt })?;

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            country: parsed.sys.country,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            condition,
            observation_time,
        })
    }

    async fn forecast(&self, query: &Query) -> Result<Vec<ForecastSample>, ProviderError> {
        let parsed: OwForecastResponse = self.get_json(FORECAST, query).await?;

        parsed
            .list
            .into_iter()
            .map(|entry| {
                let timestamp = DateTime::<Utc>::from_timestamp(entry.dt, 0)
                    .ok_or(ProviderError::Timestamp { endpoint: FORECAST, ts: entry.dt })?;
                Ok(ForecastSample {
                    timestamp,
                    temperature_c: entry.main.temp,
                    wind_speed_mps: entry.wind.speed,
                })
            })
            .collect()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
