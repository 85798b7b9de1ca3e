use chrono::{DateTime, Utc};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// How a place is identified when talking to the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl Query {
    /// Location part of the provider query string.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::City(city) => vec![("q", city.clone())],
            Query::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }
}

/// Current conditions for a place.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
    pub observation_time: DateTime<Utc>,
}

/// One raw forecast data point.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
}

/// Averages over every forecast sample sharing a day label.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAverage {
    /// Short weekday name, e.g. "Mon".
    pub day: String,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub samples: usize,
}
