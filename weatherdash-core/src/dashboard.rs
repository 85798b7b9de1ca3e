//! Runs weather queries and keeps the query state consistent.

use parking_lot::Mutex;

use crate::{
    aggregate::aggregate_daily,
    locate::Locator,
    model::{Coordinates, Query},
    provider::{ProviderError, WeatherProvider},
    state::{QueryKind, QueryState, Report, RequestId},
};

pub const CITY_NOT_FOUND: &str = "City not found";
pub const LOCATION_NOT_FOUND: &str = "Location not found";
pub const LOCATION_UNAVAILABLE: &str =
    "Unable to determine your location. Search for a city instead.";

/// Owns the provider and the state the UI renders from.
///
/// The state lock is only taken between awaits, so overlapping queries can
/// run from the same `Dashboard`; the most recently issued one wins.
#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    state: Mutex<QueryState>,
}

impl Dashboard {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, state: Mutex::new(QueryState::new()) }
    }

    /// Copy of the current state.
    pub fn state(&self) -> QueryState {
        self.state.lock().clone()
    }

    /// Edit the search box text without fetching.
    pub fn set_city(&self, city: &str) {
        self.state.lock().set_city(city);
    }

    /// Fetch conditions and forecast for a city name.
    ///
    /// Blank input leaves the state untouched.
    pub async fn query_by_name(&self, city: &str) -> QueryState {
        let city = city.trim();
        if city.is_empty() {
            return self.state();
        }

        let id = {
            let mut state = self.state.lock();
            state.set_city(city);
            state.begin(QueryKind::ByName)
        };

        self.run(id, Query::City(city.to_string()), CITY_NOT_FOUND).await
    }

    /// Fetch conditions and forecast for a coordinate pair.
    ///
    /// On success the search box shows the place name the provider reported.
    pub async fn query_by_coordinates(&self, lat: f64, lon: f64) -> QueryState {
        let id = self.state.lock().begin(QueryKind::ByCoordinates);
        self.run(id, Query::Coordinates(Coordinates::new(lat, lon)), LOCATION_NOT_FOUND).await
    }

    /// Locate the device and query its coordinates. Runs once per dashboard.
    pub async fn bootstrap(&self, locator: &dyn Locator) -> QueryState {
        let id = {
            let mut state = self.state.lock();
            if !state.claim_bootstrap() {
                tracing::debug!("location bootstrap already ran");
                return state.clone();
            }
            state.begin(QueryKind::Locating)
        };

        match locator.locate().await {
            Ok(coords) => {
                // check and begin under one lock so a manual query cannot slip in between
                let id = {
                    let mut state = self.state.lock();
                    if !state.is_current(id) {
                        tracing::debug!("newer query started while locating; skipping");
                        return state.clone();
                    }
                    state.begin(QueryKind::ByCoordinates)
                };
                tracing::info!(lat = coords.lat, lon = coords.lon, "location found");
                self.run(id, Query::Coordinates(coords), LOCATION_NOT_FOUND).await
            }
            Err(err) => {
                tracing::warn!(error = ?err, "location lookup failed");
                let mut state = self.state.lock();
                state.finish(id, Err(LOCATION_UNAVAILABLE.to_string()));
                state.clone()
            }
        }
    }

    async fn run(&self, id: RequestId, query: Query, failure: &str) -> QueryState {
        let outcome = self.fetch(&query).await.map_err(|err| {
            tracing::warn!(error = ?err, ?query, "weather query failed");
            failure.to_string()
        });

        let mut state = self.state.lock();
        if state.finish(id, outcome) {
            tracing::info!(?query, city = state.city(), "weather query finished");
        } else {
            tracing::debug!(?query, "dropping result of superseded query");
        }
        state.clone()
    }

    async fn fetch(&self, query: &Query) -> Result<Report, ProviderError> {
        let (snapshot, samples) =
            tokio::try_join!(self.provider.current(query), self.provider.forecast(query))?;

        Ok(Report { snapshot, forecast: aggregate_daily(&samples) })
    }
}
