//! Query state - single source of truth for what the dashboard shows

use crate::model::{DailyAverage, WeatherSnapshot};

/// Identifies one query. Only the most recently issued id may update the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RequestId(u64);

impl RequestId {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Which operation issued a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    ByName,
    ByCoordinates,
    Locating,
}

/// Everything fetched by a successful query.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<DailyAverage>,
}

/// Lifecycle of the displayed data: Idle → Loading → Loaded/Failed
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Idle,
    Loading,
    Loaded(Report),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    city: String,
    view: View,
    latest: RequestId,
    pending: Option<(RequestId, QueryKind)>,
    bootstrapped: bool,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the search box.
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, View::Loading)
    }

    pub fn report(&self) -> Option<&Report> {
        match &self.view {
            View::Loaded(report) => Some(report),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.report().map(|r| &r.snapshot)
    }

    pub fn forecast(&self) -> Option<&[DailyAverage]> {
        self.report().map(|r| r.forecast.as_slice())
    }

    pub fn error(&self) -> Option<&str> {
        match &self.view {
            View::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Edit the search box without fetching.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Whether `id` is still the most recently issued request.
    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest == id
    }

    /// Start a query: issue a new id and enter Loading.
    ///
    /// Any request still in flight becomes stale.
    pub fn begin(&mut self, kind: QueryKind) -> RequestId {
        self.latest = self.latest.next();
        self.pending = Some((self.latest, kind));
        self.view = View::Loading;
        self.latest
    }

    /// Mark the one-shot location bootstrap as started.
    ///
    /// Returns `false` if it already ran this session.
    pub fn claim_bootstrap(&mut self) -> bool {
        !std::mem::replace(&mut self.bootstrapped, true)
    }

    /// Apply the outcome of request `id`.
    ///
    /// Returns `false` and leaves the state untouched when a later request
    /// has been issued since.
    pub fn finish(&mut self, id: RequestId, outcome: Result<Report, String>) -> bool {
        let Some((pending, kind)) = self.pending else {
            return false;
        };
        if pending != id || !self.is_current(id) {
            return false;
        }
        self.pending = None;

        self.view = match outcome {
            Ok(report) => {
                if kind == QueryKind::ByCoordinates {
                    self.city = report.snapshot.location_name.clone();
                }
                View::Loaded(report)
            }
            Err(msg) => View::Failed(msg),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn report(name: &str) -> Report {
        Report {
            snapshot: WeatherSnapshot {
                location_name: name.into(),
                country: "GB".into(),
                temperature_c: 11.6,
                humidity_pct: 80,
                wind_speed_mps: 4.2,
                condition: "light rain".into(),
                observation_time: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            },
            forecast: vec![DailyAverage {
                day: "Mon".into(),
                temperature_c: 12.0,
                wind_speed_mps: 3.0,
                samples: 3,
            }],
        }
    }

    #[test]
    fn starts_idle() {
        let state = QueryState::new();

        assert_eq!(state.view(), &View::Idle);
        assert!(!state.is_loading());
        assert!(state.snapshot().is_none());
        assert!(state.error().is_none());
        assert_eq!(state.city(), "");
    }

    #[test]
    fn begin_enters_loading_and_clears_previous_data() {
        let mut state = QueryState::new();
        let id = state.begin(QueryKind::ByName);
        state.finish(id, Ok(report("London")));

        state.begin(QueryKind::ByName);

        assert!(state.is_loading());
        assert!(state.snapshot().is_none());
        assert!(state.forecast().is_none());
    }

    #[test]
    fn success_replaces_error() {
        let mut state = QueryState::new();
        let id = state.begin(QueryKind::ByName);
        state.finish(id, Err("City not found".into()));
        assert_eq!(state.error(), Some("City not found"));

        let id = state.begin(QueryKind::ByName);
        assert!(state.finish(id, Ok(report("London"))));

        assert!(state.error().is_none());
        assert_eq!(state.snapshot().map(|s| s.location_name.as_str()), Some("London"));
        assert_eq!(state.forecast().map(<[_]>::len), Some(1));
    }

    #[test]
    fn failure_clears_data() {
        let mut state = QueryState::new();
        let id = state.begin(QueryKind::ByName);
        state.finish(id, Ok(report("London")));

        let id = state.begin(QueryKind::ByName);
        state.finish(id, Err("City not found".into()));

        assert!(state.report().is_none());
        assert_eq!(state.error(), Some("City not found"));
        assert!(!state.is_loading());
    }

    #[test]
    fn coordinate_success_overwrites_city() {
        let mut state = QueryState::new();
        state.set_city("typed text");

        let id = state.begin(QueryKind::ByCoordinates);
        state.finish(id, Ok(report("Camden Town")));

        assert_eq!(state.city(), "Camden Town");
    }

    #[test]
    fn name_success_keeps_city() {
        let mut state = QueryState::new();
        state.set_city("london");

        let id = state.begin(QueryKind::ByName);
        state.finish(id, Ok(report("London")));

        assert_eq!(state.city(), "london");
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut state = QueryState::new();
        let first = state.begin(QueryKind::ByName);
        let second = state.begin(QueryKind::ByName);

        assert!(!state.finish(first, Ok(report("Paris"))));
        assert!(state.is_loading());

        assert!(state.finish(second, Ok(report("Berlin"))));
        assert_eq!(state.snapshot().map(|s| s.location_name.as_str()), Some("Berlin"));

        // late arrival after the newer one resolved
        assert!(!state.finish(first, Err("City not found".into())));
        assert!(state.error().is_none());
    }

    #[test]
    fn request_cannot_finish_twice() {
        let mut state = QueryState::new();
        let id = state.begin(QueryKind::ByName);

        assert!(state.finish(id, Ok(report("London"))));
        assert!(!state.finish(id, Err("late".into())));
        assert!(state.error().is_none());
    }

    #[test]
    fn bootstrap_can_be_claimed_once() {
        let mut state = QueryState::new();

        assert!(state.claim_bootstrap());
        assert!(!state.claim_bootstrap());
        assert!(state.is_bootstrapped());
    }
}
