//! Core library for the `weatherdash` terminal dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather provider and the location lookup
//! - Daily aggregation of forecast samples
//! - The query state machine and the orchestrator that drives it
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod locate;
pub mod model;
pub mod provider;
pub mod state;

pub use aggregate::{aggregate_daily, aggregate_daily_in};
pub use config::{Config, LocatorConfig, ProviderConfig};
pub use dashboard::Dashboard;
pub use locate::{FixedLocator, IpLocator, LocateError, Locator, NoLocator};
pub use model::{Coordinates, DailyAverage, ForecastSample, Query, WeatherSnapshot};
pub use provider::{ProviderError, WeatherProvider};
pub use state::{QueryState, Report, View};
