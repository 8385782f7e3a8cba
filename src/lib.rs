//! Snowline - ski resort snow forecasts, ski-day scoring and regional roll-ups
//!
//! This library fetches per-resort forecasts from Open-Meteo, turns them into
//! display-ready daily records, scores each day for skiing and aggregates the
//! results by country and region.

pub mod config;
pub mod daily;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod region;
pub mod scoring;
pub mod units;
pub mod weather;

// Re-export core types for public API
pub use config::SnowlineConfig;
pub use daily::{DailyForecast, Measurement, valid_forecasts};
pub use error::SnowError;
pub use models::{Forecast, ForecastBundle, Resort};
pub use region::{ForecastCache, RegionIndex, ResortFilter};
pub use scoring::{Rating, ScoredDay};
pub use weather::{ForecastProvider, OpenMeteoClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SnowError>;
