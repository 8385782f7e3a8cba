//! Data models for snowline
//!
//! - Weather: value ranges, compass bearings and weather codes
//! - Forecast: daily, hourly and current-condition records
//! - Resort: resort identity, location hierarchy and dataset loading

pub mod forecast;
pub mod resort;
pub mod weather;

pub use forecast::{CurrentConditions, Forecast, ForecastBundle, HourlyForecast};
pub use resort::{Coordinates, Resort};
pub use weather::{CompassPoint, ValueRange, WeatherCode};
