//! Normalised forecast records produced by the forecast source

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::weather::{CompassPoint, ValueRange, WeatherCode};

/// One day of forecast for one resort. Imperial units throughout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    /// Day label, e.g. "Tue 03/14"
    pub name: String,
    /// Weather description for the day
    pub short: String,
    /// Snowfall in inches
    pub snow: ValueRange,
    /// Temperature in °F
    pub temp: ValueRange,
    /// Apparent temperature in °F
    pub apparent_temp: ValueRange,
    pub date: Option<NaiveDate>,
    pub wind_direction: CompassPoint,
    /// Wind gusts in mph
    pub wind_gust: ValueRange,
    /// Wind speed in mph
    pub wind_speed: ValueRange,
    pub uv_index: Option<f64>,
    /// Seconds of sunshine
    pub sunshine_duration: Option<u32>,
    /// Maximum precipitation probability, percent
    pub precipitation_probability: Option<u8>,
    /// Inches
    pub precipitation: f64,
    /// Inches
    pub rain: f64,
}

impl Forecast {
    /// The label format days are joined on across resorts
    #[must_use]
    pub fn label_for(date: NaiveDate) -> String {
        date.format("%a %m/%d").to_string()
    }

    /// Snowfall used by scoring and roll-ups: the high bound, 0 when absent.
    #[must_use]
    pub fn snow_inches(&self) -> f64 {
        self.snow.hi.unwrap_or(0.0)
    }
}

/// One hour of forecast for one resort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub humidity: u8,
    pub precipitation_probability: u8,
    pub precipitation: Option<f64>,
    pub snowfall: Option<f64>,
    pub weather_code: Option<WeatherCode>,
    pub weather_description: String,
    pub cloud_cover: u8,
    pub wind_speed: Option<f64>,
    pub wind_direction: CompassPoint,
    pub wind_gust: Option<f64>,
    pub freezing_level: Option<f64>,
    /// Meters
    pub visibility: Option<f64>,
    pub is_day: bool,
}

/// Conditions at the time of the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub humidity: u8,
    pub weather_code: Option<WeatherCode>,
    pub weather_description: String,
    pub cloud_cover: u8,
    pub wind_speed: Option<f64>,
    pub wind_direction: CompassPoint,
    pub wind_gust: Option<f64>,
    pub precipitation: Option<f64>,
    pub is_day: bool,
    pub time: NaiveDateTime,
}

/// Everything one provider call returns for a location
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub daily: Vec<Forecast>,
    pub hourly: Vec<HourlyForecast>,
    pub current: Option<CurrentConditions>,
}
