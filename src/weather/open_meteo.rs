//! Open-Meteo response structures and conversion into forecast records
//!
//! Every section of the response is columnar: a `time` array plus one array
//! per requested field, where index `i` of each field belongs to `time[i]`.
//! Entries may be `null` and a field the provider omitted entirely parses as
//! an empty column, so every lookup goes through [`at`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::weather::describe;
use crate::models::{
    CompassPoint, CurrentConditions, Forecast, ForecastBundle, HourlyForecast, ValueRange,
    WeatherCode,
};
use crate::units::round_to;

pub const HOURLY_PARAMS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "precipitation_probability",
    "precipitation",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "freezing_level_height",
    "visibility",
    "is_day",
];

pub const DAILY_PARAMS: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "sunrise",
    "sunset",
    "snowfall_sum",
    "precipitation_sum",
    "rain_sum",
    "precipitation_hours",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
    "uv_index_max",
    "sunshine_duration",
];

pub const CURRENT_PARAMS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "precipitation",
    "weather_code",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

type Column = Vec<Option<f64>>;

/// Forecast response from the `/v1/forecast` endpoint
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentData>,
    pub hourly: Option<HourlyData>,
    pub daily: Option<DailyData>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DailyData {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Column,
    #[serde(default)]
    pub temperature_2m_max: Column,
    #[serde(default)]
    pub temperature_2m_min: Column,
    #[serde(default)]
    pub apparent_temperature_max: Column,
    #[serde(default)]
    pub apparent_temperature_min: Column,
    #[serde(default)]
    pub snowfall_sum: Column,
    #[serde(default)]
    pub precipitation_sum: Column,
    #[serde(default)]
    pub rain_sum: Column,
    #[serde(default)]
    pub precipitation_probability_max: Column,
    #[serde(default)]
    pub wind_speed_10m_max: Column,
    #[serde(default)]
    pub wind_gusts_10m_max: Column,
    #[serde(default)]
    pub wind_direction_10m_dominant: Column,
    #[serde(default)]
    pub uv_index_max: Column,
    #[serde(default)]
    pub sunshine_duration: Column,
}

#[derive(Debug, Deserialize, Default)]
pub struct HourlyData {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Column,
    #[serde(default)]
    pub relative_humidity_2m: Column,
    #[serde(default)]
    pub apparent_temperature: Column,
    #[serde(default)]
    pub precipitation_probability: Column,
    #[serde(default)]
    pub precipitation: Column,
    #[serde(default)]
    pub snowfall: Column,
    #[serde(default)]
    pub weather_code: Column,
    #[serde(default)]
    pub cloud_cover: Column,
    #[serde(default)]
    pub wind_speed_10m: Column,
    #[serde(default)]
    pub wind_direction_10m: Column,
    #[serde(default)]
    pub wind_gusts_10m: Column,
    #[serde(default)]
    pub freezing_level_height: Column,
    #[serde(default)]
    pub visibility: Column,
    #[serde(default)]
    pub is_day: Column,
}

#[derive(Debug, Deserialize, Default)]
pub struct CurrentData {
    pub time: Option<String>,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub is_day: Option<f64>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
    pub wind_gusts_10m: Option<f64>,
}

fn at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

fn rounded(value: Option<f64>, places: i32) -> Option<f64> {
    value.map(|v| round_to(v, places))
}

/// Integer coercion for percentages: absent becomes 0, out-of-range clamps.
fn percent(value: Option<f64>) -> u8 {
    value.unwrap_or(0.0).clamp(0.0, 100.0) as u8
}

fn weather_code(value: Option<f64>) -> Option<WeatherCode> {
    value
        .filter(|v| (0.0..=f64::from(u8::MAX)).contains(v))
        .map(|v| WeatherCode(v as u8))
}

fn is_day(value: Option<f64>) -> bool {
    value == Some(1.0)
}

impl ForecastResponse {
    /// Convert the whole response into forecast records
    #[must_use]
    pub fn into_bundle(self) -> ForecastBundle {
        ForecastBundle {
            daily: self.daily.as_ref().map(parse_daily).unwrap_or_default(),
            hourly: self.hourly.as_ref().map(parse_hourly).unwrap_or_default(),
            current: self.current.as_ref().and_then(parse_current),
        }
    }
}

/// One [`Forecast`] per entry of `daily.time`.
#[must_use]
pub fn parse_daily(daily: &DailyData) -> Vec<Forecast> {
    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, timestamp)| {
            let date = NaiveDate::parse_from_str(timestamp, DATE_FORMAT).ok();
            if date.is_none() {
                debug!("Unparseable daily timestamp '{}'", timestamp);
            }
            let name = date.map_or_else(|| timestamp.clone(), Forecast::label_for);

            let snow = at(&daily.snowfall_sum, i).map_or(0.0, |v| round_to(v, 2));
            let wind_gust = at(&daily.wind_gusts_10m_max, i).map_or(0.0, |v| round_to(v, 2));
            let wind_speed = at(&daily.wind_speed_10m_max, i).map_or(0.0, |v| round_to(v, 2));

            Forecast {
                name,
                short: describe(weather_code(at(&daily.weather_code, i))),
                snow: ValueRange::zero_to(snow),
                temp: ValueRange::new(
                    rounded(at(&daily.temperature_2m_min, i), 2),
                    rounded(at(&daily.temperature_2m_max, i), 2),
                ),
                apparent_temp: ValueRange::new(
                    rounded(at(&daily.apparent_temperature_min, i), 2),
                    rounded(at(&daily.apparent_temperature_max, i), 2),
                ),
                date,
                wind_direction: CompassPoint::from_degrees(at(
                    &daily.wind_direction_10m_dominant,
                    i,
                )),
                wind_gust: ValueRange::zero_to(wind_gust),
                wind_speed: ValueRange::zero_to(wind_speed),
                uv_index: rounded(at(&daily.uv_index_max, i), 1),
                sunshine_duration: Some(at(&daily.sunshine_duration, i).unwrap_or(0.0).max(0.0)
                    as u32),
                precipitation_probability: Some(percent(at(
                    &daily.precipitation_probability_max,
                    i,
                ))),
                precipitation: round_to(at(&daily.precipitation_sum, i).unwrap_or(0.0), 2),
                rain: round_to(at(&daily.rain_sum, i).unwrap_or(0.0), 2),
            }
        })
        .collect()
}

/// One [`HourlyForecast`] per parseable entry of `hourly.time`.
#[must_use]
pub fn parse_hourly(hourly: &HourlyData) -> Vec<HourlyForecast> {
    hourly
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, timestamp)| {
            let Ok(time) = NaiveDateTime::parse_from_str(timestamp, TIME_FORMAT) else {
                debug!("Skipping hour with unparseable timestamp '{}'", timestamp);
                return None;
            };
            let code = weather_code(at(&hourly.weather_code, i));

            Some(HourlyForecast {
                time,
                temperature: rounded(at(&hourly.temperature_2m, i), 1),
                apparent_temperature: rounded(at(&hourly.apparent_temperature, i), 1),
                humidity: percent(at(&hourly.relative_humidity_2m, i)),
                precipitation_probability: percent(at(&hourly.precipitation_probability, i)),
                precipitation: rounded(at(&hourly.precipitation, i), 2),
                snowfall: rounded(at(&hourly.snowfall, i), 2),
                weather_code: code,
                weather_description: describe(code),
                cloud_cover: percent(at(&hourly.cloud_cover, i)),
                wind_speed: rounded(at(&hourly.wind_speed_10m, i), 1),
                wind_direction: CompassPoint::from_degrees(at(&hourly.wind_direction_10m, i)),
                wind_gust: rounded(at(&hourly.wind_gusts_10m, i), 1),
                freezing_level: rounded(at(&hourly.freezing_level_height, i), 0),
                visibility: rounded(at(&hourly.visibility, i), 0),
                is_day: is_day(at(&hourly.is_day, i)),
            })
        })
        .collect()
}

/// Current conditions, or `None` when the snapshot carries no usable time.
#[must_use]
pub fn parse_current(current: &CurrentData) -> Option<CurrentConditions> {
    let raw_time = current.time.as_deref()?;
    let time = match NaiveDateTime::parse_from_str(raw_time, TIME_FORMAT) {
        Ok(time) => time,
        Err(e) => {
            warn!("Dropping current conditions with bad time '{}': {}", raw_time, e);
            return None;
        }
    };
    let code = weather_code(current.weather_code);

    Some(CurrentConditions {
        temperature: rounded(current.temperature_2m, 1),
        apparent_temperature: rounded(current.apparent_temperature, 1),
        humidity: percent(current.relative_humidity_2m),
        weather_code: code,
        weather_description: describe(code),
        cloud_cover: percent(current.cloud_cover),
        wind_speed: rounded(current.wind_speed_10m, 1),
        wind_direction: CompassPoint::from_degrees(current.wind_direction_10m),
        wind_gust: rounded(current.wind_gusts_10m, 1),
        precipitation: rounded(current.precipitation, 2),
        is_day: is_day(current.is_day),
        time,
    })
}
