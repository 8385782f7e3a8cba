//! Display-ready view over daily forecasts
//!
//! [`valid_forecasts`] drops days that cannot be shown: no date, or no
//! temperature at all. A day with only one temperature bound is still shown.
//! Views are computed on every call; nothing is cached here.

use serde::Serialize;
use std::fmt;

use crate::models::Forecast;
use crate::units::{fahrenheit_to_celsius, inches_to_metric, mph_to_kph, round_to};

/// A value rendered in both unit systems
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub imperial: String,
    pub metric: String,
}

impl Measurement {
    fn new(imperial: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            imperial: imperial.into(),
            metric: metric.into(),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.imperial, self.metric)
    }
}

/// Borrowed wrapper that formats one day of forecast
#[derive(Debug, Clone, Copy)]
pub struct DailyForecast<'a> {
    forecast: &'a Forecast,
}

/// Wrap every displayable day, preserving order.
pub fn valid_forecasts(forecasts: &[Forecast]) -> Vec<DailyForecast<'_>> {
    forecasts
        .iter()
        .map(DailyForecast::new)
        .filter(DailyForecast::is_valid)
        .collect()
}

impl<'a> DailyForecast<'a> {
    #[must_use]
    pub fn new(forecast: &'a Forecast) -> Self {
        Self { forecast }
    }

    #[must_use]
    pub fn raw(&self) -> &'a Forecast {
        self.forecast
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.forecast.date.is_some() && !self.forecast.temp.is_empty()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.forecast.name
    }

    #[must_use]
    pub fn short(&self) -> &str {
        &self.forecast.short
    }

    /// Date label, `N/A` without a date
    #[must_use]
    pub fn time_of_day(&self) -> String {
        self.forecast
            .date
            .map_or_else(|| "N/A".to_string(), Forecast::label_for)
    }

    /// A single value when the range starts at zero, `lo-hi` otherwise.
    #[must_use]
    pub fn snow(&self) -> Measurement {
        let lo = self.forecast.snow.lo.unwrap_or(0.0);
        let hi = self.forecast.snow.hi.unwrap_or(0.0);

        if lo == 0.0 {
            if hi == 0.0 {
                Measurement::new("0\"", "0 cm")
            } else {
                Measurement::new(format!("{hi}\""), inches_to_metric(hi))
            }
        } else {
            Measurement::new(
                format!("{lo}-{hi}\""),
                format!("{}-{}", inches_to_metric(lo), inches_to_metric(hi)),
            )
        }
    }

    #[must_use]
    pub fn temp(&self) -> Measurement {
        temperature(self.forecast.temp.hi)
    }

    #[must_use]
    pub fn apparent_temp(&self) -> Measurement {
        temperature(self.forecast.apparent_temp.hi)
    }

    /// Dominant direction plus the day's top wind speed
    #[must_use]
    pub fn wind_speed(&self) -> Measurement {
        let direction = self.forecast.wind_direction;
        let speed = speed(self.forecast.wind_speed.hi);
        Measurement::new(
            format!("{direction} {}", speed.imperial),
            format!("{direction} {}", speed.metric),
        )
    }

    #[must_use]
    pub fn wind_gust(&self) -> Measurement {
        speed(self.forecast.wind_gust.hi)
    }

    #[must_use]
    pub fn uv_index(&self) -> String {
        self.forecast
            .uv_index
            .map_or_else(|| "--".to_string(), |uv| uv.to_string())
    }

    /// `6h 0m`, or just minutes under an hour
    #[must_use]
    pub fn sunshine_duration(&self) -> String {
        let total_seconds = self.forecast.sunshine_duration.unwrap_or(0);
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;

        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }

    #[must_use]
    pub fn precipitation_probability(&self) -> String {
        self.forecast
            .precipitation_probability
            .map_or_else(|| "--%".to_string(), |p| format!("{p}%"))
    }

    #[must_use]
    pub fn short_icon(&self) -> &'static str {
        let short = self.forecast.short.to_lowercase();
        if short.contains("snow") {
            "❄️"
        } else if short.contains("sunny") {
            "☀️"
        } else if short.contains("cloud") {
            "☁️"
        } else {
            "⛅️"
        }
    }
}

fn temperature(fahrenheit: Option<f64>) -> Measurement {
    match fahrenheit {
        Some(f) => Measurement::new(
            format!("{f} °F"),
            format!("{} °C", round_to(fahrenheit_to_celsius(f), 2)),
        ),
        None => Measurement::new("--°F", "--°C"),
    }
}

fn speed(mph: Option<f64>) -> Measurement {
    match mph {
        Some(mph) => Measurement::new(
            format!("{mph} mph"),
            format!("{} kph", round_to(mph_to_kph(mph), 2)),
        ),
        None => Measurement::new("-- mph", "-- kph"),
    }
}
