//! Plain-text formatting for hourly, current and summary views
//!
//! Every value is rendered as `imperial (metric)`. Missing readings render as
//! `-`, and so do zero precipitation and snowfall.

use chrono::NaiveDateTime;

use crate::daily::Measurement;
use crate::models::{CompassPoint, WeatherCode};
use crate::units::{
    fahrenheit_to_celsius, feet_to_meters, inches_to_cm, inches_to_mm, meters_to_km,
    meters_to_miles, mph_to_kph, round_to,
};

pub use crate::units::inches_to_metric;

const MISSING: &str = "-";
const DEFAULT_ICON: &str = "🌤️";

fn dual(imperial: String, metric: String) -> String {
    Measurement { imperial, metric }.to_string()
}

/// Icon for a weather code; unknown or missing codes get a generic one
#[must_use]
pub fn weather_icon(code: Option<WeatherCode>, is_day: bool) -> &'static str {
    code.map_or(DEFAULT_ICON, |c| c.icon(is_day))
}

#[must_use]
pub fn format_temperature(fahrenheit: Option<f64>) -> String {
    let Some(f) = fahrenheit else {
        return MISSING.to_string();
    };
    dual(
        format!("{f}°F"),
        format!("{}°C", round_to(fahrenheit_to_celsius(f), 1)),
    )
}

/// Direction and speed, plus gusts when they exceed the sustained speed
#[must_use]
pub fn format_wind(speed: Option<f64>, direction: CompassPoint, gust: Option<f64>) -> String {
    let Some(speed) = speed else {
        return MISSING.to_string();
    };

    let mut result = format!(
        "{direction} {}",
        dual(
            format!("{speed} mph"),
            format!("{} kph", round_to(mph_to_kph(speed), 1))
        )
    );

    if let Some(gust) = gust.filter(|&g| g > speed) {
        result.push_str(&format!(
            ", gusts {}",
            dual(
                format!("{gust} mph"),
                format!("{} kph", round_to(mph_to_kph(gust), 1))
            )
        ));
    }
    result
}

/// Whole feet and meters with thousands separators
#[must_use]
pub fn format_elevation(feet: Option<f64>) -> String {
    let Some(feet) = feet else {
        return MISSING.to_string();
    };
    dual(
        format!("{} ft", with_separators(feet.trunc() as i64)),
        format!("{} m", with_separators(feet_to_meters(feet).round() as i64)),
    )
}

#[must_use]
pub fn format_visibility(meters: Option<f64>) -> String {
    let Some(meters) = meters else {
        return MISSING.to_string();
    };
    dual(
        format!("{} mi", round_to(meters_to_miles(meters), 1)),
        format!("{} km", round_to(meters_to_km(meters), 1)),
    )
}

#[must_use]
pub fn format_precipitation(inches: Option<f64>) -> String {
    match inches {
        Some(inches) if inches != 0.0 => dual(
            format!("{inches}\""),
            format!("{} mm", round_to(inches_to_mm(inches), 1)),
        ),
        _ => MISSING.to_string(),
    }
}

#[must_use]
pub fn format_snowfall(inches: Option<f64>) -> String {
    match inches {
        Some(inches) if inches != 0.0 => dual(
            format!("{inches}\""),
            format!("{} cm", round_to(inches_to_cm(inches), 1)),
        ),
        _ => MISSING.to_string(),
    }
}

/// Snow total with one decimal, e.g. `12.3" (31.34 cm)`
#[must_use]
pub fn format_snow_total(inches: f64) -> String {
    if inches == 0.0 {
        return dual("0\"".to_string(), "0 cm".to_string());
    }
    dual(format!("{}\"", round_to(inches, 1)), inches_to_metric(inches))
}

/// Snow total spelled out, e.g. `12.3 inches (31.34 cm)`
#[must_use]
pub fn format_snow_total_plain(inches: f64) -> String {
    if inches == 0.0 {
        return "0 inches".to_string();
    }
    format!(
        "{} inches ({})",
        round_to(inches, 1),
        inches_to_metric(inches)
    )
}

/// 12-hour clock without a leading zero, e.g. `3 PM`
#[must_use]
pub fn format_hour(time: NaiveDateTime) -> String {
    time.format("%-I %p").to_string()
}

fn with_separators(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
