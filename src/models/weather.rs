//! Value types shared by the daily, hourly and current forecast records

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `lo..hi` span of a forecast quantity where either bound may be missing.
///
/// When both bounds are present `lo <= hi` holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    pub lo: Option<f64>,
    pub hi: Option<f64>,
}

impl ValueRange {
    /// Build a range, swapping the bounds if they arrive out of order.
    #[must_use]
    pub fn new(lo: Option<f64>, hi: Option<f64>) -> Self {
        match (lo, hi) {
            (Some(a), Some(b)) if a > b => Self {
                lo: Some(b),
                hi: Some(a),
            },
            _ => Self { lo, hi },
        }
    }

    /// The `0..hi` shape used for accumulations and wind maxima.
    /// Negative values are clamped to zero so the invariant holds.
    #[must_use]
    pub fn zero_to(hi: f64) -> Self {
        Self {
            lo: Some(0.0),
            hi: Some(hi.max(0.0)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }
}

/// 16-point compass bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompassPoint {
    #[default]
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    /// Map a bearing in degrees onto the compass.
    ///
    /// Each point owns a 22.5° sector centred on it; a bearing sitting exactly
    /// on a sector edge belongs to the counter-clockwise neighbour, except that
    /// 348.75° already counts as north. Missing or non-finite bearings are north.
    #[must_use]
    pub fn from_degrees(degrees: Option<f64>) -> Self {
        let Some(degrees) = degrees.filter(|d| d.is_finite()) else {
            return CompassPoint::N;
        };

        let normalized = degrees.rem_euclid(360.0);
        if normalized >= 348.75 {
            return CompassPoint::N;
        }

        let sector = ((normalized - 11.25) / 22.5).ceil().max(0.0) as usize;
        Self::ALL[sector % Self::ALL.len()]
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WMO weather interpretation code as reported by Open-Meteo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherCode(pub u8);

impl WeatherCode {
    /// Human-readable description; unknown codes map to an empty string.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Drizzle: Light intensity",
            53 => "Drizzle: Moderate intensity",
            55 => "Drizzle: Dense intensity",
            56 => "Freezing Drizzle: Light intensity",
            57 => "Freezing Drizzle: Dense intensity",
            61 => "Rain: Slight intensity",
            63 => "Rain: Moderate intensity",
            65 => "Rain: Heavy intensity",
            66 => "Freezing Rain: Light intensity",
            67 => "Freezing Rain: Heavy intensity",
            71 => "Snow fall: Slight intensity",
            73 => "Snow fall: Moderate intensity",
            75 => "Snow fall: Heavy intensity",
            77 => "Snow grains",
            80 => "Rain showers: Slight intensity",
            81 => "Rain showers: Moderate intensity",
            82 => "Rain showers: Violent intensity",
            85 => "Snow showers: Slight intensity",
            86 => "Snow showers: Heavy intensity",
            95 => "Thunderstorm: Slight or moderate",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "",
        }
    }

    /// Emoji for hourly and current-condition views
    #[must_use]
    pub fn icon(self, is_day: bool) -> &'static str {
        match self.0 {
            0 if is_day => "☀️",
            0 => "🌙",
            1 | 2 if is_day => "⛅",
            1 | 2 | 3 => "☁️",
            45 | 48 => "🌫️",
            51 | 53 | 55 | 56 | 57 | 61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => "🌧️",
            71 | 73 | 75 | 77 | 85 | 86 => "❄️",
            95 | 96 | 99 => "⛈️",
            _ => "🌤️",
        }
    }

    /// True for the snow fall, snow grain and snow shower codes
    #[must_use]
    pub fn is_snow(self) -> bool {
        matches!(self.0, 71 | 73 | 75 | 77 | 85 | 86)
    }
}

/// Description for an optional code, empty when the provider sent nothing
#[must_use]
pub fn describe(code: Option<WeatherCode>) -> String {
    code.map(WeatherCode::description)
        .unwrap_or_default()
        .to_string()
}
