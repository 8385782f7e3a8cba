//! Ski day scoring
//!
//! Every day starts at 50 and is adjusted for fresh snow, wind, temperature
//! and snow falling during the day, then clamped to 0..=100. Reasons are
//! emitted in that same order.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::daily::valid_forecasts;
use crate::models::Forecast;

const BASE_SCORE: i32 = 50;
/// Temperature assumed when the day has no low bound
const DEFAULT_LOW_TEMP_F: f64 = 32.0;
/// Horizon searched for the single best day
pub const BEST_DAY_HORIZON: usize = 16;

/// Rating bucket for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rating {
    Epic,
    Great,
    Good,
    Fair,
    Poor,
}

impl Rating {
    /// 85..=100 Epic, 70..=84 Great, 55..=69 Good, 40..=54 Fair, anything else Poor
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=100 => Rating::Epic,
            70..=84 => Rating::Great,
            55..=69 => Rating::Good,
            40..=54 => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Epic => "Epic",
            Rating::Great => "Great",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored resort-day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDay {
    pub date: NaiveDate,
    /// Day label; the cross-resort join key
    pub name: String,
    pub score: u8,
    pub rating: Rating,
    pub reasons: Vec<String>,
    /// Inches
    pub snow: f64,
}

/// Score a single day and explain the adjustments.
#[must_use]
pub fn score_forecast(forecast: &Forecast) -> (u8, Vec<String>) {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    let snow = forecast.snow_inches();
    if snow >= 6.0 {
        score += 40;
        reasons.push(format!("Deep powder day! ({:.1}\")", snow));
    } else if snow >= 3.0 {
        score += 30;
        reasons.push(format!("Great fresh snow ({:.1}\")", snow));
    } else if snow >= 1.0 {
        score += 20;
        reasons.push(format!("Fresh snow ({:.1}\")", snow));
    } else if snow > 0.0 {
        score += 10;
        reasons.push("Light dusting".to_string());
    }

    let max_wind = forecast.wind_speed.hi.unwrap_or(0.0);
    if max_wind > 40.0 {
        score -= 25;
        reasons.push("High winds likely".to_string());
    } else if max_wind > 25.0 {
        score -= 15;
        reasons.push("Windy conditions".to_string());
    } else if max_wind > 15.0 {
        score -= 5;
    } else if max_wind < 10.0 {
        score += 5;
        reasons.push("Calm winds".to_string());
    }

    let min_temp = forecast.temp.lo.unwrap_or(DEFAULT_LOW_TEMP_F);
    if min_temp < 0.0 {
        score -= 10;
        reasons.push("Extremely cold".to_string());
    } else if min_temp < 10.0 {
        score -= 5;
        reasons.push("Very cold".to_string());
    } else if (20.0..=32.0).contains(&min_temp) {
        score += 10;
        reasons.push("Ideal temps".to_string());
    } else if min_temp > 40.0 {
        score -= 5;
        reasons.push("Warm (possible slush)".to_string());
    }

    let precip_prob = forecast.precipitation_probability.unwrap_or(0);
    if snow > 0.0 && precip_prob > 70 {
        score += 5;
        reasons.push("Snowing during the day".to_string());
    }

    (score.clamp(0, 100) as u8, reasons)
}

/// Score the displayable days in forecast order, keeping the first `limit`.
#[must_use]
pub fn best_ski_days(forecasts: &[Forecast], limit: usize) -> Vec<ScoredDay> {
    valid_forecasts(forecasts)
        .into_iter()
        .filter_map(|day| {
            let forecast = day.raw();
            let date = forecast.date?;
            let (score, reasons) = score_forecast(forecast);
            Some(ScoredDay {
                date,
                name: forecast.name.clone(),
                score,
                rating: Rating::from_score(score),
                reasons,
                snow: forecast.snow_inches(),
            })
        })
        .take(limit)
        .collect()
}

/// Highest scoring day within the horizon; the earliest one wins a tie.
#[must_use]
pub fn best_day(forecasts: &[Forecast]) -> Option<ScoredDay> {
    best_ski_days(forecasts, BEST_DAY_HORIZON)
        .into_iter()
        .reduce(|best, day| if day.score > best.score { day } else { best })
}
