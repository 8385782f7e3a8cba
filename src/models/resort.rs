//! Resort records and the dataset they are loaded from

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::{Result, SnowError};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid degree ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.validate()?;
        Ok(coordinates)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(SnowError::validation(format!(
                "coordinates out of range: lat={}, lon={}",
                self.latitude, self.longitude
            )));
        }
        Ok(())
    }

    /// Format as a coordinate string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A single ski area. Immutable for the duration of a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resort {
    pub id: u64,
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub country_code: String,
    pub country_name: String,
    pub region_code: String,
    pub region_name: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Feet
    #[serde(default)]
    pub min_elevation: Option<f64>,
    /// Feet
    #[serde(default)]
    pub max_elevation: Option<f64>,
}

impl Resort {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// URL-safe name: lowercase alphanumerics joined by single hyphens
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Load every resort from a JSON array snapshot.
    ///
    /// Records with out-of-range coordinates are rejected here so nothing
    /// downstream has to check them again.
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<Resort>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let resorts = Self::parse_all(&raw)?;
        info!("Loaded {} resorts from {}", resorts.len(), path.display());
        Ok(resorts)
    }

    pub fn parse_all(raw: &str) -> Result<Vec<Resort>> {
        let resorts: Vec<Resort> = serde_json::from_str(raw)
            .map_err(|e| SnowError::dataset(format!("invalid resort records: {e}")))?;

        for resort in &resorts {
            resort.coordinates().validate().map_err(|e| {
                SnowError::dataset(format!("resort {} ({}): {e}", resort.id, resort.name))
            })?;
        }

        Ok(resorts)
    }
}
