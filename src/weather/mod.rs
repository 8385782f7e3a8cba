//! Forecast source backed by the Open-Meteo API
//!
//! Requests use imperial units and a single configured timezone. Transient
//! failures are retried with a randomised sleep, up to a bounded number of
//! attempts, after which the caller gets [`SnowError::UpstreamUnavailable`].

use rand::RngExt;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::ForecastConfig;
use crate::models::{Coordinates, ForecastBundle, Resort};
use crate::{Result, SnowError};

pub mod open_meteo;

use open_meteo::{CURRENT_PARAMS, DAILY_PARAMS, ForecastResponse, HOURLY_PARAMS};

/// Anything that can produce a forecast for a resort
pub trait ForecastProvider {
    fn forecast_for(&self, resort: &Resort) -> Result<ForecastBundle>;
}

/// Outcome of a single failed attempt
#[derive(Debug)]
pub enum AttemptError {
    /// Worth trying again: transport, TLS, timeout, 5xx/429, malformed body
    Transient(String),
    /// Retrying cannot help: bad request, auth failure
    Permanent(String),
}

/// How many times to retry and how long to sleep in between
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            max_backoff: Duration::from_secs(u64::from(config.max_backoff_seconds)),
        }
    }

    /// Uniformly random sleep in `[0, max_backoff]`
    #[must_use]
    pub fn backoff(&self) -> Duration {
        let max_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }

    /// Run `attempt` until it succeeds, fails permanently or the retries run out.
    ///
    /// `attempt` receives the 1-based attempt number.
    pub fn run<T, F>(&self, resort: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut(u32) -> std::result::Result<T, AttemptError>,
    {
        let total = self.max_retries.saturating_add(1);
        let mut number = 1;

        loop {
            match attempt(number) {
                Ok(value) => return Ok(value),
                Err(AttemptError::Permanent(message)) => {
                    return Err(SnowError::api(format!("resort {resort}: {message}")));
                }
                Err(AttemptError::Transient(message)) if number >= total => {
                    return Err(SnowError::upstream_unavailable(resort, number, message));
                }
                Err(AttemptError::Transient(message)) => {
                    let pause = self.backoff();
                    warn!(
                        resort,
                        attempt = number,
                        backoff_ms = pause.as_millis() as u64,
                        "Forecast request failed: {}. Retrying after sleep...",
                        message
                    );
                    thread::sleep(pause);
                    number += 1;
                }
            }
        }
    }
}

/// Blocking Open-Meteo forecast client
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: ForecastConfig,
    retry: RetryPolicy,
}

impl OpenMeteoClient {
    /// Create a new client from the forecast configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("snowline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SnowError::config(format!("Failed to create HTTP client: {e}")))?;
        let retry = RetryPolicy::from_config(&config);

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/v1/forecast", self.config.base_url.trim_end_matches('/'))
    }

    /// Query string for a location. The API key is only sent when configured.
    #[must_use]
    pub fn query_params(&self, coordinates: Coordinates) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", coordinates.latitude.to_string()),
            ("longitude", coordinates.longitude.to_string()),
            ("models", "best_match".to_string()),
            ("hourly", HOURLY_PARAMS.join(",")),
            ("daily", DAILY_PARAMS.join(",")),
            ("current", CURRENT_PARAMS.join(",")),
            ("temperature_unit", "fahrenheit".to_string()),
            ("wind_speed_unit", "mph".to_string()),
            ("precipitation_unit", "inch".to_string()),
            ("timezone", self.config.timezone.clone()),
            ("forecast_days", self.config.forecast_days.to_string()),
        ];
        if let Some(api_key) = &self.config.api_key {
            params.push(("apikey", api_key.clone()));
        }
        params
    }

    /// Fetch and parse the forecast for a location.
    ///
    /// `label` identifies the caller in logs and errors.
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub fn fetch_forecast(&self, label: &str, coordinates: Coordinates) -> Result<ForecastBundle> {
        coordinates.validate()?;

        let start_time = Instant::now();
        let response = self
            .retry
            .run(label, |attempt| self.request_once(coordinates, attempt))?;
        let bundle = response.into_bundle();

        info!(
            "Retrieved {} days and {} hours for {} in {:.3}s",
            bundle.daily.len(),
            bundle.hourly.len(),
            label,
            start_time.elapsed().as_secs_f64()
        );
        Ok(bundle)
    }

    fn request_once(
        &self,
        coordinates: Coordinates,
        attempt: u32,
    ) -> std::result::Result<ForecastResponse, AttemptError> {
        debug!("Open-Meteo request attempt {} to {}", attempt, self.endpoint());

        let response = self
            .client
            .get(self.endpoint())
            .query(&self.query_params(coordinates))
            .send()
            .map_err(|e| AttemptError::Transient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("provider returned {status}");
            return Err(if is_retryable_status(status) {
                AttemptError::Transient(message)
            } else {
                AttemptError::Permanent(message)
            });
        }

        let body = response
            .text()
            .map_err(|e| AttemptError::Transient(format!("failed to read body: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| AttemptError::Transient(format!("failed to parse forecast: {e}")))
    }
}

impl ForecastProvider for OpenMeteoClient {
    fn forecast_for(&self, resort: &Resort) -> Result<ForecastBundle> {
        self.fetch_forecast(&resort.id.to_string(), resort.coordinates())
    }
}

/// 5xx, 429 and 408 are worth another attempt; other failures are not
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn instant_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            max_backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_retry_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result = instant_policy(3).run("1", |attempt| {
            calls.set(attempt);
            if attempt < 3 {
                Err(AttemptError::Transient("connection reset".into()))
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_is_bounded() {
        let calls = Cell::new(0);
        let result: Result<()> = instant_policy(2).run("7", |_| {
            calls.set(calls.get() + 1);
            Err(AttemptError::Transient("tls handshake eof".into()))
        });
        assert_eq!(calls.get(), 3);
        match result.unwrap_err() {
            SnowError::UpstreamUnavailable {
                resort, attempts, ..
            } => {
                assert_eq!(resort, "7");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = instant_policy(5).run("9", |_| {
            calls.set(calls.get() + 1);
            Err(AttemptError::Permanent("provider returned 400 Bad Request".into()))
        });
        assert_eq!(calls.get(), 1);
        assert!(matches!(result.unwrap_err(), SnowError::Api { .. }));
    }

    #[test]
    fn test_backoff_within_bounds() {
        let policy = RetryPolicy {
            max_retries: 1,
            max_backoff: Duration::from_secs(5),
        };
        for _ in 0..50 {
            assert!(policy.backoff() <= Duration::from_secs(5));
        }
        assert_eq!(instant_policy(1).backoff(), Duration::ZERO);
    }

    #[test]
    fn test_query_params() {
        let mut config = ForecastConfig::default();
        config.base_url = "http://localhost:9999/".to_string();
        let client = OpenMeteoClient::new(config.clone()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/forecast");

        let coordinates = Coordinates::new(39.6403, -106.3742).unwrap();
        let params = client.query_params(coordinates);
        let value = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(value("latitude").as_deref(), Some("39.6403"));
        assert_eq!(value("forecast_days").as_deref(), Some("16"));
        assert_eq!(value("timezone").as_deref(), Some("America/New_York"));
        assert_eq!(value("wind_speed_unit").as_deref(), Some("mph"));
        assert!(value("daily").unwrap().contains("snowfall_sum"));
        assert_eq!(value("apikey"), None);

        config.api_key = Some("secret-key".to_string());
        let keyed = OpenMeteoClient::new(config).unwrap();
        assert!(keyed.query_params(coordinates).contains(&("apikey", "secret-key".to_string())));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_invalid_coordinates_rejected_before_request() {
        let client = OpenMeteoClient::new(ForecastConfig::default()).unwrap();
        let result = client.fetch_forecast(
            "bad",
            Coordinates {
                latitude: 91.0,
                longitude: 0.0,
            },
        );
        assert!(matches!(result.unwrap_err(), SnowError::Validation { .. }));
    }
}
