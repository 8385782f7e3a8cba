//! Regional aggregation across the whole resort set
//!
//! [`ForecastCache`] holds one fetched forecast per resort id and is filled
//! once per build pass; [`RegionIndex`] answers grouping, ranking and roll-up
//! queries against it. Cross-resort day summaries join on the day label
//! ("Tue 03/14"), not on the calendar date.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use crate::config::RegionConfig;
use crate::daily::{DailyForecast, valid_forecasts};
use crate::models::{CurrentConditions, Forecast, ForecastBundle, HourlyForecast, Resort};
use crate::scoring::{self, Rating, ScoredDay};
use crate::weather::ForecastProvider;
use crate::{Result, SnowError};

/// Hours shown in hourly views unless the caller asks otherwise
pub const DEFAULT_HOURLY_WINDOW: usize = 48;

/// A resort whose forecast could not be fetched during [`ForecastCache::populate`]
#[derive(Debug)]
pub struct FetchFailure {
    pub resort_id: u64,
    pub resort_name: String,
    pub error: SnowError,
}

/// Forecasts keyed by resort id, owned by the caller for one build pass
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: HashMap<u64, ForecastBundle>,
}

impl ForecastCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resort_id: u64, bundle: ForecastBundle) {
        self.entries.insert(resort_id, bundle);
    }

    #[must_use]
    pub fn contains(&self, resort_id: u64) -> bool {
        self.entries.contains_key(&resort_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch every resort not already cached.
    ///
    /// A failing resort is logged and skipped; the rest of the pass carries
    /// on and the failures are handed back for the caller to report.
    pub fn populate<P>(&mut self, resorts: &[Resort], provider: &P) -> Vec<FetchFailure>
    where
        P: ForecastProvider + ?Sized,
    {
        let mut failures = Vec::new();

        for resort in resorts {
            if self.contains(resort.id) {
                debug!("Forecast for resort {} already cached", resort.id);
                continue;
            }

            match provider.forecast_for(resort) {
                Ok(bundle) => self.insert(resort.id, bundle),
                Err(error) => {
                    warn!(
                        resort_id = resort.id,
                        "Skipping {}: {}", resort.name, error
                    );
                    failures.push(FetchFailure {
                        resort_id: resort.id,
                        resort_name: resort.name.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            "Forecast cache holds {} resorts ({} failed)",
            self.len(),
            failures.len()
        );
        failures
    }

    /// Raw daily forecasts, empty when the resort was never fetched
    #[must_use]
    pub fn daily(&self, resort: &Resort) -> &[Forecast] {
        self.entries
            .get(&resort.id)
            .map_or(&[], |bundle| bundle.daily.as_slice())
    }

    #[must_use]
    pub fn hourly(&self, resort: &Resort) -> &[HourlyForecast] {
        self.entries
            .get(&resort.id)
            .map_or(&[], |bundle| bundle.hourly.as_slice())
    }

    #[must_use]
    pub fn current(&self, resort: &Resort) -> Option<&CurrentConditions> {
        self.entries
            .get(&resort.id)
            .and_then(|bundle| bundle.current.as_ref())
    }
}

/// Optional country and region restriction for leaderboard queries
#[derive(Debug, Clone, Copy, Default)]
pub struct ResortFilter<'a> {
    pub country: Option<&'a str>,
    pub state: Option<&'a str>,
}

impl<'a> ResortFilter<'a> {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn country(mut self, country: &'a str) -> Self {
        self.country = Some(country);
        self
    }

    #[must_use]
    pub fn state(mut self, state: &'a str) -> Self {
        self.state = Some(state);
        self
    }

    fn matches(&self, resort: &Resort) -> bool {
        self.country.is_none_or(|c| resort.country_name == c)
            && self.state.is_none_or(|s| resort.region_name == s)
    }
}

/// A resort paired with the snow metric it was ranked by (inches)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResortSnow<'a> {
    pub resort: &'a Resort,
    pub snow: f64,
}

/// Snow roll-up for one country or one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub name: String,
    pub total_snow: f64,
    /// Resorts with any snow in the forecast
    pub resort_count: usize,
    pub total_resorts: usize,
}

/// One day aggregated across a set of resorts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDaySummary {
    pub name: String,
    pub date: NaiveDate,
    pub avg_score: u8,
    pub rating: Rating,
    pub total_resorts: usize,
    pub resorts_with_snow: usize,
    pub epic_count: usize,
    pub great_count: usize,
    pub good_count: usize,
    pub max_snow: f64,
}

/// Snow-by-day grid: a `Location` column followed by one column per day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowTable {
    pub headers: Vec<String>,
    pub rows: Vec<SnowTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowTableRow {
    pub resort_id: u64,
    pub resort_name: String,
    pub slug: String,
    pub cells: Vec<String>,
}

#[derive(Debug)]
struct DayBucket {
    date: NaiveDate,
    scores: Vec<u8>,
    snow: Vec<f64>,
}

/// Grouping and ranking over a fixed resort set
#[derive(Debug, Clone)]
pub struct RegionIndex {
    resorts: Vec<Resort>,
    settings: RegionConfig,
}

impl RegionIndex {
    /// Sort resorts by (country code, region code, name); every listing
    /// without its own order keeps this one.
    #[must_use]
    pub fn new(mut resorts: Vec<Resort>, settings: RegionConfig) -> Self {
        resorts.sort_by(|a, b| {
            (&a.country_code, &a.region_code, &a.name).cmp(&(
                &b.country_code,
                &b.region_code,
                &b.name,
            ))
        });
        Self { resorts, settings }
    }

    #[must_use]
    pub fn resorts(&self) -> &[Resort] {
        &self.resorts
    }

    /// Country names, sorted
    #[must_use]
    pub fn countries(&self) -> Vec<&str> {
        self.resorts
            .iter()
            .map(|r| r.country_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn resorts_for_country(&self, country: &str) -> Result<Vec<&Resort>> {
        let resorts: Vec<&Resort> = self
            .resorts
            .iter()
            .filter(|r| r.country_name == country)
            .collect();
        if resorts.is_empty() {
            return Err(SnowError::not_found("country", country));
        }
        Ok(resorts)
    }

    /// Resorts in a region, matched by region name across all countries
    pub fn resorts_for_state(&self, state: &str) -> Result<Vec<&Resort>> {
        let resorts: Vec<&Resort> = self
            .resorts
            .iter()
            .filter(|r| r.region_name == state)
            .collect();
        if resorts.is_empty() {
            return Err(SnowError::not_found("region", state));
        }
        Ok(resorts)
    }

    /// Region names of a country in resort order
    pub fn states(&self, country: &str) -> Result<Vec<&str>> {
        let mut states: Vec<&str> = Vec::new();
        for resort in self.resorts_for_country(country)? {
            if !states.contains(&resort.region_name.as_str()) {
                states.push(&resort.region_name);
            }
        }
        Ok(states)
    }

    /// Countries this small list their resorts without a region level
    pub fn is_small_country(&self, country: &str) -> Result<bool> {
        Ok(self.resorts_for_country(country)?.len() <= self.settings.small_country_threshold)
    }

    #[must_use]
    pub fn has_snow(&self, resort: &Resort, cache: &ForecastCache) -> bool {
        cache.daily(resort).iter().any(|f| f.snow_inches() > 0.0)
    }

    /// Sum of every retrieved day's snow high bound
    #[must_use]
    pub fn total_snow_for(&self, resort: &Resort, cache: &ForecastCache) -> f64 {
        cache.daily(resort).iter().map(Forecast::snow_inches).sum()
    }

    pub fn country_has_snow(&self, country: &str, cache: &ForecastCache) -> Result<bool> {
        Ok(self
            .resorts_for_country(country)?
            .into_iter()
            .any(|r| self.has_snow(r, cache)))
    }

    pub fn state_has_snow(&self, state: &str, cache: &ForecastCache) -> Result<bool> {
        Ok(self
            .resorts_for_state(state)?
            .into_iter()
            .any(|r| self.has_snow(r, cache)))
    }

    pub fn total_snow_for_country(&self, country: &str, cache: &ForecastCache) -> Result<f64> {
        Ok(self.sum_snow(&self.resorts_for_country(country)?, cache))
    }

    pub fn total_snow_for_state(&self, state: &str, cache: &ForecastCache) -> Result<f64> {
        Ok(self.sum_snow(&self.resorts_for_state(state)?, cache))
    }

    pub fn country_snow_count(&self, country: &str, cache: &ForecastCache) -> Result<usize> {
        Ok(self.count_snowy(&self.resorts_for_country(country)?, cache))
    }

    pub fn state_snow_count(&self, state: &str, cache: &ForecastCache) -> Result<usize> {
        Ok(self.count_snowy(&self.resorts_for_state(state)?, cache))
    }

    /// Resorts ranked by total forecast snow, largest first.
    ///
    /// Resorts without snow are dropped; equal totals order by resort name.
    #[must_use]
    pub fn top_snowy_resorts(
        &self,
        cache: &ForecastCache,
        filter: ResortFilter<'_>,
        limit: Option<usize>,
    ) -> Vec<ResortSnow<'_>> {
        self.rank(filter, limit, |resort| self.total_snow_for(resort, cache))
    }

    /// Resorts ranked by snow on the first forecast day only
    #[must_use]
    pub fn resorts_with_snow_today(
        &self,
        cache: &ForecastCache,
        filter: ResortFilter<'_>,
        limit: Option<usize>,
    ) -> Vec<ResortSnow<'_>> {
        self.rank(filter, limit, |resort| {
            cache.daily(resort).first().map_or(0.0, Forecast::snow_inches)
        })
    }

    fn rank<F>(&self, filter: ResortFilter<'_>, limit: Option<usize>, metric: F) -> Vec<ResortSnow<'_>>
    where
        F: Fn(&Resort) -> f64,
    {
        let mut ranked: Vec<ResortSnow<'_>> = self
            .resorts
            .iter()
            .filter(|r| filter.matches(r))
            .map(|resort| ResortSnow {
                resort,
                snow: metric(resort),
            })
            .filter(|rs| rs.snow > 0.0)
            .collect();

        ranked.sort_by(|a, b| {
            b.snow
                .total_cmp(&a.snow)
                .then_with(|| a.resort.name.cmp(&b.resort.name))
        });
        ranked.truncate(limit.unwrap_or(self.settings.top_limit));
        ranked
    }

    /// Per-region summaries of `country`, or per-country summaries when `None`.
    ///
    /// Groups without any snowy resort are left out; the rest are ordered by
    /// total snow, largest first, then by name.
    pub fn regional_summaries(
        &self,
        country: Option<&str>,
        cache: &ForecastCache,
    ) -> Result<Vec<RegionSummary>> {
        let mut groups: Vec<(&str, Vec<&Resort>)> = Vec::new();

        match country {
            Some(country) => {
                for resort in self.resorts_for_country(country)? {
                    push_group(&mut groups, &resort.region_name, resort);
                }
            }
            None => {
                for resort in &self.resorts {
                    push_group(&mut groups, &resort.country_name, resort);
                }
            }
        }

        let mut summaries: Vec<RegionSummary> = groups
            .into_iter()
            .map(|(name, resorts)| RegionSummary {
                name: name.to_string(),
                total_snow: self.sum_snow(&resorts, cache),
                resort_count: self.count_snowy(&resorts, cache),
                total_resorts: resorts.len(),
            })
            .filter(|s| s.resort_count > 0)
            .collect();

        summaries.sort_by(|a, b| {
            b.total_snow
                .total_cmp(&a.total_snow)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(summaries)
    }

    /// Scored days for one resort, first `limit` displayable days
    #[must_use]
    pub fn best_ski_days(
        &self,
        resort: &Resort,
        cache: &ForecastCache,
        limit: Option<usize>,
    ) -> Vec<ScoredDay> {
        scoring::best_ski_days(
            cache.daily(resort),
            limit.unwrap_or(self.settings.best_days_limit),
        )
    }

    #[must_use]
    pub fn best_day_to_ski(&self, resort: &Resort, cache: &ForecastCache) -> Option<ScoredDay> {
        scoring::best_day(cache.daily(resort))
    }

    /// Aggregate each resort's scored days by day label.
    ///
    /// The average score is rounded before the rating lookup. Rows are
    /// ordered by date and cut to `limit`, which also bounds the days scored
    /// per resort.
    #[must_use]
    pub fn best_ski_days_for_region(
        &self,
        resorts: &[&Resort],
        cache: &ForecastCache,
        limit: Option<usize>,
    ) -> Vec<RegionDaySummary> {
        let limit = limit.unwrap_or(self.settings.best_days_limit);
        let mut buckets: HashMap<String, DayBucket> = HashMap::new();

        for resort in resorts {
            for day in self.best_ski_days(resort, cache, Some(limit)) {
                let bucket = buckets.entry(day.name).or_insert_with(|| DayBucket {
                    date: day.date,
                    scores: Vec::new(),
                    snow: Vec::new(),
                });
                bucket.scores.push(day.score);
                bucket.snow.push(day.snow);
            }
        }

        let mut rows: Vec<RegionDaySummary> = buckets
            .into_iter()
            .map(|(name, bucket)| summarize_day(name, &bucket))
            .collect();

        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        rows.truncate(limit);
        rows
    }

    /// Displayable days for one resort
    #[must_use]
    pub fn daily_forecasts_for<'c>(
        &self,
        resort: &Resort,
        cache: &'c ForecastCache,
    ) -> Vec<DailyForecast<'c>> {
        valid_forecasts(cache.daily(resort))
    }

    /// The next `hours` hourly records, [`DEFAULT_HOURLY_WINDOW`] by default
    #[must_use]
    pub fn hourly_forecasts_for<'c>(
        &self,
        resort: &Resort,
        cache: &'c ForecastCache,
        hours: Option<usize>,
    ) -> &'c [HourlyForecast] {
        let hourly = cache.hourly(resort);
        &hourly[..hourly.len().min(hours.unwrap_or(DEFAULT_HOURLY_WINDOW))]
    }

    #[must_use]
    pub fn current_conditions_for<'c>(
        &self,
        resort: &Resort,
        cache: &'c ForecastCache,
    ) -> Option<&'c CurrentConditions> {
        cache.current(resort)
    }

    /// Snow per displayable day for each resort, padded to the longest horizon
    #[must_use]
    pub fn snow_table(&self, resorts: &[&Resort], cache: &ForecastCache) -> SnowTable {
        let columns: Vec<String> = resorts
            .iter()
            .map(|r| {
                self.daily_forecasts_for(r, cache)
                    .iter()
                    .map(DailyForecast::time_of_day)
                    .collect::<Vec<_>>()
            })
            .max_by_key(Vec::len)
            .unwrap_or_default();

        let rows = resorts
            .iter()
            .map(|resort| {
                let mut cells: Vec<String> = self
                    .daily_forecasts_for(resort, cache)
                    .iter()
                    .map(|day| day.snow().to_string())
                    .collect();
                cells.resize(columns.len(), String::new());
                SnowTableRow {
                    resort_id: resort.id,
                    resort_name: resort.name.clone(),
                    slug: resort.slug(),
                    cells,
                }
            })
            .collect();

        let mut headers = vec!["Location".to_string()];
        headers.extend(columns);
        SnowTable { headers, rows }
    }

    fn sum_snow(&self, resorts: &[&Resort], cache: &ForecastCache) -> f64 {
        resorts.iter().map(|r| self.total_snow_for(r, cache)).sum()
    }

    fn count_snowy(&self, resorts: &[&Resort], cache: &ForecastCache) -> usize {
        resorts.iter().filter(|r| self.has_snow(r, cache)).count()
    }
}

fn push_group<'a>(groups: &mut Vec<(&'a str, Vec<&'a Resort>)>, key: &'a str, resort: &'a Resort) {
    match groups.iter_mut().find(|(name, _)| *name == key) {
        Some((_, members)) => members.push(resort),
        None => groups.push((key, vec![resort])),
    }
}

fn summarize_day(name: String, bucket: &DayBucket) -> RegionDaySummary {
    let total: f64 = bucket.scores.iter().map(|&s| f64::from(s)).sum();
    let avg_score = (total / bucket.scores.len() as f64).round() as u8;
    let count = |range: std::ops::Range<u8>| {
        bucket
            .scores
            .iter()
            .filter(|&&s| range.contains(&s))
            .count()
    };

    RegionDaySummary {
        name,
        date: bucket.date,
        avg_score,
        rating: Rating::from_score(avg_score),
        total_resorts: bucket.scores.len(),
        resorts_with_snow: bucket.snow.iter().filter(|&&s| s > 0.0).count(),
        epic_count: bucket.scores.iter().filter(|&&s| s >= 85).count(),
        great_count: count(70..85),
        good_count: count(55..70),
        max_snow: bucket.snow.iter().copied().fold(0.0, f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValueRange;

    fn resort(id: u64, name: &str, country: &str, region: &str) -> Resort {
        Resort {
            id,
            name: name.to_string(),
            latitude: 40.0,
            longitude: -105.0,
            country_code: country[..2].to_uppercase(),
            country_name: country.to_string(),
            region_code: region[..2].to_uppercase(),
            region_name: region.to_string(),
            url: None,
            min_elevation: None,
            max_elevation: None,
        }
    }

    fn days(snow: &[f64]) -> ForecastBundle {
        let daily = snow
            .iter()
            .enumerate()
            .map(|(i, &inches)| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap();
                Forecast {
                    name: Forecast::label_for(date),
                    date: Some(date),
                    snow: ValueRange::zero_to(inches),
                    temp: ValueRange::new(Some(25.0), Some(30.0)),
                    wind_speed: ValueRange::zero_to(12.0),
                    ..Default::default()
                }
            })
            .collect();
        ForecastBundle {
            daily,
            ..Default::default()
        }
    }

    fn fixture() -> (RegionIndex, ForecastCache) {
        let resorts = vec![
            resort(1, "Vail", "United States", "Colorado"),
            resort(2, "Aspen", "United States", "Colorado"),
            resort(3, "Alta", "United States", "Utah"),
            resort(4, "Zermatt", "Switzerland", "Valais"),
        ];
        let mut cache = ForecastCache::new();
        cache.insert(1, days(&[2.0, 3.0]));
        cache.insert(2, days(&[0.0, 0.0]));
        cache.insert(3, days(&[0.0, 1.0]));
        cache.insert(4, days(&[4.0, 1.0]));
        (RegionIndex::new(resorts, RegionConfig::default()), cache)
    }

    #[test]
    fn test_sorted_by_country_region_name() {
        let (index, _) = fixture();
        let names: Vec<&str> = index.resorts().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zermatt", "Aspen", "Vail", "Alta"]);
        assert_eq!(index.countries(), vec!["Switzerland", "United States"]);
        assert_eq!(index.states("United States").unwrap(), vec!["Colorado", "Utah"]);
    }

    #[test]
    fn test_unknown_keys_fail() {
        let (index, cache) = fixture();
        assert!(matches!(
            index.states("Atlantis").unwrap_err(),
            SnowError::NotFound { kind: "country", .. }
        ));
        assert!(index.total_snow_for_state("Nowhere", &cache).is_err());
        assert!(index.regional_summaries(Some("Atlantis"), &cache).is_err());
    }

    #[test]
    fn test_state_rollup() {
        let (index, cache) = fixture();
        assert_eq!(index.total_snow_for_state("Colorado", &cache).unwrap(), 5.0);
        assert_eq!(index.state_snow_count("Colorado", &cache).unwrap(), 1);
        assert!(index.state_has_snow("Utah", &cache).unwrap());
        assert_eq!(index.total_snow_for_country("United States", &cache).unwrap(), 6.0);
        assert_eq!(index.country_snow_count("United States", &cache).unwrap(), 2);
        assert!(index.country_has_snow("Switzerland", &cache).unwrap());
    }

    #[test]
    fn test_missing_forecast_counts_as_no_snow() {
        let (index, _) = fixture();
        let empty = ForecastCache::new();
        assert!(!index.country_has_snow("Switzerland", &empty).unwrap());
        assert!(index.top_snowy_resorts(&empty, ResortFilter::all(), None).is_empty());
    }

    #[test]
    fn test_small_country_threshold() {
        let mut resorts: Vec<Resort> = (0..20)
            .map(|i| resort(i, &format!("Small {i:02}"), "Andorra", "Andorra"))
            .collect();
        resorts.extend((100..121).map(|i| resort(i, &format!("Big {i}"), "Norway", "Viken")));
        let index = RegionIndex::new(resorts, RegionConfig::default());

        assert!(index.is_small_country("Andorra").unwrap());
        assert!(!index.is_small_country("Norway").unwrap());
    }

    #[test]
    fn test_top_snowy_resorts() {
        let (index, cache) = fixture();
        let top = index.top_snowy_resorts(&cache, ResortFilter::all(), Some(10));
        let ranked: Vec<(&str, f64)> = top.iter().map(|rs| (rs.resort.name.as_str(), rs.snow)).collect();
        assert_eq!(ranked, vec![("Vail", 5.0), ("Zermatt", 5.0), ("Alta", 1.0)]);

        let utah = index.top_snowy_resorts(&cache, ResortFilter::all().state("Utah"), None);
        assert_eq!(utah.len(), 1);

        let limited = index.top_snowy_resorts(&cache, ResortFilter::all(), Some(1));
        assert_eq!(limited[0].resort.name, "Vail");
    }

    #[test]
    fn test_snow_today() {
        let (index, cache) = fixture();
        let today = index.resorts_with_snow_today(
            &cache,
            ResortFilter::all().country("United States"),
            None,
        );
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].resort.name, "Vail");
        assert_eq!(today[0].snow, 2.0);
    }

    #[test]
    fn test_regional_summaries() {
        let (index, cache) = fixture();
        let countries = index.regional_summaries(None, &cache).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "United States");
        assert_eq!(countries[0].total_snow, 6.0);
        assert_eq!(countries[0].resort_count, 2);
        assert_eq!(countries[0].total_resorts, 3);

        let mut dry = cache;
        dry.insert(3, days(&[0.0, 0.0]));
        let states = index.regional_summaries(Some("United States"), &dry).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].name, "Colorado");
    }

    #[test]
    fn test_best_ski_days_for_region() {
        let (index, cache) = fixture();
        let us = index.resorts_for_country("United States").unwrap();
        let rows = index.best_ski_days_for_region(&us, &cache, None);

        // base 50, ideal temps +10, wind 12 neutral; snow tiers on top
        assert_eq!(rows.len(), 2);
        let first = &rows[0];
        assert_eq!(first.name, "Mon 01/01");
        // Vail 2" -> 80, Aspen 0" -> 60, Alta 0" -> 60
        assert_eq!(first.avg_score, 67);
        assert_eq!(first.rating, Rating::Good);
        assert_eq!(first.total_resorts, 3);
        assert_eq!(first.resorts_with_snow, 1);
        assert_eq!(first.great_count, 1);
        assert_eq!(first.good_count, 2);
        assert_eq!(first.epic_count, 0);
        assert_eq!(first.max_snow, 2.0);

        let second = &rows[1];
        // Vail 3" -> 90, Aspen 0" -> 60, Alta 1" -> 80
        assert_eq!(second.avg_score, 77);
        assert_eq!(second.epic_count, 1);
        assert_eq!(second.max_snow, 3.0);

        assert_eq!(index.best_ski_days_for_region(&us, &cache, Some(1)).len(), 1);
    }

    #[test]
    fn test_snow_table_pads_rows() {
        let (index, mut cache) = fixture();
        cache.insert(2, days(&[1.0]));
        let resorts: Vec<&Resort> = index.resorts().iter().filter(|r| r.id <= 2).collect();
        let table = index.snow_table(&resorts, &cache);

        assert_eq!(table.headers, vec!["Location", "Mon 01/01", "Tue 01/02"]);
        let aspen = table.rows.iter().find(|r| r.resort_name == "Aspen").unwrap();
        assert_eq!(aspen.slug, "aspen");
        assert_eq!(aspen.cells, vec!["1\" (2.54 cm)".to_string(), String::new()]);
    }

    struct FlakyProvider;

    impl ForecastProvider for FlakyProvider {
        fn forecast_for(&self, resort: &Resort) -> Result<ForecastBundle> {
            if resort.id == 3 {
                Err(SnowError::upstream_unavailable("3", 6, "timed out"))
            } else {
                Ok(days(&[1.0]))
            }
        }
    }

    #[test]
    fn test_populate_skips_failures() {
        let (index, _) = fixture();
        let mut cache = ForecastCache::new();
        cache.insert(4, days(&[9.0]));

        let failures = cache.populate(index.resorts(), &FlakyProvider);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].resort_id, 3);
        assert!(failures[0].error.is_upstream());
        assert_eq!(cache.len(), 3);
        // already cached entries are not refetched
        assert_eq!(index.total_snow_for(&index.resorts()[0], &cache), 9.0);
    }

    #[test]
    fn test_hourly_window() {
        let (index, mut cache) = fixture();
        let time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let hour = HourlyForecast {
            time,
            temperature: Some(20.0),
            apparent_temperature: None,
            humidity: 80,
            precipitation_probability: 10,
            precipitation: None,
            snowfall: Some(0.1),
            weather_code: None,
            weather_description: String::new(),
            cloud_cover: 50,
            wind_speed: None,
            wind_direction: Default::default(),
            wind_gust: None,
            freezing_level: None,
            visibility: None,
            is_day: false,
        };
        cache.insert(
            1,
            ForecastBundle {
                hourly: vec![hour; 60],
                ..Default::default()
            },
        );
        let vail = index.resorts().iter().find(|r| r.id == 1).unwrap();
        assert_eq!(index.hourly_forecasts_for(vail, &cache, None).len(), 48);
        assert_eq!(index.hourly_forecasts_for(vail, &cache, Some(100)).len(), 60);
        assert!(index.current_conditions_for(vail, &cache).is_none());
    }
}
