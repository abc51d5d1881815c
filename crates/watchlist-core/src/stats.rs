use chrono::{DateTime, Datelike, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error};
use watchlist_models::{
    Category, DecadeCount, Distributions, ListCollection, Overview, RatingDistribution,
    StatisticsSnapshot, TopStats, YearCount,
};
use crate::error::{Result, WatchlistError};
use crate::parse::{decade_of, extract_year, runtime_minutes};

pub const DEFAULT_TOP_YEARS: usize = 10;

/// Derives statistics from a list collection without touching it
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    top_years: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_YEARS)
    }
}

/// Aggregate with the default top-10 year ranking
pub fn aggregate(
    lists: &ListCollection,
    account_created_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<StatisticsSnapshot> {
    Aggregator::default().aggregate(lists, account_created_at, now)
}

impl Aggregator {
    pub fn new(top_years: usize) -> Self {
        Self { top_years }
    }

    pub fn aggregate(
        &self,
        lists: &ListCollection,
        account_created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<StatisticsSnapshot> {
        validate(lists)?;

        let mut list_distribution = BTreeMap::new();
        for category in Category::ALL {
            list_distribution.insert(category, lists.get(category).len());
        }

        let total_watch_time: f64 = lists
            .watched
            .iter()
            .map(|item| runtime_minutes(&item.runtime))
            .sum();

        let mut year_distribution: BTreeMap<i32, usize> = BTreeMap::new();
        let mut monthly_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut rating_distribution = RatingDistribution::default();
        let mut rating_sum = 0.0;
        let mut runtime_sum = 0.0;
        let mut runtime_count = 0usize;
        let mut movies_this_month = 0;
        let mut movies_this_year = 0;

        for (_, item) in lists.iter() {
            if let Some(year) = extract_year(&item.release_date) {
                *year_distribution.entry(year).or_insert(0) += 1;
            }

            if let Some(added) = item.added_at {
                *monthly_distribution
                    .entry(format!("{:04}-{:02}", added.year(), added.month()))
                    .or_insert(0) += 1;
                if added.year() == now.year() {
                    movies_this_year += 1;
                    if added.month() == now.month() {
                        movies_this_month += 1;
                    }
                }
            }

            if let Some(rating) = item.rating {
                rating_distribution.record(rating);
                rating_sum += rating;
            }

            if item.has_runtime() {
                runtime_sum += runtime_minutes(&item.runtime);
                runtime_count += 1;
            }
        }

        let mut decade_distribution: BTreeMap<i32, usize> = BTreeMap::new();
        for (year, count) in &year_distribution {
            *decade_distribution.entry(decade_of(*year)).or_insert(0) += count;
        }

        let rated = rating_distribution.total();
        let average_rating = if rated > 0 {
            round_to_tenth(rating_sum / rated as f64)
        } else {
            0.0
        };
        let average_runtime = if runtime_count > 0 {
            (runtime_sum / runtime_count as f64).round() as u64
        } else {
            0
        };

        let account_age = account_created_at
            .map(|created| (now - created).num_days().max(0))
            .unwrap_or(0);

        let most_common_years = ranked(&year_distribution)
            .into_iter()
            .take(self.top_years)
            .map(|(year, count)| YearCount { year, count })
            .collect();
        let most_common_decades = ranked(&decade_distribution)
            .into_iter()
            .map(|(decade, count)| DecadeCount { decade, count })
            .collect();

        debug!(
            "Aggregated {} items ({} rated, {} with runtime, {} distinct years)",
            lists.len(),
            rated,
            runtime_count,
            year_distribution.len()
        );

        Ok(StatisticsSnapshot {
            overview: Overview {
                total_movies: lists.len(),
                watched_count: lists.watched.len(),
                watching_count: lists.watching.len(),
                planned_count: lists.planned.len(),
                onhold_count: lists.onhold.len(),
                dropped_count: lists.dropped.len(),
                total_watch_time: total_watch_time.round() as u64,
                average_rating,
                average_runtime,
                movies_this_month,
                movies_this_year,
                account_age,
            },
            distributions: Distributions {
                year_distribution,
                decade_distribution,
                monthly_distribution,
                rating_distribution,
                list_distribution,
            },
            top_stats: TopStats {
                most_common_years,
                most_common_decades,
            },
        })
    }
}

/// Reject collections the store could never have produced
fn validate(lists: &ListCollection) -> Result<()> {
    let mut seen = HashSet::new();
    for (category, item) in lists.iter() {
        if item.imdb_id.trim().is_empty() {
            error!("Collection has an item without imdbId in {}", category);
            return Err(WatchlistError::InvalidCollection(format!(
                "item without imdbId in {}",
                category
            )));
        }
        if !seen.insert(item.imdb_id.as_str()) {
            error!("Collection holds {} more than once", item.imdb_id);
            return Err(WatchlistError::InvalidCollection(format!(
                "{} appears more than once",
                item.imdb_id
            )));
        }
    }
    Ok(())
}

/// Descending count, ties broken by the more recent key
fn ranked(distribution: &BTreeMap<i32, usize>) -> Vec<(i32, usize)> {
    let mut entries: Vec<(i32, usize)> = distribution.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    entries
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
