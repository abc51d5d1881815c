use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::category::Category;

/// Read-only summary computed from a list collection on demand
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub overview: Overview,
    pub distributions: Distributions,
    pub top_stats: TopStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_movies: usize,
    pub watched_count: usize,
    pub watching_count: usize,
    pub planned_count: usize,
    pub onhold_count: usize,
    pub dropped_count: usize,
    /// Minutes, summed over the watched list only
    pub total_watch_time: u64,
    /// Mean over rated items, one decimal; 0 when nothing is rated
    pub average_rating: f64,
    /// Mean minutes over items with a runtime; 0 when none have one
    pub average_runtime: u64,
    pub movies_this_month: usize,
    pub movies_this_year: usize,
    /// Whole days since the account was created; 0 when unknown
    pub account_age: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    pub year_distribution: BTreeMap<i32, usize>,
    pub decade_distribution: BTreeMap<i32, usize>,
    /// Keyed by `YYYY-MM` of the date each item was added
    pub monthly_distribution: BTreeMap<String, usize>,
    pub rating_distribution: RatingDistribution,
    pub list_distribution: BTreeMap<Category, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopStats {
    pub most_common_years: Vec<YearCount>,
    pub most_common_decades: Vec<DecadeCount>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecadeCount {
    pub decade: i32,
    pub count: usize,
}

/// Fixed rating ranges, lower bound inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingBucket {
    NinePlus,
    EightToNine,
    SevenToEight,
    SixToSeven,
    FiveToSix,
    BelowFive,
}

impl RatingBucket {
    /// Highest range first
    pub const ALL: [RatingBucket; 6] = [
        RatingBucket::NinePlus,
        RatingBucket::EightToNine,
        RatingBucket::SevenToEight,
        RatingBucket::SixToSeven,
        RatingBucket::FiveToSix,
        RatingBucket::BelowFive,
    ];

    pub fn for_rating(rating: f64) -> Self {
        if rating >= 9.0 {
            RatingBucket::NinePlus
        } else if rating >= 8.0 {
            RatingBucket::EightToNine
        } else if rating >= 7.0 {
            RatingBucket::SevenToEight
        } else if rating >= 6.0 {
            RatingBucket::SixToSeven
        } else if rating >= 5.0 {
            RatingBucket::FiveToSix
        } else {
            RatingBucket::BelowFive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingBucket::NinePlus => "9+",
            RatingBucket::EightToNine => "8-9",
            RatingBucket::SevenToEight => "7-8",
            RatingBucket::SixToSeven => "6-7",
            RatingBucket::FiveToSix => "5-6",
            RatingBucket::BelowFive => "<5",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingDistribution {
    #[serde(rename = "9+")]
    pub nine_plus: usize,
    #[serde(rename = "8-9")]
    pub eight_to_nine: usize,
    #[serde(rename = "7-8")]
    pub seven_to_eight: usize,
    #[serde(rename = "6-7")]
    pub six_to_seven: usize,
    #[serde(rename = "5-6")]
    pub five_to_six: usize,
    #[serde(rename = "<5")]
    pub below_five: usize,
}

impl RatingDistribution {
    pub fn record(&mut self, rating: f64) {
        *self.slot(RatingBucket::for_rating(rating)) += 1;
    }

    pub fn count(&self, bucket: RatingBucket) -> usize {
        match bucket {
            RatingBucket::NinePlus => self.nine_plus,
            RatingBucket::EightToNine => self.eight_to_nine,
            RatingBucket::SevenToEight => self.seven_to_eight,
            RatingBucket::SixToSeven => self.six_to_seven,
            RatingBucket::FiveToSix => self.five_to_six,
            RatingBucket::BelowFive => self.below_five,
        }
    }

    pub fn total(&self) -> usize {
        self.nine_plus
            + self.eight_to_nine
            + self.seven_to_eight
            + self.six_to_seven
            + self.five_to_six
            + self.below_five
    }

    fn slot(&mut self, bucket: RatingBucket) -> &mut usize {
        match bucket {
            RatingBucket::NinePlus => &mut self.nine_plus,
            RatingBucket::EightToNine => &mut self.eight_to_nine,
            RatingBucket::SevenToEight => &mut self.seven_to_eight,
            RatingBucket::SixToSeven => &mut self.six_to_seven,
            RatingBucket::FiveToSix => &mut self.five_to_six,
            RatingBucket::BelowFive => &mut self.below_five,
        }
    }
}
