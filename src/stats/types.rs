//! Report types produced by the aggregation engine.

use serde::Serialize;

use crate::error::Result;
use crate::schema::{City, Month, Weekday};

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub most_common_month: Month,
    pub most_common_weekday: Weekday,
    pub most_common_hour: u32,
}

/// A start/end station combination counted as one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start: String,
    pub most_common_end: String,
    pub most_common_trip: StationPair,
}

/// Total and average trip duration, in seconds. The mean is `NoData` when
/// there are no trips; the total is then 0.
#[derive(Debug)]
pub struct DurationStats {
    pub trips: usize,
    pub total_secs: i64,
    pub mean_secs: Result<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Result for a statistic over an optional column: the column was in the
/// source file, or it was not.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Present(T),
    Absent,
}

impl<T> Availability<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Availability::Present(_))
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Availability::Present(value) => Some(value),
            Availability::Absent => None,
        }
    }
}

/// Rider breakdowns.
#[derive(Debug)]
pub struct UserStats {
    pub user_types: Vec<LabelCount>,
    pub genders: Availability<Vec<LabelCount>>,
    /// `Present(Err(NoData))` when the column exists but no row in the view has a value.
    pub birth_years: Availability<Result<BirthYearStats>>,
}

/// All five statistic groups for one filtered dataset. Each group that needs
/// data fails on its own with `NoData` without affecting the others.
#[derive(Debug)]
pub struct StatsReport {
    pub city: City,
    pub trips: usize,
    pub time: Result<TimeStats>,
    pub stations: Result<StationStats>,
    pub durations: Result<DurationStats>,
    pub users: UserStats,
}
