//! Aggregation engine.
//!
//! Computes the five statistic groups over a (possibly filtered) dataset:
//! time of travel, station popularity, trip duration and the user
//! breakdowns. Groups are independent; one failing with `NoData` leaves the
//! others intact.

pub mod travel;
pub mod types;
pub mod users;
pub mod utility;

pub use travel::{duration_stats, station_stats, time_stats};
pub use types::{
    Availability, BirthYearStats, DurationStats, LabelCount, StationPair, StationStats,
    StatsReport, TimeStats, UserStats,
};
pub use users::user_stats;

use tracing::info;

use crate::loader::Dataset;

/// Builds a fresh [`StatsReport`] for `dataset`. Pure function of the rows.
#[tracing::instrument(skip_all, fields(city = %dataset.city(), rows = dataset.len()))]
pub fn compute_report(dataset: &Dataset) -> StatsReport {
    let report = StatsReport {
        city: dataset.city(),
        trips: dataset.len(),
        time: time_stats(dataset),
        stations: station_stats(dataset),
        durations: duration_stats(dataset),
        users: user_stats(dataset),
    };
    info!(
        time_ok = report.time.is_ok(),
        stations_ok = report.stations.is_ok(),
        durations_ok = report.durations.is_ok(),
        "Report computed"
    );
    report
}
