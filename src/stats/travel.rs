//! Time-of-travel, station popularity and trip-duration groups.

use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::loader::Dataset;
use crate::stats::types::{DurationStats, StationPair, StationStats, TimeStats};
use crate::stats::utility::{mean, mode};

const TIME_GROUP: &str = "the most frequent times of travel";
const STATION_GROUP: &str = "the most popular stations and trip";
const DURATION_GROUP: &str = "the average trip duration";

/// Most common month, weekday and start hour.
#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn time_stats(dataset: &Dataset) -> Result<TimeStats> {
    let no_data = || BikeshareError::NoData(TIME_GROUP);

    let stats = TimeStats {
        most_common_month: mode(dataset.iter().map(|t| t.month())).ok_or_else(no_data)?,
        most_common_weekday: mode(dataset.iter().map(|t| t.weekday())).ok_or_else(no_data)?,
        most_common_hour: mode(dataset.iter().map(|t| t.hour())).ok_or_else(no_data)?,
    };
    debug!(?stats, "Time stats computed");
    Ok(stats)
}

/// Most common start station, end station and start/end combination.
#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn station_stats(dataset: &Dataset) -> Result<StationStats> {
    let no_data = || BikeshareError::NoData(STATION_GROUP);

    let start = mode(dataset.iter().map(|t| t.start_station.as_str())).ok_or_else(no_data)?;
    let end = mode(dataset.iter().map(|t| t.end_station.as_str())).ok_or_else(no_data)?;
    let (trip_start, trip_end) = mode(
        dataset
            .iter()
            .map(|t| (t.start_station.as_str(), t.end_station.as_str())),
    )
    .ok_or_else(no_data)?;

    Ok(StationStats {
        most_common_start: start.to_string(),
        most_common_end: end.to_string(),
        most_common_trip: StationPair {
            start: trip_start.to_string(),
            end: trip_end.to_string(),
        },
    })
}

/// Sum of trip durations in seconds; zero for an empty dataset. A sum that
/// does not fit in `i64` is a `DataFormat` error.
pub fn total_duration(dataset: &Dataset) -> Result<i64> {
    dataset
        .iter()
        .try_fold(0i64, |acc, t| acc.checked_add(t.duration_secs))
        .ok_or_else(|| {
            BikeshareError::data_format(
                dataset.city().file_name(),
                "sum of 'Trip Duration' exceeds the supported range",
            )
        })
}

pub fn mean_duration(dataset: &Dataset) -> Result<f64> {
    mean(total_duration(dataset)?, dataset.len()).ok_or(BikeshareError::NoData(DURATION_GROUP))
}

/// Total and mean trip duration. The total is always defined; only the mean
/// reports `NoData` on an empty view.
#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn duration_stats(dataset: &Dataset) -> Result<DurationStats> {
    let total_secs = total_duration(dataset)?;
    Ok(DurationStats {
        trips: dataset.len(),
        total_secs,
        mean_secs: mean(total_secs, dataset.len()).ok_or(BikeshareError::NoData(DURATION_GROUP)),
    })
}
