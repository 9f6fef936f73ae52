//! Output formatting for reports and raw rows.
//!
//! Supports a plain-text report, JSON serialization, and CSV rendering of
//! raw trip rows.

use std::io::Write;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::BikeshareError;
use crate::loader::{
    BIRTH_YEAR, END_STATION, END_TIME, GENDER, START_STATION, START_TIME, TRIP_DURATION, USER_TYPE,
};
use crate::schema::{Columns, TripRecord};
use crate::stats::{Availability, StatsReport};

const RULE: &str = "----------------------------------------";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &StatsReport) {
    debug!("{:#?}", report);
}

/// Converts a report into a JSON value; failed groups become
/// `{"unavailable": "<reason>"}`.
pub fn report_to_json(report: &StatsReport) -> Result<Value> {
    let users = &report.users;
    let genders = match &users.genders {
        Availability::Present(counts) => serde_json::to_value(counts)?,
        Availability::Absent => unavailable("no gender data"),
    };
    let birth_years = match &users.birth_years {
        Availability::Present(stats) => group(stats)?,
        Availability::Absent => unavailable("no birth-year data"),
    };
    let durations = match &report.durations {
        Ok(durations) => json!({
            "trips": durations.trips,
            "total_secs": durations.total_secs,
            "mean_secs": group(&durations.mean_secs)?,
        }),
        Err(e) => unavailable(&e.to_string()),
    };

    Ok(json!({
        "city": report.city,
        "trips": report.trips,
        "time": group(&report.time)?,
        "stations": group(&report.stations)?,
        "durations": durations,
        "users": {
            "user_types": users.user_types,
            "genders": genders,
            "birth_years": birth_years,
        },
    }))
}

fn group<T: Serialize>(result: &std::result::Result<T, BikeshareError>) -> Result<Value> {
    Ok(match result {
        Ok(value) => serde_json::to_value(value)?,
        Err(e) => unavailable(&e.to_string()),
    })
}

fn unavailable(reason: &str) -> Value {
    json!({ "unavailable": reason })
}

/// Writes the report as pretty-printed JSON.
pub fn print_json(report: &StatsReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(&report_to_json(report)?)?)?;
    Ok(())
}

/// `3725` -> `1h 02m 05s`.
pub fn format_duration(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    format!(
        "{sign}{}h {:02}m {:02}s",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Writes the human-readable report, one block per statistic group.
pub fn render_report(report: &StatsReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
    match &report.time {
        Ok(time) => {
            writeln!(out, "Most popular month: {}", time.most_common_month)?;
            writeln!(out, "Most popular day: {}", time.most_common_weekday)?;
            writeln!(out, "Most popular start hour: {}", time.most_common_hour)?;
        }
        Err(e) => writeln!(out, "\t{e}")?,
    }
    writeln!(out, "{RULE}")?;

    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    match &report.stations {
        Ok(stations) => {
            writeln!(out, "Most popular start station: {}", stations.most_common_start)?;
            writeln!(out, "Most popular end station: {}", stations.most_common_end)?;
            writeln!(
                out,
                "Most popular combination of start station and end station: {}, {}",
                stations.most_common_trip.start, stations.most_common_trip.end
            )?;
        }
        Err(e) => writeln!(out, "\t{e}")?,
    }
    writeln!(out, "{RULE}")?;

    writeln!(out, "\nCalculating Trip Duration...\n")?;
    match &report.durations {
        Ok(durations) => {
            writeln!(
                out,
                "Total travel time: {} seconds ({})",
                durations.total_secs,
                format_duration(durations.total_secs)
            )?;
            match &durations.mean_secs {
                Ok(mean_secs) => writeln!(
                    out,
                    "Average travel time: {:.2} seconds ({})",
                    mean_secs,
                    format_duration(mean_secs.round() as i64)
                )?,
                Err(e) => writeln!(out, "\t{e}")?,
            }
        }
        Err(e) => writeln!(out, "\t{e}")?,
    }
    writeln!(out, "{RULE}")?;

    writeln!(out, "\nCalculating User Stats...\n")?;
    writeln!(out, "Count of user types:")?;
    for entry in &report.users.user_types {
        writeln!(out, "{:<14}: {}", entry.label, entry.count)?;
    }

    writeln!(out, "\nCount of genders:")?;
    match &report.users.genders {
        Availability::Present(counts) if counts.is_empty() => writeln!(out, "\tNo gender values.")?,
        Availability::Present(counts) => {
            for entry in counts {
                writeln!(out, "{:<10}: {}", entry.label, entry.count)?;
            }
        }
        Availability::Absent => writeln!(out, "\tThere is no 'Gender' data.")?,
    }

    writeln!(out, "\nBirth Year insights:")?;
    match &report.users.birth_years {
        Availability::Present(Ok(years)) => {
            writeln!(out, "Earliest Birth Year: {}", years.earliest)?;
            writeln!(out, "Most Recent Birth Year: {}", years.most_recent)?;
            writeln!(out, "Most Common Year of Birth: {}", years.most_common)?;
        }
        Availability::Present(Err(e)) => writeln!(out, "\t{e}")?,
        Availability::Absent => writeln!(out, "\tThere is no 'Birth Year' data.")?,
    }
    writeln!(out, "{RULE}")?;
    Ok(())
}

/// Writes trip rows as CSV with headers, including only the optional
/// columns the dataset carries.
pub fn write_rows(rows: &[&TripRecord], columns: Columns, out: &mut impl Write) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);

    let mut header = vec![
        START_TIME,
        END_TIME,
        TRIP_DURATION,
        START_STATION,
        END_STATION,
        USER_TYPE,
    ];
    if columns.gender {
        header.push(GENDER);
    }
    if columns.birth_year {
        header.push(BIRTH_YEAR);
    }
    writer.write_record(&header)?;

    for trip in rows {
        let mut record = vec![
            trip.start_time().format(TIMESTAMP_FORMAT).to_string(),
            trip.end_time.format(TIMESTAMP_FORMAT).to_string(),
            trip.duration_secs.to_string(),
            trip.start_station.clone(),
            trip.end_station.clone(),
            trip.user_type.clone(),
        ];
        if columns.gender {
            record.push(trip.gender.clone().unwrap_or_default());
        }
        if columns.birth_year {
            record.push(trip.birth_year.map(|y| y.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
