//! CSV ingestion for the city trip files.
//!
//! A [`Dataset`] owns the parsed rows behind an `Arc` and a list of row
//! indices, so filtered views share storage with the dataset they came from
//! and never modify it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{BikeshareError, Result};
use crate::filter;
use crate::schema::{City, Columns, FilterSpec, TripRecord};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

static REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    START_STATION,
    END_STATION,
    TRIP_DURATION,
    USER_TYPE,
];

static TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A single CSV row before timestamps and numbers are parsed.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "User Type")]
    user_type: String,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// An ordered, immutable set of trips for one city.
#[derive(Debug, Clone)]
pub struct Dataset {
    city: City,
    columns: Columns,
    records: Arc<[TripRecord]>,
    rows: Vec<usize>,
}

impl Dataset {
    pub fn new(city: City, columns: Columns, records: Vec<TripRecord>) -> Self {
        let rows = (0..records.len()).collect();
        Self {
            city,
            columns,
            records: records.into(),
            rows,
        }
    }

    /// A view over a subset of this dataset's rows, in the given order.
    pub(crate) fn view(&self, rows: Vec<usize>) -> Self {
        Self {
            city: self.city,
            columns: self.columns,
            records: Arc::clone(&self.records),
            rows,
        }
    }

    pub(crate) fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&TripRecord> {
        self.rows.get(position).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> + '_ {
        self.rows.iter().map(move |&i| &self.records[i])
    }
}

/// Resolves cities to their CSV files inside a data directory.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
}

impl CityCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    pub fn load(&self, city: City) -> Result<Dataset> {
        load_city(&self.path_for(city), city)
    }
}

/// Reads and parses the CSV at `path` as trips for `city`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_city(path: &Path, city: City) -> Result<Dataset> {
    info!("Loading city data");
    let file = File::open(path).map_err(|source| BikeshareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_trips(city, &path.display().to_string(), file)?;
    info!(rows = dataset.len(), "City data loaded");
    Ok(dataset)
}

/// Loads `city` and applies the month/day filter, validating all three tokens.
pub fn load_filtered(catalog: &CityCatalog, city: &str, month: &str, day: &str) -> Result<Dataset> {
    let city: City = city.parse()?;
    let spec = FilterSpec::parse(month, day)?;
    let dataset = catalog.load(city)?;
    Ok(filter::apply(&dataset, &spec))
}

/// Parses trip rows from any CSV reader. `origin` names the source in errors.
pub fn read_trips<R: Read>(city: City, origin: &str, reader: R) -> Result<Dataset> {
    // header names are matched exactly by the row deserializer, so trim them up front
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| BikeshareError::data_format(origin, e.to_string()))?
        .clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    if let Some(missing) = REQUIRED_COLUMNS.iter().copied().find(|&c| !has_column(c)) {
        return Err(BikeshareError::data_format(
            origin,
            format!("missing required column '{missing}'"),
        ));
    }

    let columns = Columns {
        gender: has_column(GENDER),
        birth_year: has_column(BIRTH_YEAR),
    };
    debug!(?columns, "Detected optional columns");

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawTrip>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let raw = result.map_err(|e| BikeshareError::data_format(origin, e.to_string()))?;
        records.push(to_record(raw, origin, line)?);
    }

    Ok(Dataset::new(city, columns, records))
}

fn to_record(raw: RawTrip, origin: &str, line: usize) -> Result<TripRecord> {
    let start = parse_timestamp(&raw.start_time)
        .ok_or_else(|| field_error(origin, line, START_TIME, &raw.start_time))?;
    let end = parse_timestamp(&raw.end_time)
        .ok_or_else(|| field_error(origin, line, END_TIME, &raw.end_time))?;
    let duration = parse_duration(&raw.trip_duration)
        .ok_or_else(|| field_error(origin, line, TRIP_DURATION, &raw.trip_duration))?;

    let birth_year = match non_blank(raw.birth_year) {
        Some(value) => Some(
            parse_birth_year(&value).ok_or_else(|| field_error(origin, line, BIRTH_YEAR, &value))?,
        ),
        None => None,
    };

    Ok(TripRecord::new(
        start,
        end,
        raw.start_station,
        raw.end_station,
        duration,
        raw.user_type.trim().to_string(),
    )
    .with_demographics(non_blank(raw.gender), birth_year))
}

fn field_error(origin: &str, line: usize, column: &str, value: &str) -> BikeshareError {
    BikeshareError::data_format(
        origin,
        format!("line {line}: cannot parse '{column}' value '{value}'"),
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Whole seconds; decimal values are rounded. Values outside the `i64`
/// range are rejected rather than saturated.
pub fn parse_duration(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return Some(secs);
    }
    value
        .parse::<f64>()
        .ok()
        .map(f64::round)
        .filter(|secs| secs.is_finite() && secs.abs() < i64::MAX as f64)
        .map(|secs| secs as i64)
}

/// Accepts `1992` and `1992.0`, rejects fractional years.
pub fn parse_birth_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|year| year.is_finite() && year.fract() == 0.0)
        .map(|year| year as i32)
}
