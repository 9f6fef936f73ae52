// Helper functions for tests
use chrono::{NaiveDate, NaiveDateTime};

use crate::loader::Dataset;
use crate::schema::{City, Columns, TripRecord};

pub fn at(date: &str, hour: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn trip(date: &str, hour: u32, start: &str, end: &str, secs: i64, user: &str) -> TripRecord {
    let started = at(date, hour);
    TripRecord::new(
        started,
        started + chrono::Duration::seconds(secs),
        start.to_string(),
        end.to_string(),
        secs,
        user.to_string(),
    )
}

pub fn dataset(records: Vec<TripRecord>) -> Dataset {
    Dataset::new(City::Chicago, Columns::default(), records)
}

pub fn dataset_with_demographics(records: Vec<TripRecord>) -> Dataset {
    let columns = Columns {
        gender: true,
        birth_year: true,
    };
    Dataset::new(City::NewYorkCity, columns, records)
}
