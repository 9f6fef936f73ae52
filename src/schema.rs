//! Trip-record shape and the fixed selector tables (cities, months, weekdays).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::error::{BikeshareError, Result, SelectorKind};

/// Wildcard token accepted for both the month and the weekday selector.
pub const ALL_TOKEN: &str = "all";

/// The three supported cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

/// City catalog: lowercase token, city, CSV file name.
static CITIES: [(&str, City, &str); 3] = [
    ("chicago", City::Chicago, "chicago.csv"),
    ("new york city", City::NewYorkCity, "new_york_city.csv"),
    ("washington", City::Washington, "washington.csv"),
];

impl City {
    /// Name of the backing CSV file inside the data directory.
    pub fn file_name(self) -> &'static str {
        CITIES[self.index()].2
    }

    fn index(self) -> usize {
        match self {
            City::Chicago => 0,
            City::NewYorkCity => 1,
            City::Washington => 2,
        }
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        CITIES
            .iter()
            .find(|(name, _, _)| *name == token)
            .map(|(_, city, _)| *city)
            .ok_or_else(|| BikeshareError::invalid(SelectorKind::City, s.trim()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        write!(f, "{name}")
    }
}

/// Calendar month, January = 1.
///
/// All twelve months are representable so a filter may ask for one the data
/// does not cover; only January through June are accepted as input tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

static MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Month tokens the interactive layer accepts.
static MONTH_TOKENS: [(&str, Month); 6] = [
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
];

impl Month {
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(n: u32) -> Option<Month> {
        MONTHS.get((n as usize).checked_sub(1)?).copied()
    }
}

impl FromStr for Month {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        MONTH_TOKENS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, month)| *month)
            .ok_or_else(|| BikeshareError::invalid(SelectorKind::Month, s.trim()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Day of week, numbered Sunday = 1 through Saturday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Weekday {
    Sunday = 1,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

static WEEKDAY_TOKENS: [(&str, Weekday); 7] = [
    ("sunday", Weekday::Sunday),
    ("monday", Weekday::Monday),
    ("tuesday", Weekday::Tuesday),
    ("wednesday", Weekday::Wednesday),
    ("thursday", Weekday::Thursday),
    ("friday", Weekday::Friday),
    ("saturday", Weekday::Saturday),
];

impl Weekday {
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Maps a calendar date's weekday onto this crate's Sunday-first numbering.
    pub fn of(date: &impl Datelike) -> Weekday {
        match date.weekday().num_days_from_sunday() {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }
}

impl FromStr for Weekday {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        WEEKDAY_TOKENS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, day)| *day)
            .ok_or_else(|| BikeshareError::invalid(SelectorKind::Weekday, s.trim()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Either the `all` wildcard or one concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selector<T>
where
    T: FromStr<Err = BikeshareError>,
{
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case(ALL_TOKEN) {
            Ok(Selector::All)
        } else {
            s.parse().map(Selector::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => write!(f, "All"),
            Selector::Only(value) => value.fmt(f),
        }
    }
}

/// Month and weekday predicates, combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub month: Selector<Month>,
    pub weekday: Selector<Weekday>,
}

impl FilterSpec {
    pub fn new(month: Selector<Month>, weekday: Selector<Weekday>) -> Self {
        Self { month, weekday }
    }

    /// Parses the month and day tokens, rejecting anything outside the token sets.
    pub fn parse(month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            month: month.parse()?,
            weekday: day.parse()?,
        })
    }
}

/// Which optional columns the source file carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Columns {
    pub gender: bool,
    pub birth_year: bool,
}

/// One trip. Month, weekday and hour are derived from the start time at
/// construction and the start time cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub duration_secs: i64,
    pub user_type: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    month: Month,
    weekday: Weekday,
    hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: String,
        end_station: String,
        duration_secs: i64,
        user_type: String,
    ) -> Self {
        // month() is always 1..=12 for a valid date
        let month = Month::from_number(start_time.month()).unwrap_or(Month::January);
        Self {
            weekday: Weekday::of(&start_time),
            hour: start_time.hour(),
            month,
            start_time,
            end_time,
            start_station,
            end_station,
            duration_secs,
            user_type,
            gender: None,
            birth_year: None,
        }
    }

    pub fn with_demographics(mut self, gender: Option<String>, birth_year: Option<i32>) -> Self {
        self.gender = gender;
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}
