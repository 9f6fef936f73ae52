//! Interactive exploration loop.
//!
//! [`Prompter`] re-asks until a token parses; [`Session`] drives one
//! exploration cycle (select, load, report, page raw rows) and the restart
//! loop. Input and output are generic so the loop can be scripted in tests.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::error::BikeshareError;
use crate::filter;
use crate::loader::{CityCatalog, Dataset};
use crate::output::{render_report, write_rows};
use crate::pager::{Cursor, PAGE_SIZE, next_page};
use crate::schema::{City, FilterSpec, Month, Selector, Weekday};
use crate::stats::compute_report;

const CITY_PROMPT: &str =
    "Enter the name of the city you want to explore:\n \t-Chicago\t-New York City\t-Washington\n  Your choice: ";
const MONTH_PROMPT: &str = "Enter the month you want to explore (January-June, or all): ";
const DAY_PROMPT: &str = "Enter the name of the day you want to explore (or all): ";
const RAW_PROMPT: &str = "Would you like to display 5 rows of data? Enter yes or no: ";
const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no.\n";

/// Reads answers line by line, writing prompts and error messages.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// `None` once input is exhausted.
    fn read_line(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until the answer parses as `T`. `None` when input ends first.
    pub fn ask<T>(&mut self, question: &str) -> io::Result<Option<T>>
    where
        T: FromStr<Err = BikeshareError>,
    {
        loop {
            let Some(answer) = self.read_line(question)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    warn!(error = %e, "Rejected selection");
                    writeln!(self.output, "Error! {e}. Please try again.\n")?;
                }
            }
        }
    }

    /// `true` only for a case-insensitive `yes`.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .read_line(question)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }
}

/// City plus filter chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub city: City,
    pub filter: FilterSpec,
}

/// Datasets loaded so far, by city. Datasets are immutable, so a cached one
/// serves every later cycle for the same city.
pub struct DatasetCache {
    catalog: CityCatalog,
    loaded: HashMap<City, Dataset>,
}

impl DatasetCache {
    pub fn new(catalog: CityCatalog) -> Self {
        Self {
            catalog,
            loaded: HashMap::new(),
        }
    }

    pub fn get(&mut self, city: City) -> crate::error::Result<&Dataset> {
        match self.loaded.entry(city) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(self.catalog.load(city)?)),
        }
    }

    pub fn is_cached(&self, city: City) -> bool {
        self.loaded.contains_key(&city)
    }
}

pub struct Session<R, W> {
    prompter: Prompter<R, W>,
    cache: DatasetCache,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(catalog: CityCatalog, input: R, output: W) -> Self {
        Self {
            prompter: Prompter::new(input, output),
            cache: DatasetCache::new(catalog),
        }
    }

    /// Runs exploration cycles until the operator declines to restart or
    /// input ends.
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.prompter.output(),
            "Hello! Let's explore some US bikeshare data!"
        )?;

        loop {
            let Some(selection) = self.get_filters()? else {
                break;
            };
            self.explore(&selection)?;

            if !self.prompter.confirm(RESTART_PROMPT)? {
                break;
            }
        }

        info!("Session finished");
        Ok(())
    }

    /// Collects city, month and day. `None` when input ends mid-way.
    pub fn get_filters(&mut self) -> Result<Option<Selection>> {
        let Some(city) = self.prompter.ask::<City>(CITY_PROMPT)? else {
            return Ok(None);
        };
        let Some(month) = self.prompter.ask::<Selector<Month>>(MONTH_PROMPT)? else {
            return Ok(None);
        };
        let Some(weekday) = self.prompter.ask::<Selector<Weekday>>(DAY_PROMPT)? else {
            return Ok(None);
        };

        let out = self.prompter.output();
        writeln!(
            out,
            "\nSelected attributes:\n\t City: {city} \n\t Month: {month} \n\t Day: {weekday}"
        )?;
        writeln!(out, "{}", "-".repeat(40))?;

        Ok(Some(Selection {
            city,
            filter: FilterSpec::new(month, weekday),
        }))
    }

    /// One exploration cycle. Load failures are reported to the operator and
    /// end the cycle without ending the session.
    #[tracing::instrument(skip(self))]
    pub fn explore(&mut self, selection: &Selection) -> Result<()> {
        writeln!(self.prompter.output(), "Loading Data..")?;
        let dataset = match self.cache.get(selection.city) {
            Ok(full) => filter::apply(full, &selection.filter),
            Err(e) => {
                error!(error = %e, "Failed to load city data");
                writeln!(self.prompter.output(), "Could not load data: {e}")?;
                return Ok(());
            }
        };

        let started = Instant::now();
        let report = compute_report(&dataset);
        let out = self.prompter.output();
        render_report(&report, out)?;
        writeln!(
            out,
            "\nThis took {:.6} seconds.",
            started.elapsed().as_secs_f64()
        )?;

        self.page_raw_rows(&dataset)
    }

    fn page_raw_rows(&mut self, dataset: &Dataset) -> Result<()> {
        let mut cursor = Cursor::new();
        while self.prompter.confirm(RAW_PROMPT)? {
            let page = next_page(dataset, &mut cursor);
            let out = self.prompter.output();
            if page.is_empty() {
                writeln!(out, "No more rows to display.")?;
                break;
            }
            write_rows(&page, dataset.columns(), out)?;
            if page.len() < PAGE_SIZE {
                writeln!(out, "End of data.")?;
            }
        }
        Ok(())
    }
}
