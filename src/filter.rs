//! Month / weekday filtering over a [`Dataset`].

use tracing::debug;

use crate::loader::Dataset;
use crate::schema::{FilterSpec, TripRecord};

/// Returns `true` when `record` passes both predicates of `spec`.
pub fn matches(record: &TripRecord, spec: &FilterSpec) -> bool {
    spec.month.accepts(&record.month()) && spec.weekday.accepts(&record.weekday())
}

/// Builds a new view holding only the rows that pass `spec`.
///
/// The source dataset is left untouched and row order is preserved. An empty
/// result is valid.
#[tracing::instrument(skip(dataset), fields(city = %dataset.city(), rows = dataset.len()))]
pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    let rows: Vec<usize> = dataset
        .row_indices()
        .iter()
        .zip(dataset.iter())
        .filter(|(_, record)| matches(record, spec))
        .map(|(&row, _)| row)
        .collect();

    debug!(kept = rows.len(), "Filter applied");
    dataset.view(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Month, Selector, Weekday};
    use crate::test_helpers::{dataset, trip};

    fn sample() -> Dataset {
        dataset(vec![
            trip("2017-01-01", 9, "A", "B", 100, "Subscriber"), // Sunday
            trip("2017-01-02", 10, "B", "C", 200, "Customer"),  // Monday
            trip("2017-02-05", 11, "A", "C", 300, "Subscriber"), // Sunday
            trip("2017-06-01", 12, "C", "A", 400, "Subscriber"), // Thursday
        ])
    }

    #[test]
    fn test_all_all_is_pass_through() {
        let data = sample();
        let filtered = apply(&data, &FilterSpec::default());
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_month_filter() {
        let data = sample();
        let spec = FilterSpec::new(Selector::Only(Month::January), Selector::All);
        let filtered = apply(&data, &spec);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|t| t.month() == Month::January));
    }

    #[test]
    fn test_weekday_filter() {
        let data = sample();
        let spec = FilterSpec::new(Selector::All, Selector::Only(Weekday::Sunday));
        let filtered = apply(&data, &spec);
        let durations: Vec<i64> = filtered.iter().map(|t| t.duration_secs).collect();
        assert_eq!(durations, vec![100, 300]);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let data = sample();
        let spec = FilterSpec::new(
            Selector::Only(Month::February),
            Selector::Only(Weekday::Sunday),
        );
        let filtered = apply(&data, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get(0).unwrap().duration_secs, 300);
    }

    #[test]
    fn test_uncovered_month_yields_empty_view() {
        let data = sample();
        let spec = FilterSpec::new(Selector::Only(Month::July), Selector::All);
        let filtered = apply(&data, &spec);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let data = sample();
        let spec = FilterSpec::new(Selector::Only(Month::January), Selector::All);
        let once = apply(&data, &spec);
        let twice = apply(&once, &spec);
        assert_eq!(once.row_indices(), twice.row_indices());
    }

    #[test]
    fn test_source_is_not_mutated() {
        let data = sample();
        let spec = FilterSpec::new(Selector::Only(Month::June), Selector::All);
        let filtered = apply(&data, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(data.len(), 4);
        assert_eq!(data.get(3), filtered.get(0));
    }
}
