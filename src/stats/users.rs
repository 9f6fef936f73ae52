//! User-type, gender and birth-year breakdowns.

use crate::error::{BikeshareError, Result};
use crate::loader::Dataset;
use crate::stats::types::{Availability, BirthYearStats, LabelCount, UserStats};
use crate::stats::utility::{mode, value_counts};

/// User types always reported, in this order, even with a zero count.
pub static REPORTED_USER_TYPES: [&str; 2] = ["Subscriber", "Customer"];

const BIRTH_YEAR_GROUP: &str = "birth year insights";

/// Counts per user type. Subscriber and Customer come first; any other
/// non-blank label follows in first-seen order.
pub fn user_type_counts(dataset: &Dataset) -> Vec<LabelCount> {
    let observed = value_counts(
        dataset
            .iter()
            .map(|t| t.user_type.as_str())
            .filter(|label| !label.is_empty()),
    );

    let mut counts: Vec<LabelCount> = REPORTED_USER_TYPES
        .iter()
        .map(|&label| LabelCount::new(label, 0))
        .collect();

    for (label, count) in observed {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(existing) => existing.count = count,
            None => counts.push(LabelCount::new(label, count)),
        }
    }
    counts
}

/// Counts per gender, largest first, or `Absent` when the file has no gender column.
pub fn gender_counts(dataset: &Dataset) -> Availability<Vec<LabelCount>> {
    if !dataset.columns().gender {
        return Availability::Absent;
    }

    let mut counts: Vec<LabelCount> =
        value_counts(dataset.iter().filter_map(|t| t.gender.as_deref()))
            .into_iter()
            .map(|(label, count)| LabelCount::new(label, count))
            .collect();
    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Availability::Present(counts)
}

/// Earliest, most recent and most common birth year, or `Absent` when the
/// file has no birth-year column.
pub fn birth_year_stats(dataset: &Dataset) -> Availability<Result<BirthYearStats>> {
    if !dataset.columns().birth_year {
        return Availability::Absent;
    }

    let years = || dataset.iter().filter_map(|t| t.birth_year);
    let stats = match (years().min(), years().max(), mode(years())) {
        (Some(earliest), Some(most_recent), Some(most_common)) => Ok(BirthYearStats {
            earliest,
            most_recent,
            most_common,
        }),
        _ => Err(BikeshareError::NoData(BIRTH_YEAR_GROUP)),
    };
    Availability::Present(stats)
}

#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn user_stats(dataset: &Dataset) -> UserStats {
    UserStats {
        user_types: user_type_counts(dataset),
        genders: gender_counts(dataset),
        birth_years: birth_year_stats(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{dataset, dataset_with_demographics, trip};

    fn riders() -> Dataset {
        dataset_with_demographics(vec![
            trip("2017-01-02", 8, "A", "B", 60, "Customer")
                .with_demographics(Some("Female".into()), Some(1990)),
            trip("2017-01-02", 9, "A", "B", 60, "Subscriber")
                .with_demographics(Some("Male".into()), Some(1985)),
            trip("2017-01-02", 9, "A", "B", 60, "Subscriber")
                .with_demographics(Some("Male".into()), Some(1990)),
            trip("2017-01-02", 9, "A", "B", 60, "Dependent")
                .with_demographics(None, Some(2001)),
            trip("2017-01-02", 9, "A", "B", 60, "").with_demographics(None, None),
        ])
    }

    #[test]
    fn test_user_type_counts() {
        let counts = user_type_counts(&riders());
        assert_eq!(
            counts,
            vec![
                LabelCount::new("Subscriber", 2),
                LabelCount::new("Customer", 1),
                LabelCount::new("Dependent", 1),
            ]
        );
    }

    #[test]
    fn test_user_type_counts_empty_reports_zeroes() {
        let counts = user_type_counts(&dataset(vec![]));
        assert_eq!(
            counts,
            vec![
                LabelCount::new("Subscriber", 0),
                LabelCount::new("Customer", 0),
            ]
        );
    }

    #[test]
    fn test_gender_counts_sorted_by_count() {
        let genders = gender_counts(&riders());
        assert_eq!(
            genders,
            Availability::Present(vec![
                LabelCount::new("Male", 2),
                LabelCount::new("Female", 1),
            ])
        );
    }

    #[test]
    fn test_absent_columns_are_reported_absent() {
        let data = dataset(vec![trip("2017-01-02", 8, "A", "B", 60, "Customer")]);
        assert_eq!(gender_counts(&data), Availability::Absent);
        assert!(!birth_year_stats(&data).is_present());
    }

    #[test]
    fn test_birth_year_stats() {
        let stats = birth_year_stats(&riders());
        let stats = stats.present().unwrap().as_ref().unwrap();
        assert_eq!(stats.earliest, 1985);
        assert_eq!(stats.most_recent, 2001);
        assert_eq!(stats.most_common, 1990);
    }

    #[test]
    fn test_birth_year_column_present_but_empty_view() {
        let stats = birth_year_stats(&dataset_with_demographics(vec![]));
        match stats {
            Availability::Present(Err(e)) => assert!(e.is_no_data()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
