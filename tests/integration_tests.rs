use bikeshare_explorer::output::report_to_json;
use bikeshare_explorer::schema::{City, Month, Weekday};
use bikeshare_explorer::stats::{Availability, LabelCount, StationPair};
use bikeshare_explorer::{BikeshareError, CityCatalog, Cursor, compute_report, load_filtered, next_page};

fn catalog() -> CityCatalog {
    CityCatalog::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

const CITY_TOKENS: [&str; 3] = ["chicago", "new york city", "washington"];
const MONTH_TOKENS: [&str; 7] = ["all", "january", "february", "march", "april", "may", "june"];
const DAY_TOKENS: [&str; 8] = [
    "all", "sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
];

#[test]
fn test_chicago_january_end_to_end() {
    let dataset = load_filtered(&catalog(), "chicago", "january", "all").expect("load chicago");
    assert_eq!(dataset.city(), City::Chicago);
    assert_eq!(dataset.len(), 3);

    let report = compute_report(&dataset);

    let time = report.time.as_ref().unwrap();
    assert_eq!(time.most_common_month, Month::January);
    assert_eq!(time.most_common_weekday, Weekday::Tuesday);
    // 9, 17 and 8 each appear once; 9 comes first
    assert_eq!(time.most_common_hour, 9);

    let stations = report.stations.as_ref().unwrap();
    assert_eq!(stations.most_common_start, "Canal St & Adams St");
    assert_eq!(stations.most_common_end, "Clark St & Elm St");
    assert_eq!(
        stations.most_common_trip,
        StationPair {
            start: "Canal St & Adams St".to_string(),
            end: "Clark St & Elm St".to_string(),
        }
    );

    let durations = report.durations.as_ref().unwrap();
    assert_eq!(durations.total_secs, 2276);
    let mean_secs = *durations.mean_secs.as_ref().unwrap();
    assert!((mean_secs - 2276.0 / 3.0).abs() < 1e-9);

    assert_eq!(
        report.users.user_types,
        vec![LabelCount::new("Subscriber", 2), LabelCount::new("Customer", 1)]
    );
    assert_eq!(
        report.users.genders,
        Availability::Present(vec![LabelCount::new("Male", 1), LabelCount::new("Female", 1)])
    );
    let years = report.users.birth_years.present().unwrap().as_ref().unwrap();
    assert_eq!(years.earliest, 1985);
    assert_eq!(years.most_recent, 1992);
    assert_eq!(years.most_common, 1992);
}

#[test]
fn test_every_selection_respects_its_filter() {
    let catalog = catalog();
    for city in CITY_TOKENS {
        let full = load_filtered(&catalog, city, "all", "all").unwrap();
        for month in MONTH_TOKENS {
            for day in DAY_TOKENS {
                let dataset = load_filtered(&catalog, city, month, day).unwrap();
                let wanted_month: Option<Month> = (month != "all").then(|| month.parse().unwrap());
                let wanted_day: Option<Weekday> = (day != "all").then(|| day.parse().unwrap());

                for trip in dataset.iter() {
                    if let Some(m) = wanted_month {
                        assert_eq!(trip.month(), m, "{city}/{month}/{day}");
                    }
                    if let Some(d) = wanted_day {
                        assert_eq!(trip.weekday(), d, "{city}/{month}/{day}");
                    }
                }

                let expected = full
                    .iter()
                    .filter(|t| wanted_month.is_none_or(|m| t.month() == m))
                    .filter(|t| wanted_day.is_none_or(|d| t.weekday() == d))
                    .count();
                assert_eq!(dataset.len(), expected, "{city}/{month}/{day}");
            }
        }
    }
}

#[test]
fn test_washington_has_no_demographics() {
    let dataset = load_filtered(&catalog(), "Washington", "all", "all").unwrap();
    assert!(!dataset.columns().gender);
    assert!(!dataset.columns().birth_year);

    let report = compute_report(&dataset);
    assert_eq!(report.users.genders, Availability::Absent);
    assert!(!report.users.birth_years.is_present());
    // decimal durations are rounded to whole seconds
    assert_eq!(report.durations.as_ref().unwrap().total_secs, 489 + 492 + 601);

    let json = report_to_json(&report).unwrap();
    assert_eq!(json["users"]["genders"]["unavailable"], "no gender data");
}

#[test]
fn test_blank_user_type_is_not_counted() {
    let dataset = load_filtered(&catalog(), "new york city", "all", "all").unwrap();
    let report = compute_report(&dataset);
    assert_eq!(
        report.users.user_types,
        vec![LabelCount::new("Subscriber", 2), LabelCount::new("Customer", 1)]
    );
    let stations = report.stations.unwrap();
    assert_eq!(stations.most_common_start, "Lexington Ave & E 63 St");
}

#[test]
fn test_empty_selection_reports_no_data() {
    // no Chicago trips in April
    let dataset = load_filtered(&catalog(), "chicago", "april", "all").unwrap();
    assert!(dataset.is_empty());

    let report = compute_report(&dataset);
    assert!(matches!(report.time, Err(BikeshareError::NoData(_))));
    let durations = report.durations.as_ref().unwrap();
    assert_eq!(durations.total_secs, 0);
    assert!(matches!(durations.mean_secs, Err(BikeshareError::NoData(_))));
    assert_eq!(
        report.users.user_types,
        vec![LabelCount::new("Subscriber", 0), LabelCount::new("Customer", 0)]
    );
}

#[test]
fn test_pagination_over_seven_rows() {
    let dataset = load_filtered(&catalog(), "chicago", "all", "all").unwrap();
    assert_eq!(dataset.len(), 7);

    let mut cursor = Cursor::new();
    let first = next_page(&dataset, &mut cursor);
    let second = next_page(&dataset, &mut cursor);
    let third = next_page(&dataset, &mut cursor);
    assert_eq!((first.len(), second.len(), third.len()), (5, 2, 0));
    assert_eq!(second[1].duration_secs, 1200);
}

#[test]
fn test_identical_inputs_give_identical_reports() {
    let catalog = catalog();
    let run = || {
        let dataset = load_filtered(&catalog, "chicago", "all", "tuesday").unwrap();
        serde_json::to_string(&report_to_json(&compute_report(&dataset)).unwrap()).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_invalid_tokens_are_rejected() {
    let catalog = catalog();
    for (city, month, day) in [
        ("boston", "all", "all"),
        ("chicago", "july", "all"),
        ("chicago", "all", "thursday:"),
    ] {
        let err = load_filtered(&catalog, city, month, day).unwrap_err();
        assert!(matches!(err, BikeshareError::InvalidSelector { .. }), "{city}/{month}/{day}");
    }
}
