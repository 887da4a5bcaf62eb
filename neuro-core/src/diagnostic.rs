//! Diagnostic test counts, flag rates and numeric trends.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parse::{leading_number, round1, RangePosition, ReferenceRange};
use crate::{Analysis, DiagnosticTest};

pub const NO_DIAGNOSTIC_TESTS: &str = "No diagnostic tests available";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticAnalysisResult {
    pub total_tests: usize,
    pub flagged_percentage: f64,
    /// Distinct test names, oldest first appearance first.
    pub test_types: Vec<String>,
    /// Keyed by test name, in the same order as `test_types`.
    pub test_summaries: IndexMap<String, TestSummary>,
    pub latest_test_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestSummary {
    pub count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub flagged_count: usize,
    /// Flag of the most recent result in the series.
    pub latest_flagged: bool,
}

/// One numeric result of a test series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: Option<NaiveDate>,
    pub value: f64,
    pub flag: bool,
}

/// Numeric results of one test with reference-range breaches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestTrend {
    pub test: String,
    pub points: Vec<TrendPoint>,
    pub reference_range: Option<ReferenceRange>,
    pub below_range: Vec<TrendPoint>,
    pub above_range: Vec<TrendPoint>,
}

/// Tests sorted by date, undated ones last. Sorting is stable.
fn chronological(tests: &[DiagnosticTest]) -> Vec<&DiagnosticTest> {
    let mut ordered: Vec<&DiagnosticTest> = tests.iter().collect();
    ordered.sort_by_key(|test| (test.date.is_none(), test.date));
    ordered
}

fn group_by_name<'a>(ordered: &[&'a DiagnosticTest]) -> Vec<(&'a str, Vec<&'a DiagnosticTest>)> {
    let mut groups: Vec<(&str, Vec<&DiagnosticTest>)> = Vec::new();
    for &test in ordered {
        match groups.iter_mut().find(|(name, _)| *name == test.test) {
            Some((_, members)) => members.push(test),
            None => groups.push((test.test.as_str(), vec![test])),
        }
    }
    groups
}

/// Counts and flag statistics per test name.
pub fn process_diagnostic_tests(tests: &[DiagnosticTest]) -> Analysis<DiagnosticAnalysisResult> {
    if tests.is_empty() {
        return Analysis::no_data(NO_DIAGNOSTIC_TESTS);
    }

    let ordered = chronological(tests);
    let groups = group_by_name(&ordered);

    let flagged = tests.iter().filter(|test| test.flag).count();
    let flagged_percentage = round1(flagged as f64 / tests.len() as f64 * 100.0);

    let mut test_types = Vec::with_capacity(groups.len());
    let mut test_summaries = IndexMap::with_capacity(groups.len());

    for (name, members) in &groups {
        let dates: Vec<NaiveDate> = members.iter().filter_map(|test| test.date).collect();
        let latest = members
            .iter()
            .rev()
            .find(|test| test.date.is_some())
            .or(members.last());

        test_types.push(name.to_string());
        test_summaries.insert(
            name.to_string(),
            TestSummary {
                count: members.len(),
                first_date: dates.iter().min().copied(),
                last_date: dates.iter().max().copied(),
                flagged_count: members.iter().filter(|test| test.flag).count(),
                latest_flagged: latest.map(|test| test.flag).unwrap_or(false),
            },
        );
    }

    Analysis::Report(DiagnosticAnalysisResult {
        total_tests: tests.len(),
        flagged_percentage,
        test_types,
        test_summaries,
        latest_test_date: tests.iter().filter_map(|test| test.date).max(),
    })
}

/// Test names with more than one result, at least one of them containing a digit.
pub fn trendable_tests(tests: &[DiagnosticTest]) -> Vec<String> {
    let ordered = chronological(tests);
    group_by_name(&ordered)
        .into_iter()
        .filter(|(_, members)| {
            members.len() > 1
                && members
                    .iter()
                    .any(|test| test.result.chars().any(|c| c.is_ascii_digit()))
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Numeric series for one test name. Non-numeric results are left out; `None`
/// when nothing numeric remains.
///
/// The reference range comes from the earliest numeric result. When it cannot be
/// parsed no breach lists are produced.
pub fn test_trend(tests: &[DiagnosticTest], name: &str) -> Option<TestTrend> {
    let mut numeric: Vec<(&DiagnosticTest, TrendPoint)> = Vec::new();

    for test in chronological(tests).into_iter().filter(|test| test.test == name) {
        match leading_number(&test.result) {
            Some(value) => numeric.push((
                test,
                TrendPoint {
                    date: test.date,
                    value,
                    flag: test.flag,
                },
            )),
            None => tracing::debug!(test = name, result = %test.result, "non-numeric result left out of trend"),
        }
    }

    let (earliest, _) = numeric.first()?;
    let reference_range = ReferenceRange::parse(&earliest.reference_range);
    if reference_range.is_none() {
        tracing::debug!(test = name, range = %earliest.reference_range, "no usable reference range");
    }

    let points: Vec<TrendPoint> = numeric.into_iter().map(|(_, point)| point).collect();
    let (below_range, above_range) = match reference_range {
        Some(range) => (
            breaches(&points, range, RangePosition::Below),
            breaches(&points, range, RangePosition::Above),
        ),
        None => (Vec::new(), Vec::new()),
    };

    Some(TestTrend {
        test: name.to_string(),
        points,
        reference_range,
        below_range,
        above_range,
    })
}

fn breaches(points: &[TrendPoint], range: ReferenceRange, side: RangePosition) -> Vec<TrendPoint> {
    points
        .iter()
        .filter(|point| range.position(point.value) == side)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    fn lab(on: &str, name: &str, result: &str, range: &str, flag: bool) -> DiagnosticTest {
        DiagnosticTest {
            date: Some(date(on)),
            test: name.to_string(),
            result: result.to_string(),
            reference_range: range.to_string(),
            flag,
        }
    }

    fn aed_levels() -> Vec<DiagnosticTest> {
        vec![
            lab("2023-03-10", "AED Level", "14.2 µg/mL", "4.0-12.0 µg/mL", true),
            lab("2023-01-05", "AED Level", "8.5 µg/mL", "4.0-12.0 µg/mL", false),
        ]
    }

    #[test]
    fn empty_tests_report_no_data() {
        assert_eq!(
            process_diagnostic_tests(&[]),
            Analysis::no_data(NO_DIAGNOSTIC_TESTS)
        );
    }

    #[test]
    fn aed_levels_are_half_flagged() {
        let result = process_diagnostic_tests(&aed_levels()).into_report().unwrap();

        assert_eq!(result.total_tests, 2);
        assert_eq!(result.flagged_percentage, 50.0);
        assert_eq!(result.test_types, vec!["AED Level".to_string()]);

        let summary = &result.test_summaries["AED Level"];
        assert_eq!(summary.count, 2);
        assert_eq!(summary.flagged_count, 1);
        assert_eq!(summary.first_date, Some(date("2023-01-05")));
        assert_eq!(summary.last_date, Some(date("2023-03-10")));
        assert!(summary.latest_flagged);
        assert_eq!(result.latest_test_date, Some(date("2023-03-10")));
    }

    #[test]
    fn all_flagged_is_one_hundred_percent() {
        let tests = vec![
            lab("2023-01-01", "CBC", "Low", "N/A", true),
            lab("2023-02-01", "EEG", "Abnormal", "N/A", true),
        ];
        let result = process_diagnostic_tests(&tests).into_report().unwrap();
        assert_eq!(result.flagged_percentage, 100.0);
    }

    #[test]
    fn flagged_percentage_is_rounded() {
        let tests = vec![
            lab("2023-01-01", "CBC", "Normal", "N/A", true),
            lab("2023-02-01", "CBC", "Normal", "N/A", false),
            lab("2023-03-01", "CBC", "Normal", "N/A", false),
        ];
        let result = process_diagnostic_tests(&tests).into_report().unwrap();
        assert_eq!(result.flagged_percentage, 33.3);
    }

    #[test]
    fn test_types_follow_chronological_first_appearance() {
        let tests = vec![
            lab("2023-05-01", "MRI", "Normal", "N/A", false),
            lab("2023-01-01", "AED Level", "9 µg/mL", "4-12 µg/mL", false),
            lab("2023-03-01", "MRI", "Normal", "N/A", false),
            lab("2023-02-01", "aed level", "9 µg/mL", "4-12 µg/mL", false),
        ];
        let result = process_diagnostic_tests(&tests).into_report().unwrap();

        assert_eq!(result.test_types, ["AED Level", "aed level", "MRI"]);
        assert_eq!(result.test_summaries["MRI"].count, 2);
        assert_eq!(result.test_summaries["MRI"].first_date, Some(date("2023-03-01")));
    }

    #[test]
    fn summaries_keep_first_appearance_order() {
        let tests = vec![
            lab("2023-02-01", "AED Level", "9 µg/mL", "4-12 µg/mL", false),
            lab("2023-01-01", "Zinc", "80 µg/dL", "60-120 µg/dL", false),
        ];
        let result = process_diagnostic_tests(&tests).into_report().unwrap();

        let keys: Vec<&str> = result.test_summaries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Zinc", "AED Level"]);
        assert_eq!(result.test_types, keys);

        let json = serde_json::to_string(&result.test_summaries).unwrap();
        assert!(json.find("Zinc").unwrap() < json.find("AED Level").unwrap());
    }

    #[test]
    fn one_flag_in_sixteen_rounds_half_to_even() {
        let mut tests: Vec<DiagnosticTest> = (1..=16)
            .map(|day| lab(&format!("2023-01-{day:02}"), "CBC", "Normal", "N/A", false))
            .collect();
        tests[0].flag = true;

        let result = process_diagnostic_tests(&tests).into_report().unwrap();
        assert_eq!(result.flagged_percentage, 6.2);
    }

    #[test]
    fn trend_reports_out_of_range_values() {
        let mut tests = aed_levels();
        tests.push(lab("2023-06-01", "AED Level", "3.1 µg/mL", "4.0-12.0 µg/mL", true));
        tests.push(lab("2023-07-01", "AED Level", "Pending", "4.0-12.0 µg/mL", false));

        let trend = test_trend(&tests, "AED Level").unwrap();

        let values: Vec<f64> = trend.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![8.5, 14.2, 3.1]);
        assert_eq!(trend.reference_range, Some(ReferenceRange { min: 4.0, max: 12.0 }));
        assert_eq!(trend.above_range.len(), 1);
        assert_eq!(trend.above_range[0].value, 14.2);
        assert_eq!(trend.below_range.len(), 1);
        assert_eq!(trend.below_range[0].date, Some(date("2023-06-01")));
    }

    #[test]
    fn unparsable_range_skips_breach_detection() {
        let tests = vec![
            lab("2023-01-01", "Sodium", "150 mmol/L", "N/A", true),
            lab("2023-02-01", "Sodium", "120 mmol/L", "N/A", true),
        ];

        let trend = test_trend(&tests, "Sodium").unwrap();

        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.reference_range, None);
        assert!(trend.below_range.is_empty());
        assert!(trend.above_range.is_empty());
    }

    #[test]
    fn qualitative_series_has_no_trend() {
        let tests = vec![
            lab("2023-01-01", "EEG", "Normal", "N/A", false),
            lab("2023-02-01", "EEG", "Abnormal", "N/A", true),
        ];
        assert_eq!(test_trend(&tests, "EEG"), None);
        assert_eq!(test_trend(&tests, "Missing"), None);
    }

    #[test]
    fn trendable_tests_need_repeats_and_digits() {
        let tests = vec![
            lab("2023-01-01", "AED Level", "8.5 µg/mL", "4-12", false),
            lab("2023-02-01", "AED Level", "9.0 µg/mL", "4-12", false),
            lab("2023-01-01", "EEG", "Normal", "N/A", false),
            lab("2023-02-01", "EEG", "Normal", "N/A", false),
            lab("2023-01-01", "Glucose", "90 mg/dL", "70-100", false),
        ];
        assert_eq!(trendable_tests(&tests), vec!["AED Level".to_string()]);
    }

    fn arb_tests() -> impl Strategy<Value = Vec<DiagnosticTest>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["AED Level", "Glucose", "EEG"]),
                prop::option::of(0u32..30),
                any::<bool>(),
            ),
            1..30,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (name, value, flag))| DiagnosticTest {
                    date: Some(date("2022-01-01") + chrono::Duration::days(index as i64 * 3)),
                    test: name.to_string(),
                    result: value.map_or_else(|| "Pending".to_string(), |v| format!("{v} units")),
                    reference_range: "4-12 units".to_string(),
                    flag,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn shuffling_tests_changes_nothing(
            tests in arb_tests().prop_flat_map(|tests| {
                let shuffled = Just(tests.clone()).prop_shuffle();
                (Just(tests), shuffled)
            })
        ) {
            let (original, shuffled) = tests;
            let expected = process_diagnostic_tests(&original).into_report().unwrap();
            let actual = process_diagnostic_tests(&shuffled).into_report().unwrap();

            prop_assert_eq!(&actual, &expected);
            prop_assert!(actual.test_summaries.keys().eq(expected.test_summaries.keys()));
            prop_assert!(actual.test_summaries.keys().eq(actual.test_types.iter()));

            for name in ["AED Level", "Glucose", "EEG"] {
                prop_assert_eq!(test_trend(&shuffled, name), test_trend(&original, name));
            }
            prop_assert_eq!(trendable_tests(&shuffled), trendable_tests(&original));
        }
    }
}
