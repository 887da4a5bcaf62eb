//! General health metric series (heart rate, blood pressure, weight...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse::metric_value;
use crate::{AnalyticsConfig, HealthMetric};

/// Direction of the last two readings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetricTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSummary {
    pub name: String,
    pub dates: Vec<Option<NaiveDate>>,
    pub values: Vec<String>,
    /// Mean of the readings that parse as numbers, 0 when none do.
    pub average: f64,
    pub trend: MetricTrend,
}

fn metric_trend(values: &[f64], stable_ratio: f64) -> MetricTrend {
    let [.., previous, last] = values else {
        return MetricTrend::Stable;
    };

    let diff = last - previous;
    if diff.abs() < stable_ratio * previous {
        MetricTrend::Stable
    } else if diff > 0.0 {
        MetricTrend::Up
    } else {
        MetricTrend::Down
    }
}

/// One summary per metric, input order kept. Unparsable readings stay in
/// `values` but are left out of `average` and `trend`.
pub fn analyze_metrics(metrics: &[HealthMetric], config: &AnalyticsConfig) -> Vec<MetricSummary> {
    metrics
        .iter()
        .map(|metric| {
            let numeric: Vec<f64> = metric
                .readings
                .iter()
                .filter_map(|reading| {
                    let value = metric_value(&reading.value);
                    if value.is_none() {
                        tracing::debug!(metric = %metric.name, value = %reading.value, "reading is not numeric");
                    }
                    value
                })
                .collect();

            let average = if numeric.is_empty() {
                0.0
            } else {
                numeric.iter().sum::<f64>() / numeric.len() as f64
            };

            MetricSummary {
                name: metric.name.clone(),
                dates: metric.readings.iter().map(|reading| reading.date).collect(),
                values: metric
                    .readings
                    .iter()
                    .map(|reading| reading.value.clone())
                    .collect(),
                average,
                trend: metric_trend(&numeric, config.metric_stable_ratio),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricReading;

    fn metric(name: &str, values: &[&str]) -> HealthMetric {
        HealthMetric {
            name: name.to_string(),
            readings: values
                .iter()
                .map(|value| MetricReading {
                    date: None,
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    fn summarize(metric: HealthMetric) -> MetricSummary {
        analyze_metrics(&[metric], &AnalyticsConfig::default())
            .pop()
            .unwrap()
    }

    #[test]
    fn blood_pressure_uses_systolic() {
        let summary = summarize(metric("Blood Pressure", &["120/80", "130/85"]));

        assert_eq!(summary.average, 125.0);
        assert_eq!(summary.trend, MetricTrend::Up);
        assert_eq!(summary.values, ["120/80", "130/85"]);
    }

    #[test]
    fn small_change_is_stable() {
        let summary = summarize(metric("Heart Rate", &["70", "80", "82"]));
        assert_eq!(summary.trend, MetricTrend::Stable);
    }

    #[test]
    fn drop_is_down() {
        let summary = summarize(metric("Weight", &["80", "70"]));
        assert_eq!(summary.trend, MetricTrend::Down);
    }

    #[test]
    fn single_reading_is_stable() {
        let summary = summarize(metric("Weight", &["80"]));

        assert_eq!(summary.trend, MetricTrend::Stable);
        assert_eq!(summary.average, 80.0);
    }

    #[test]
    fn unparsable_readings_are_skipped() {
        let summary = summarize(metric("Glucose", &["90", "n/a", "110"]));

        assert_eq!(summary.average, 100.0);
        assert_eq!(summary.trend, MetricTrend::Up);
        assert_eq!(summary.values.len(), 3);
    }

    #[test]
    fn no_numeric_readings_average_zero() {
        let summary = summarize(metric("Mood", &["good", "better"]));

        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.trend, MetricTrend::Stable);
    }
}
