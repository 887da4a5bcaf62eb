//! Descriptive patient overview: demographics, counts and latest values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AnalyticsConfig, DiagnosticTest, HealthMetric, PatientRecord};

/// Seizure-count label shown next to the patient name. Descriptive only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverallStatus {
    #[default]
    Stable,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
}

impl OverallStatus {
    /// `Stable` while the seizure count stays below `attention_from`.
    pub fn from_seizure_count(count: usize, attention_from: usize) -> Self {
        if count < attention_from {
            OverallStatus::Stable
        } else {
            OverallStatus::NeedsAttention
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Stable => "Stable",
            OverallStatus::NeedsAttention => "Needs Attention",
        }
    }
}

/// Most recent reading of one health metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatestReading {
    pub metric: String,
    pub date: Option<NaiveDate>,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientOverview {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub patient_id: Option<String>,
    pub conditions: Vec<String>,
    pub seizure_count: usize,
    pub medication_count: usize,
    pub latest_test: Option<DiagnosticTest>,
    /// One entry per metric that has readings, in record order.
    pub latest_readings: Vec<LatestReading>,
    pub overall_status: OverallStatus,
}

/// Latest dated item, later position winning ties. Falls back to the last item
/// when nothing carries a date.
fn most_recent<T>(items: &[T], date: impl Fn(&T) -> Option<NaiveDate>) -> Option<&T> {
    items
        .iter()
        .filter(|item| date(*item).is_some())
        .max_by_key(|item| date(*item))
        .or(items.last())
}

fn latest_reading(metric: &HealthMetric) -> Option<LatestReading> {
    most_recent(&metric.readings, |reading| reading.date).map(|reading| LatestReading {
        metric: metric.name.clone(),
        date: reading.date,
        value: reading.value.clone(),
    })
}

pub fn patient_overview(record: &PatientRecord, config: &AnalyticsConfig) -> PatientOverview {
    let seizure_count = record.seizure_history().len();

    PatientOverview {
        name: record.name.clone(),
        age: record.age,
        gender: record.gender.clone(),
        patient_id: record.patient_id.clone(),
        conditions: record.medical_history.conditions.clone(),
        seizure_count,
        medication_count: record.medications.len(),
        latest_test: most_recent(&record.diagnostic_tests, |test| test.date).cloned(),
        latest_readings: record.metrics.iter().filter_map(latest_reading).collect(),
        overall_status: OverallStatus::from_seizure_count(
            seizure_count,
            config.attention_seizure_count,
        ),
    }
}
