//! Analytics over a neurological patient record: seizure frequency, diagnostic
//! test statistics, a composite severity index and an event timeline.
//!
//! Everything here is a pure function of a [`PatientRecord`] snapshot. Missing or
//! malformed data content degrades to neutral values or [`Analysis::NoData`];
//! it never fails.

mod cognitive;
mod config;
mod diagnostic;
mod error;
mod heatmap;
mod metrics;
mod overview;
pub mod parse;
mod record;
mod seizure;
mod severity;
mod summary;
mod timeline;

use serde::{Deserialize, Serialize};

pub use cognitive::{cognitive_profile, CognitiveBand, CognitiveProfile, CognitiveScore};
pub use config::{AnalyticsConfig, SeverityBands, SeverityWeights};
pub use diagnostic::{
    process_diagnostic_tests, test_trend, trendable_tests, DiagnosticAnalysisResult, TestSummary,
    TestTrend, TrendPoint, NO_DIAGNOSTIC_TESTS,
};
pub use error::RecordError;
pub use heatmap::{trigger_heatmap, TriggerMonthRow, MONTH_LABELS};
pub use metrics::{analyze_metrics, MetricSummary, MetricTrend};
pub use parse::{RangePosition, ReferenceRange};
pub use record::{
    CognitiveAssessment, DiagnosticTest, EegResult, HealthMetric, ImagingStudy, Intervention,
    InterventionGroup, MedicalHistory, Medication, MetricReading, NetworkAnalysis, NeuralBiomarker,
    NeuralProfile, NeurologicalHistory, NeurotransmitterLevel, PatientRecord, ProgressNote, RecordAccessor,
    SeizureEvent, TreatmentPlan, TreatmentResponse,
};
pub use seizure::{
    analyze_seizure_frequency, MonthlyCount, SeizureAnalysisResult, Trend, NO_SEIZURE_HISTORY,
};
pub use severity::{compute_severity, SeverityBand, SeverityIndex, SeverityTerms};
pub use overview::{patient_overview, LatestReading, OverallStatus, PatientOverview};
pub use summary::{summarize, AnalyticsSummary};
pub use timeline::{build_timeline, EventCategory, NeuroTimeline, TimelineEvent};

/// Outcome of an analysis: a report, or an in-band explanation of why there is none.
///
/// Serializes as the report itself or as `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Analysis<T> {
    Report(T),
    NoData { message: String },
}

impl<T> Analysis<T> {
    pub fn no_data(message: impl Into<String>) -> Self {
        Analysis::NoData {
            message: message.into(),
        }
    }

    pub fn report(&self) -> Option<&T> {
        match self {
            Analysis::Report(report) => Some(report),
            Analysis::NoData { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<T> {
        match self {
            Analysis::Report(report) => Some(report),
            Analysis::NoData { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Analysis::Report(_) => None,
            Analysis::NoData { message } => Some(message),
        }
    }
}
