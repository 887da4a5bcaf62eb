//! One-pass summary of a patient record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    analyze_metrics, analyze_seizure_frequency, build_timeline, cognitive_profile,
    compute_severity, patient_overview, process_diagnostic_tests, test_trend, trendable_tests,
    trigger_heatmap, Analysis, AnalyticsConfig, CognitiveProfile, DiagnosticAnalysisResult,
    InterventionGroup, MetricSummary, NeuroTimeline, PatientOverview, PatientRecord,
    SeizureAnalysisResult, SeverityIndex, TestTrend, TriggerMonthRow,
};

/// Everything the presentation layer needs, computed from one record snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    pub generated_at: DateTime<Utc>,
    pub patient: PatientOverview,
    pub seizures: Analysis<SeizureAnalysisResult>,
    pub diagnostics: Analysis<DiagnosticAnalysisResult>,
    pub test_trends: Vec<TestTrend>,
    pub severity: SeverityIndex,
    pub trigger_heatmap: Vec<TriggerMonthRow>,
    pub timeline: NeuroTimeline,
    pub metrics: Vec<MetricSummary>,
    pub cognitive: Option<CognitiveProfile>,
    pub interventions: Vec<InterventionGroup>,
}

pub fn summarize(record: &PatientRecord, config: &AnalyticsConfig) -> AnalyticsSummary {
    let tests = &record.diagnostic_tests;
    let test_trends = trendable_tests(tests)
        .iter()
        .filter_map(|name| test_trend(tests, name))
        .collect();

    AnalyticsSummary {
        generated_at: Utc::now(),
        patient: patient_overview(record, config),
        seizures: analyze_seizure_frequency(record.seizure_history()),
        diagnostics: process_diagnostic_tests(tests),
        test_trends,
        severity: compute_severity(&record.neural_profile, config),
        trigger_heatmap: trigger_heatmap(record.seizure_history()),
        timeline: build_timeline(record, config),
        metrics: analyze_metrics(&record.metrics, config),
        cognitive: cognitive_profile(record.cognitive_assessment()),
        interventions: record.treatment_plan.interventions_by_type(),
    }
}
