//! Chronological view of neurological events across the record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AnalyticsConfig, PatientRecord};

/// Lane an event is drawn in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Seizure,
    Diagnostic,
    Medication,
    Treatment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    pub category: EventCategory,
    pub title: String,
    pub detail: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NeuroTimeline {
    pub events: Vec<TimelineEvent>,
    /// Marker for the most recent seizure.
    pub last_seizure: Option<NaiveDate>,
}

impl NeuroTimeline {
    /// Sorts events by date, undated ones last, keeping insertion order on ties.
    pub fn new(mut events: Vec<TimelineEvent>, last_seizure: Option<NaiveDate>) -> Self {
        events.sort_by_key(|event| (event.occurred_on.is_none(), event.occurred_on));
        Self {
            events,
            last_seizure,
        }
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn join_phrases(phrases: Vec<String>) -> Option<String> {
    if phrases.is_empty() {
        None
    } else {
        Some(phrases.join(" "))
    }
}

fn labelled(label: &str, value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(|text| format!("{label}: {text}."))
}

/// Collects seizures, EEGs, imaging studies, medication-level tests and
/// progress notes into one sorted timeline.
pub fn build_timeline(record: &PatientRecord, config: &AnalyticsConfig) -> NeuroTimeline {
    let mut events = Vec::new();

    for (index, seizure) in record.seizure_history().iter().enumerate() {
        let mut phrases = Vec::new();
        if let Some(seconds) = seizure.duration_seconds {
            phrases.push(format!("Duration: {seconds} seconds."));
        }
        if !seizure.triggers.is_empty() {
            phrases.push(format!("Triggers: {}.", seizure.triggers.join(", ")));
        }

        events.push(TimelineEvent {
            id: format!("seizure-{index}"),
            category: EventCategory::Seizure,
            title: format!("Seizure: {}", seizure.seizure_type),
            detail: join_phrases(phrases),
            occurred_on: seizure.date,
            duration_seconds: seizure.duration_seconds,
        });
    }

    for (index, eeg) in record.eeg_results().iter().enumerate() {
        let phrases = [
            labelled("Findings", eeg.findings.as_deref()),
            labelled("Severity", eeg.severity.as_deref()),
        ];

        events.push(TimelineEvent {
            id: format!("eeg-{index}"),
            category: EventCategory::Diagnostic,
            title: "EEG Test".to_string(),
            detail: join_phrases(phrases.into_iter().flatten().collect()),
            occurred_on: eeg.date,
            duration_seconds: None,
        });
    }

    for (index, study) in record.imaging_studies().iter().enumerate() {
        let phrases = [
            labelled("Findings", study.findings.as_deref()),
            labelled("Recommendation", study.recommendation.as_deref()),
        ];

        events.push(TimelineEvent {
            id: format!("imaging-{index}"),
            category: EventCategory::Diagnostic,
            title: format!(
                "Imaging: {}",
                study.study_type.as_deref().unwrap_or("Unspecified")
            ),
            detail: join_phrases(phrases.into_iter().flatten().collect()),
            occurred_on: study.date,
            duration_seconds: None,
        });
    }

    let keyword = config.medication_test_keyword.as_str();
    for (index, test) in record.diagnostic_tests.iter().enumerate() {
        if keyword.is_empty() || !test.test.contains(keyword) {
            continue;
        }

        let phrases = [
            labelled("Result", Some(test.result.as_str())),
            labelled("Reference", Some(test.reference_range.as_str())),
            Some(format!("Flagged: {}.", if test.flag { "Yes" } else { "No" })),
        ];

        events.push(TimelineEvent {
            id: format!("medication-test-{index}"),
            category: EventCategory::Medication,
            title: "Medication Level Test".to_string(),
            detail: join_phrases(phrases.into_iter().flatten().collect()),
            occurred_on: test.date,
            duration_seconds: None,
        });
    }

    for (index, note) in record.progress_notes().iter().enumerate() {
        events.push(TimelineEvent {
            id: format!("progress-note-{index}"),
            category: EventCategory::Treatment,
            title: "Treatment Progress".to_string(),
            detail: Some(note.note.clone()).filter(|text| !text.trim().is_empty()),
            occurred_on: note.date,
            duration_seconds: None,
        });
    }

    let last_seizure = record
        .seizure_history()
        .iter()
        .filter_map(|seizure| seizure.date)
        .max();

    NeuroTimeline::new(events, last_seizure)
}
