//! Patient record JSON to [`PatientRecord`] converter.
//!
//! Documents come from hand-edited files and older exports, so field coercion is
//! lenient: numbers may arrive as strings, dates as timestamps, trigger lists as a
//! single string. Only a section of the wrong container type is an error.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use neuro_core::{
    summarize, AnalyticsConfig, AnalyticsSummary, CognitiveAssessment, DiagnosticTest, EegResult,
    HealthMetric, ImagingStudy, Intervention, MedicalHistory, Medication, MetricReading,
    NetworkAnalysis, NeuralBiomarker, NeuralProfile, NeurologicalHistory, NeurotransmitterLevel,
    PatientRecord, ProgressNote, RecordAccessor, RecordError, SeizureEvent, TreatmentPlan,
    TreatmentResponse,
};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Parse a patient record from a JSON string.
pub fn load_record_str(record_json: &str) -> Result<PatientRecord, RecordError> {
    let value: Value =
        serde_json::from_str(record_json).map_err(|err| RecordError::Parse(err.to_string()))?;
    load_record_value(&value)
}

/// Parse a patient record from a file on disk.
pub fn load_record_path(path: impl AsRef<Path>) -> Result<PatientRecord, RecordError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_record_str(&data)
}

/// Convert a `serde_json::Value` into a patient record.
pub fn load_record_value(record: &Value) -> Result<PatientRecord, RecordError> {
    let root = record.as_object().ok_or(RecordError::Malformed {
        section: "record",
        expected: "an object",
    })?;

    Ok(PatientRecord {
        name: text(root, "name"),
        age: number(root, "age")
            .filter(|age| *age >= 0.0)
            .map(|age| age as u32),
        gender: text(root, "gender"),
        patient_id: text(root, "patient_id"),
        medical_history: medical_history(root)?,
        medications: list(root, "medications", "medications")?
            .into_iter()
            .map(medication)
            .collect(),
        treatment_plan: treatment_plan(root)?,
        diagnostic_tests: list(root, "diagnostic_tests", "diagnostic_tests")?
            .into_iter()
            .map(diagnostic_test)
            .collect(),
        neural_profile: neural_profile(root)?,
        metrics: list(root, "metrics", "metrics")?
            .into_iter()
            .map(health_metric)
            .collect::<Result<Vec<_>, RecordError>>()?,
    })
}

/// Load a record and run the full analytics pass on it.
pub fn summarize_record_str(
    record_json: &str,
    config: &AnalyticsConfig,
) -> Result<AnalyticsSummary, RecordError> {
    let record = load_record_str(record_json)?;
    Ok(summarize(&record, config))
}

/// Same as [`summarize_record_str`] for an already parsed document.
pub fn summarize_record_value(
    record: &Value,
    config: &AnalyticsConfig,
) -> Result<AnalyticsSummary, RecordError> {
    let record = load_record_value(record)?;
    Ok(summarize(&record, config))
}

/// Reads the record from a JSON file each time it is fetched.
#[derive(Debug, Clone)]
pub struct JsonFileAccessor {
    path: PathBuf,
}

impl JsonFileAccessor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordAccessor for JsonFileAccessor {
    fn fetch(&self) -> Result<PatientRecord, RecordError> {
        load_record_path(&self.path)
    }
}

fn medical_history(root: &Object) -> Result<MedicalHistory, RecordError> {
    let Some(history) = section(root, "medical_history", "medical_history")? else {
        return Ok(MedicalHistory::default());
    };

    let neurological_history = match section(
        history,
        "neurological_history",
        "medical_history.neurological_history",
    )? {
        Some(neuro) => NeurologicalHistory {
            seizure_history: list(
                neuro,
                "seizure_history",
                "medical_history.neurological_history.seizure_history",
            )?
            .into_iter()
            .map(seizure_event)
            .collect(),
            eeg_results: list(
                neuro,
                "eeg_results",
                "medical_history.neurological_history.eeg_results",
            )?
            .into_iter()
            .map(eeg_result)
            .collect(),
            imaging_studies: list(
                neuro,
                "imaging_studies",
                "medical_history.neurological_history.imaging_studies",
            )?
            .into_iter()
            .map(imaging_study)
            .collect(),
            cognitive_assessment: section(
                neuro,
                "cognitive_assessment",
                "medical_history.neurological_history.cognitive_assessment",
            )?
            .map(cognitive_assessment),
        },
        None => NeurologicalHistory::default(),
    };

    Ok(MedicalHistory {
        conditions: string_list(history, "conditions", "medical_history.conditions")?,
        allergies: string_list(history, "allergies", "medical_history.allergies")?,
        neurological_history,
    })
}

fn seizure_event(entry: &Object) -> SeizureEvent {
    SeizureEvent {
        date: date(entry, "date"),
        seizure_type: text(entry, "type").unwrap_or_else(|| "Unknown".to_string()),
        duration_seconds: duration(entry.get("duration_seconds")),
        triggers: triggers(entry.get("triggers")),
    }
}

fn eeg_result(entry: &Object) -> EegResult {
    EegResult {
        date: date(entry, "date"),
        findings: text(entry, "findings"),
        severity: text(entry, "severity"),
    }
}

fn imaging_study(entry: &Object) -> ImagingStudy {
    ImagingStudy {
        date: date(entry, "date"),
        study_type: text(entry, "type"),
        findings: text(entry, "findings"),
        recommendation: text(entry, "recommendation"),
    }
}

fn cognitive_assessment(entry: &Object) -> CognitiveAssessment {
    CognitiveAssessment {
        date: date(entry, "date"),
        overall_cognitive_status: text(entry, "overall_cognitive_status"),
        memory_score: number(entry, "memory_score"),
        attention_score: number(entry, "attention_score"),
        processing_speed: number(entry, "processing_speed"),
    }
}

fn medication(entry: &Object) -> Medication {
    Medication {
        name: text(entry, "name"),
        dosage: text(entry, "dosage"),
        frequency: text(entry, "frequency"),
        purpose: text(entry, "purpose"),
    }
}

fn treatment_plan(root: &Object) -> Result<TreatmentPlan, RecordError> {
    let Some(plan) = section(root, "treatment_plan", "treatment_plan")? else {
        return Ok(TreatmentPlan::default());
    };

    Ok(TreatmentPlan {
        goals: string_list(plan, "goals", "treatment_plan.goals")?,
        interventions: list(plan, "interventions", "treatment_plan.interventions")?
            .into_iter()
            .map(|entry| Intervention {
                kind: text(entry, "type"),
                details: text(entry, "details"),
            })
            .collect(),
        progress_notes: list(plan, "progress_notes", "treatment_plan.progress_notes")?
            .into_iter()
            .map(|entry| ProgressNote {
                date: date(entry, "date"),
                note: text(entry, "note").unwrap_or_default(),
            })
            .collect(),
    })
}

fn diagnostic_test(entry: &Object) -> DiagnosticTest {
    DiagnosticTest {
        date: date(entry, "date"),
        test: text(entry, "test").unwrap_or_else(|| "Unknown".to_string()),
        result: text(entry, "result").unwrap_or_default(),
        reference_range: text(entry, "reference_range").unwrap_or_default(),
        flag: flag(entry.get("flag")),
    }
}

fn neural_profile(root: &Object) -> Result<NeuralProfile, RecordError> {
    let Some(profile) = section(root, "neural_profile", "neural_profile")? else {
        return Ok(NeuralProfile::default());
    };

    let neural_network_analysis = section(
        profile,
        "neural_network_analysis",
        "neural_profile.neural_network_analysis",
    )?
    .map(|analysis| NetworkAnalysis {
        connectivity_strength: number(analysis, "connectivity_strength"),
        network_stability: text(analysis, "network_stability"),
    })
    .unwrap_or_default();

    let neural_treatment_response = section(
        profile,
        "neural_treatment_response",
        "neural_profile.neural_treatment_response",
    )?
    .map(|response| TreatmentResponse {
        current_medication_efficacy: number(response, "current_medication_efficacy"),
        neural_adaptation: text(response, "neural_adaptation"),
        side_effect_profile: text(response, "side_effect_profile"),
    })
    .unwrap_or_default();

    Ok(NeuralProfile {
        brain_regions_affected: string_list(
            profile,
            "brain_regions_affected",
            "neural_profile.brain_regions_affected",
        )?,
        neural_network_analysis,
        neurotransmitter_levels: list(
            profile,
            "neurotransmitter_levels",
            "neural_profile.neurotransmitter_levels",
        )?
        .into_iter()
        .map(|entry| NeurotransmitterLevel {
            name: text(entry, "name").unwrap_or_else(|| "Unknown".to_string()),
            status: text(entry, "status"),
        })
        .collect(),
        neural_treatment_response,
        neural_biomarkers: list(
            profile,
            "neural_biomarkers",
            "neural_profile.neural_biomarkers",
        )?
        .into_iter()
        .map(|entry| NeuralBiomarker {
            name: text(entry, "name").unwrap_or_else(|| "Unknown".to_string()),
            value: text(entry, "value"),
        })
        .collect(),
    })
}

fn health_metric(entry: &Object) -> Result<HealthMetric, RecordError> {
    Ok(HealthMetric {
        name: text(entry, "name").unwrap_or_else(|| "Unknown".to_string()),
        readings: list(entry, "readings", "metrics.readings")?
            .into_iter()
            .map(|reading| MetricReading {
                date: date(reading, "date"),
                value: text(reading, "value").unwrap_or_default(),
            })
            .collect(),
    })
}

/// Nested object; absent or `null` is `None`.
fn section<'a>(
    parent: &'a Object,
    key: &str,
    name: &'static str,
) -> Result<Option<&'a Object>, RecordError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(_) => Err(RecordError::Malformed {
            section: name,
            expected: "an object",
        }),
    }
}

/// Array of objects; entries that are not objects are skipped.
fn list<'a>(
    parent: &'a Object,
    key: &str,
    name: &'static str,
) -> Result<Vec<&'a Object>, RecordError> {
    let items = match parent.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(RecordError::Malformed {
                section: name,
                expected: "an array",
            })
        }
    };

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let object = item.as_object();
            if object.is_none() {
                tracing::warn!(section = name, index, "skipping entry that is not an object");
            }
            object
        })
        .collect())
}

fn string_list(parent: &Object, key: &str, name: &'static str) -> Result<Vec<String>, RecordError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(scalar_text).collect()),
        Some(_) => Err(RecordError::Malformed {
            section: name,
            expected: "an array",
        }),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn text(entry: &Object, key: &str) -> Option<String> {
    entry.get(key).and_then(scalar_text)
}

fn number(entry: &Object, key: &str) -> Option<f64> {
    let value = match entry.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|number| number.is_finite())
}

/// Non-negative whole seconds, from a number or a numeric string.
fn duration(value: Option<&Value>) -> Option<u32> {
    let seconds = match value? {
        Value::Number(number) => match number.as_u64() {
            Some(whole) => Some(whole),
            None => number
                .as_f64()
                .filter(|seconds| *seconds >= 0.0 && seconds.fract() == 0.0)
                .map(|seconds| seconds as u64),
        },
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    seconds.and_then(|seconds| u32::try_from(seconds).ok())
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn triggers(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(value @ Value::String(_)) => scalar_text(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn date(entry: &Object, key: &str) -> Option<NaiveDate> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .and_then(|value| parse_date(value.trim()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|datetime| datetime.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn missing_sections_become_empty() {
        let record = load_record_value(&json!({"name": "Jane Doe"})).unwrap();

        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert!(record.seizure_history().is_empty());
        assert!(record.diagnostic_tests.is_empty());
        assert_eq!(record.neural_profile, NeuralProfile::default());
    }

    #[test]
    fn null_sections_are_absent() {
        let record = load_record_value(&json!({
            "medical_history": null,
            "diagnostic_tests": null,
            "neural_profile": {"neural_network_analysis": null}
        }))
        .unwrap();

        assert_eq!(record, PatientRecord::empty());
    }

    #[test]
    fn wrong_section_type_is_malformed() {
        let err = load_record_value(&json!({
            "medical_history": {
                "neurological_history": {"seizure_history": "none"}
            }
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            RecordError::Malformed {
                section: "medical_history.neurological_history.seizure_history",
                expected: "an array",
            }
        ));
    }

    #[test]
    fn non_object_root_is_malformed() {
        let err = load_record_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, RecordError::Malformed { section: "record", .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = load_record_str("{not json").unwrap_err();
        assert!(matches!(err, RecordError::Parse(_)));
    }

    #[test]
    fn seizure_fields_are_coerced() {
        let record = load_record_value(&json!({
            "medical_history": {"neurological_history": {"seizure_history": [
                {"date": "2023-01-15", "type": "Focal", "duration_seconds": 120, "triggers": ["Stress", "", 7]},
                {"date": "2023-02-01T08:30:00Z", "type": "Focal", "duration_seconds": "45", "triggers": "Fever"},
                {"date": "yesterday", "duration_seconds": "about a minute"},
                {"date": "2023-03-01", "duration_seconds": -5},
                "not an event"
            ]}}
        }))
        .unwrap();

        let events = record.seizure_history();
        assert_eq!(events.len(), 4);

        assert_eq!(events[0].date, ymd(2023, 1, 15));
        assert_eq!(events[0].duration_seconds, Some(120));
        assert_eq!(events[0].triggers, ["Stress", "7"]);

        assert_eq!(events[1].date, ymd(2023, 2, 1));
        assert_eq!(events[1].duration_seconds, Some(45));
        assert_eq!(events[1].triggers, ["Fever"]);

        assert_eq!(events[2].date, None);
        assert_eq!(events[2].seizure_type, "Unknown");
        assert_eq!(events[2].duration_seconds, None);
        assert!(events[2].triggers.is_empty());

        assert_eq!(events[3].duration_seconds, None);
    }

    #[test]
    fn diagnostic_fields_are_coerced() {
        let record = load_record_value(&json!({
            "diagnostic_tests": [
                {"date": "2023-01-05", "test": "AED Level", "result": "8.5 µg/mL", "reference_range": "4.0-12.0 µg/mL", "flag": false},
                {"date": "2023-03-10", "test": "Glucose", "result": 92, "flag": "true"},
                {"test": "EEG"}
            ]
        }))
        .unwrap();

        let tests = &record.diagnostic_tests;
        assert_eq!(tests[0].result, "8.5 µg/mL");
        assert!(!tests[0].flag);
        assert_eq!(tests[1].result, "92");
        assert_eq!(tests[1].reference_range, "");
        assert!(tests[1].flag);
        assert_eq!(tests[2].date, None);
        assert!(!tests[2].flag);
    }

    #[test]
    fn neural_profile_scores_accept_strings() {
        let record = load_record_value(&json!({
            "neural_profile": {
                "neural_network_analysis": {"connectivity_strength": "72", "network_stability": "Moderate"},
                "neural_treatment_response": {"current_medication_efficacy": 65},
                "neurotransmitter_levels": [{"name": "GABA", "status": "Low"}]
            }
        }))
        .unwrap();

        let profile = &record.neural_profile;
        assert_eq!(profile.connectivity_strength(), Some(72.0));
        assert_eq!(profile.network_stability(), Some("Moderate"));
        assert_eq!(profile.medication_efficacy(), Some(65.0));
        assert_eq!(profile.neurotransmitter_levels[0].name, "GABA");
    }

    #[test]
    fn neural_biomarkers_are_kept() {
        let record = load_record_value(&json!({
            "neural_profile": {
                "neural_biomarkers": [
                    {"name": "Inflammatory markers", "value": "Elevated"},
                    {"value": 3.4},
                    "IL-6"
                ]
            }
        }))
        .unwrap();

        let markers = &record.neural_profile.neural_biomarkers;
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].name, "Inflammatory markers");
        assert_eq!(markers[0].value.as_deref(), Some("Elevated"));
        assert_eq!(markers[1].name, "Unknown");
        assert_eq!(markers[1].value.as_deref(), Some("3.4"));
    }

    #[test]
    fn metric_readings_keep_raw_values() {
        let record = load_record_value(&json!({
            "metrics": [{"name": "Blood Pressure", "readings": [
                {"date": "2023-01-01", "value": "120/80"},
                {"date": "2023-02-01", "value": 118}
            ]}]
        }))
        .unwrap();

        let readings = &record.metrics[0].readings;
        assert_eq!(readings[0].value, "120/80");
        assert_eq!(readings[1].value, "118");
    }

    #[test]
    fn missing_file_is_io_error() {
        let accessor = JsonFileAccessor::new("/definitely/not/here.json");
        let err = accessor.fetch().unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
    }

    #[test]
    fn parse_date_accepts_common_forms() {
        assert_eq!(parse_date("2023-06-10"), ymd(2023, 6, 10));
        assert_eq!(parse_date("2023-06-10T23:15:00+02:00"), ymd(2023, 6, 10));
        assert_eq!(parse_date("2023-06-10T23:15:00"), ymd(2023, 6, 10));
        assert_eq!(parse_date("10/06/2023"), None);
    }
}
