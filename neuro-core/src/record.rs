//! Patient record snapshot consumed by the analytics pass.
//!
//! Every section defaults to empty so a partial document still yields a usable
//! record. The accessor methods on [`PatientRecord`] and [`NeuralProfile`] are
//! the single place where "missing" turns into a neutral value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::RecordError;

/// Anything able to hand over one patient record (JSON file, database row set...).
pub trait RecordAccessor {
    fn fetch(&self) -> Result<PatientRecord, RecordError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientRecord {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub patient_id: Option<String>,
    pub medical_history: MedicalHistory,
    pub medications: Vec<Medication>,
    pub treatment_plan: TreatmentPlan,
    pub diagnostic_tests: Vec<DiagnosticTest>,
    pub neural_profile: NeuralProfile,
    pub metrics: Vec<HealthMetric>,
}

impl PatientRecord {
    /// Sentinel handed over when the accessor has nothing to offer.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seizure_history(&self) -> &[SeizureEvent] {
        &self.medical_history.neurological_history.seizure_history
    }

    pub fn eeg_results(&self) -> &[EegResult] {
        &self.medical_history.neurological_history.eeg_results
    }

    pub fn imaging_studies(&self) -> &[ImagingStudy] {
        &self.medical_history.neurological_history.imaging_studies
    }

    pub fn cognitive_assessment(&self) -> Option<&CognitiveAssessment> {
        self.medical_history
            .neurological_history
            .cognitive_assessment
            .as_ref()
    }

    pub fn progress_notes(&self) -> &[ProgressNote] {
        &self.treatment_plan.progress_notes
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MedicalHistory {
    pub conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub neurological_history: NeurologicalHistory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeurologicalHistory {
    pub seizure_history: Vec<SeizureEvent>,
    pub eeg_results: Vec<EegResult>,
    pub imaging_studies: Vec<ImagingStudy>,
    pub cognitive_assessment: Option<CognitiveAssessment>,
}

/// One recorded seizure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeizureEvent {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub seizure_type: String,
    /// `None` when the source value was missing or not a non-negative integer.
    pub duration_seconds: Option<u32>,
    pub triggers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EegResult {
    pub date: Option<NaiveDate>,
    pub findings: Option<String>,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImagingStudy {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub study_type: Option<String>,
    pub findings: Option<String>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CognitiveAssessment {
    pub date: Option<NaiveDate>,
    pub overall_cognitive_status: Option<String>,
    pub memory_score: Option<f64>,
    pub attention_score: Option<f64>,
    pub processing_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Medication {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreatmentPlan {
    pub goals: Vec<String>,
    pub interventions: Vec<Intervention>,
    pub progress_notes: Vec<ProgressNote>,
}

impl TreatmentPlan {
    /// Groups intervention details by type in first-seen order.
    pub fn interventions_by_type(&self) -> Vec<InterventionGroup> {
        let mut groups: Vec<InterventionGroup> = Vec::new();

        for intervention in &self.interventions {
            let kind = intervention.kind.as_deref().unwrap_or("Other");
            let details = intervention.details.clone().unwrap_or_default();

            match groups.iter_mut().find(|group| group.kind == kind) {
                Some(group) => group.details.push(details),
                None => groups.push(InterventionGroup {
                    kind: kind.to_string(),
                    details: vec![details],
                }),
            }
        }

        groups
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Intervention {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterventionGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressNote {
    pub date: Option<NaiveDate>,
    pub note: String,
}

/// A lab or drug-level result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagnosticTest {
    pub date: Option<NaiveDate>,
    pub test: String,
    /// Free text, often a number followed by a unit (`"8.5 µg/mL"`).
    pub result: String,
    /// `"min-max unit"` or anything else (`"N/A"`).
    pub reference_range: String,
    pub flag: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeuralProfile {
    pub brain_regions_affected: Vec<String>,
    pub neural_network_analysis: NetworkAnalysis,
    pub neurotransmitter_levels: Vec<NeurotransmitterLevel>,
    pub neural_treatment_response: TreatmentResponse,
    pub neural_biomarkers: Vec<NeuralBiomarker>,
}

impl NeuralProfile {
    pub fn connectivity_strength(&self) -> Option<f64> {
        self.neural_network_analysis.connectivity_strength
    }

    pub fn network_stability(&self) -> Option<&str> {
        self.neural_network_analysis.network_stability.as_deref()
    }

    pub fn medication_efficacy(&self) -> Option<f64> {
        self.neural_treatment_response.current_medication_efficacy
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkAnalysis {
    /// 0–100.
    pub connectivity_strength: Option<f64>,
    /// `"Stable"`, `"Moderate"` or `"Poor"`.
    pub network_stability: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeurotransmitterLevel {
    pub name: String,
    pub status: Option<String>,
}

/// Lab biomarker such as an inflammatory marker, value kept as free text (`"Elevated"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeuralBiomarker {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreatmentResponse {
    /// 0–100.
    pub current_medication_efficacy: Option<f64>,
    pub neural_adaptation: Option<String>,
    pub side_effect_profile: Option<String>,
}

/// A general health metric such as heart rate or blood pressure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthMetric {
    pub name: String,
    pub readings: Vec<MetricReading>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetricReading {
    pub date: Option<NaiveDate>,
    pub value: String,
}
