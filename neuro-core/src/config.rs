use serde::{Deserialize, Serialize};

/// Tunable weights and thresholds for the analytics pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub severity_weights: SeverityWeights,
    pub severity_bands: SeverityBands,
    /// Diagnostic tests whose name contains this text show up as medication-level events.
    pub medication_test_keyword: String,
    /// Relative change below which a health metric counts as stable.
    pub metric_stable_ratio: f64,
    /// Seizure count from which the overview status reads "Needs Attention".
    pub attention_seizure_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            severity_weights: SeverityWeights::default(),
            severity_bands: SeverityBands::default(),
            medication_test_keyword: "Antiepileptic".to_string(),
            metric_stable_ratio: 0.05,
            attention_seizure_count: 3,
        }
    }
}

/// Weight of each term in the severity index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeverityWeights {
    pub connectivity: f64,
    pub stability: f64,
    pub medication_efficacy: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            connectivity: 0.4,
            stability: 0.3,
            medication_efficacy: 0.3,
        }
    }
}

/// Lower bounds of the moderate and high severity bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeverityBands {
    pub moderate_from: f64,
    pub high_from: f64,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self {
            moderate_from: 30.0,
            high_from: 70.0,
        }
    }
}
