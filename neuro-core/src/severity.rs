//! Composite neural severity index.

use serde::{Deserialize, Serialize};

use crate::parse::round1;
use crate::{AnalyticsConfig, NeuralProfile, SeverityBands};

/// Gauge band of a severity score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Low,
    Moderate,
    High,
}

impl SeverityBand {
    pub fn classify(score: f64, bands: &SeverityBands) -> Self {
        if score < bands.moderate_from {
            SeverityBand::Low
        } else if score < bands.high_from {
            SeverityBand::Moderate
        } else {
            SeverityBand::High
        }
    }
}

/// Contribution of each input, rounded for display. `None` means the input was
/// absent and added nothing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SeverityTerms {
    pub connectivity: Option<f64>,
    pub stability: Option<f64>,
    pub medication_efficacy: Option<f64>,
}

/// 0–100 score, higher is more severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeverityIndex {
    pub score: f64,
    pub band: SeverityBand,
    pub terms: SeverityTerms,
}

fn stability_level(stability: &str) -> Option<f64> {
    match stability {
        "Stable" => Some(0.0),
        "Moderate" => Some(50.0),
        "Poor" => Some(100.0),
        _ => None,
    }
}

/// Weighted sum of inverted connectivity, stability level and inverted
/// medication efficacy.
///
/// Absent inputs contribute zero and the sum is not renormalized, so a profile
/// with a single input scores proportionally lower.
pub fn compute_severity(profile: &NeuralProfile, config: &AnalyticsConfig) -> SeverityIndex {
    let weights = &config.severity_weights;

    let connectivity = profile
        .connectivity_strength()
        .map(|strength| (100.0 - strength.clamp(0.0, 100.0)) * weights.connectivity);

    let stability = profile.network_stability().and_then(|label| {
        let level = stability_level(label);
        if level.is_none() {
            tracing::debug!(stability = label, "unrecognized network stability ignored");
        }
        level.map(|level| level * weights.stability)
    });

    let medication_efficacy = profile
        .medication_efficacy()
        .map(|efficacy| (100.0 - efficacy.clamp(0.0, 100.0)) * weights.medication_efficacy);

    let raw: f64 = [connectivity, stability, medication_efficacy]
        .into_iter()
        .flatten()
        .sum();
    let score = round1(raw.clamp(0.0, 100.0));

    SeverityIndex {
        score,
        band: SeverityBand::classify(score, &config.severity_bands),
        terms: SeverityTerms {
            connectivity: connectivity.map(round1),
            stability: stability.map(round1),
            medication_efficacy: medication_efficacy.map(round1),
        },
    }
}
