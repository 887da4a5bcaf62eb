//! Cognitive assessment scores with their descriptive bands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CognitiveAssessment;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveBand {
    SignificantImpairment,
    ModerateImpairment,
    MildImpairment,
    Normal,
}

impl CognitiveBand {
    /// 0–50, 51–70, 71–85, 86–100.
    pub fn from_score(score: f64) -> Self {
        if score <= 50.0 {
            CognitiveBand::SignificantImpairment
        } else if score <= 70.0 {
            CognitiveBand::ModerateImpairment
        } else if score <= 85.0 {
            CognitiveBand::MildImpairment
        } else {
            CognitiveBand::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CognitiveBand::SignificantImpairment => "Significant impairment",
            CognitiveBand::ModerateImpairment => "Moderate impairment",
            CognitiveBand::MildImpairment => "Mild impairment",
            CognitiveBand::Normal => "Normal range",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CognitiveScore {
    pub domain: String,
    pub score: f64,
    pub band: CognitiveBand,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CognitiveProfile {
    pub date: Option<NaiveDate>,
    pub overall_status: Option<String>,
    pub scores: Vec<CognitiveScore>,
}

pub fn cognitive_profile(assessment: Option<&CognitiveAssessment>) -> Option<CognitiveProfile> {
    let assessment = assessment?;

    let scores = [
        ("Memory", assessment.memory_score),
        ("Attention", assessment.attention_score),
        ("Processing Speed", assessment.processing_speed),
    ]
    .into_iter()
    .filter_map(|(domain, score)| {
        score.map(|score| CognitiveScore {
            domain: domain.to_string(),
            score,
            band: CognitiveBand::from_score(score),
        })
    })
    .collect();

    Some(CognitiveProfile {
        date: assessment.date,
        overall_status: assessment.overall_cognitive_status.clone(),
        scores,
    })
}
