//! Seizure frequency, type and trigger statistics.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::parse::round1;
use crate::{Analysis, SeizureEvent};

pub const NO_SEIZURE_HISTORY: &str = "No seizure history available";

/// Coarse direction of monthly seizure counts.
///
/// Only the first and last populated months are compared; interior months are
/// ignored, so sparse histories give noisy answers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    #[serde(rename = "Insufficient data for trend analysis")]
    InsufficientData,
}

impl Trend {
    /// Classifies the change between the first and last monthly counts.
    pub fn from_counts(first: usize, last: usize) -> Self {
        if last < first {
            Trend::Improving
        } else if last > first {
            Trend::Worsening
        } else {
            Trend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "Improving",
            Trend::Worsening => "Worsening",
            Trend::Stable => "Stable",
            Trend::InsufficientData => "Insufficient data for trend analysis",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of seizures in one calendar month (`"YYYY-MM"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: String,
    pub seizure_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeizureAnalysisResult {
    pub total_seizures: usize,
    pub seizure_types: BTreeMap<String, usize>,
    /// Mean over events with a usable duration; `None` when there are none.
    pub average_duration_seconds: Option<f64>,
    pub common_triggers: BTreeMap<String, usize>,
    pub trend: Trend,
    pub first_recorded: Option<NaiveDate>,
    pub last_recorded: Option<NaiveDate>,
    pub monthly_counts: Vec<MonthlyCount>,
    /// Whole days since the previous dated seizure, one entry per dated seizure
    /// oldest first. The first entry is `None`; undated seizures have no entry.
    pub days_between_seizures: Vec<Option<i64>>,
}

/// Summarizes a seizure history given in any order.
pub fn analyze_seizure_frequency(events: &[SeizureEvent]) -> Analysis<SeizureAnalysisResult> {
    if events.is_empty() {
        return Analysis::no_data(NO_SEIZURE_HISTORY);
    }

    let mut dates: Vec<NaiveDate> = events.iter().filter_map(|event| event.date).collect();
    dates.sort();

    let undated = events.len() - dates.len();
    if undated > 0 {
        tracing::debug!(undated, "seizure events without a date left out of monthly buckets");
    }

    let days_between_seizures = dates
        .iter()
        .enumerate()
        .map(|(index, date)| {
            index
                .checked_sub(1)
                .map(|previous| (*date - dates[previous]).num_days())
        })
        .collect();

    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for date in &dates {
        *months.entry((date.year(), date.month())).or_default() += 1;
    }

    let trend = match (months.values().next(), months.values().next_back()) {
        (Some(&first), Some(&last)) if months.len() >= 2 => Trend::from_counts(first, last),
        _ => Trend::InsufficientData,
    };

    let mut seizure_types = BTreeMap::new();
    let mut common_triggers = BTreeMap::new();
    let mut durations = Vec::with_capacity(events.len());

    for event in events {
        *seizure_types.entry(event.seizure_type.clone()).or_default() += 1;
        for trigger in &event.triggers {
            *common_triggers.entry(trigger.clone()).or_default() += 1;
        }
        match event.duration_seconds {
            Some(seconds) => durations.push(f64::from(seconds)),
            None => tracing::debug!(date = ?event.date, "seizure duration excluded from average"),
        }
    }

    let average_duration_seconds = if durations.is_empty() {
        None
    } else {
        Some(round1(durations.iter().sum::<f64>() / durations.len() as f64))
    };

    Analysis::Report(SeizureAnalysisResult {
        total_seizures: events.len(),
        seizure_types,
        average_duration_seconds,
        common_triggers,
        trend,
        first_recorded: dates.first().copied(),
        last_recorded: dates.last().copied(),
        monthly_counts: months
            .into_iter()
            .map(|((year, month), seizure_count)| MonthlyCount {
                month: format!("{year:04}-{month:02}"),
                seizure_count,
            })
            .collect(),
        days_between_seizures,
    })
}
