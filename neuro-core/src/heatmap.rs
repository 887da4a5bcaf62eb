//! Trigger occurrences per calendar month.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::SeizureEvent;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Counts for one trigger, index 0 is January. Years are merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerMonthRow {
    pub trigger: String,
    pub monthly_counts: [u32; 12],
}

/// One row per observed trigger, sorted by trigger name.
///
/// Triggers seen only on undated events still get a row of zeros.
pub fn trigger_heatmap(events: &[SeizureEvent]) -> Vec<TriggerMonthRow> {
    let mut rows: BTreeMap<&str, [u32; 12]> = BTreeMap::new();

    for event in events {
        let month_index = event.date.map(|date| date.month0() as usize);
        for trigger in &event.triggers {
            let counts = rows.entry(trigger.as_str()).or_insert([0; 12]);
            if let Some(index) = month_index {
                counts[index] += 1;
            }
        }
    }

    rows.into_iter()
        .map(|(trigger, monthly_counts)| TriggerMonthRow {
            trigger: trigger.to_string(),
            monthly_counts,
        })
        .collect()
}
