//! Numeric extraction from free-text result and range strings.
//!
//! Every function here returns `None` instead of failing; callers drop the
//! value from whatever they are computing.

use serde::{Deserialize, Serialize};

/// Parses the first whitespace-delimited token of `text` as a float.
///
/// `"8.5 µg/mL"` gives `Some(8.5)`, `"Normal"` gives `None`.
pub fn leading_number(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next()?;
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses a metric reading. Blood pressure style readings (`"120/80"`) yield the
/// systolic part.
pub fn metric_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let candidate = match trimmed.split_once('/') {
        Some((systolic, _)) => systolic.trim(),
        None => trimmed,
    };
    candidate.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Bounds taken from a `"min-max unit"` reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

/// Where a value sits relative to a [`ReferenceRange`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RangePosition {
    Below,
    Within,
    Above,
}

impl ReferenceRange {
    /// `"4.0-12.0 µg/mL"` gives `4.0..=12.0`. Ranges without a `-` or with a side
    /// that does not start with a number (`"N/A"`, `"-5-5"`) give `None`.
    pub fn parse(text: &str) -> Option<Self> {
        if !text.contains('-') {
            return None;
        }

        let mut parts = text.split('-');
        let min = leading_number(parts.next()?)?;
        let max = leading_number(parts.next()?)?;
        Some(Self { min, max })
    }

    /// Bounds are inclusive.
    pub fn position(&self, value: f64) -> RangePosition {
        if value < self.min {
            RangePosition::Below
        } else if value > self.max {
            RangePosition::Above
        } else {
            RangePosition::Within
        }
    }
}

/// Rounds to one decimal place, the precision every reported statistic uses.
/// Exact ties go to the even digit, so `6.25` gives `6.2`.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
