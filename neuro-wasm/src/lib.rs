//! WASM bridge so a JavaScript dashboard can run the analytics in the browser.

use neuro_core::{AnalyticsConfig, RecordError};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Config as sent from JS; every field is optional and overlays the defaults.
#[derive(Deserialize, Default)]
struct JsAnalyticsConfig {
    #[serde(default)]
    connectivity_weight: Option<f64>,
    #[serde(default)]
    stability_weight: Option<f64>,
    #[serde(default)]
    medication_efficacy_weight: Option<f64>,
    #[serde(default)]
    moderate_from: Option<f64>,
    #[serde(default)]
    high_from: Option<f64>,
    #[serde(default)]
    medication_test_keyword: Option<String>,
    #[serde(default)]
    metric_stable_ratio: Option<f64>,
    #[serde(default)]
    attention_seizure_count: Option<usize>,
}

impl From<JsAnalyticsConfig> for AnalyticsConfig {
    fn from(cfg: JsAnalyticsConfig) -> Self {
        let mut base = AnalyticsConfig::default();
        if let Some(weight) = cfg.connectivity_weight {
            base.severity_weights.connectivity = weight;
        }
        if let Some(weight) = cfg.stability_weight {
            base.severity_weights.stability = weight;
        }
        if let Some(weight) = cfg.medication_efficacy_weight {
            base.severity_weights.medication_efficacy = weight;
        }
        if let Some(threshold) = cfg.moderate_from {
            base.severity_bands.moderate_from = threshold;
        }
        if let Some(threshold) = cfg.high_from {
            base.severity_bands.high_from = threshold;
        }
        if let Some(keyword) = cfg.medication_test_keyword {
            base.medication_test_keyword = keyword;
        }
        if let Some(ratio) = cfg.metric_stable_ratio {
            base.metric_stable_ratio = ratio;
        }
        if let Some(count) = cfg.attention_seizure_count {
            base.attention_seizure_count = count;
        }
        base
    }
}

#[wasm_bindgen]
pub fn analyze_record(input_record: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let record_value = from_value::<serde_json::Value>(input_record)
        .map_err(|err| JsValue::from_str(&format!("cannot read record JSON: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsAnalyticsConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("cannot read config: {err}")))?;
            AnalyticsConfig::from(cfg)
        }
        None => AnalyticsConfig::default(),
    };

    let summary = neuro_record::summarize_record_value(&record_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_record_error(err)))?;

    to_value(&summary).map_err(|err| JsValue::from_str(&format!("cannot serialize summary: {err}")))
}

fn format_record_error(err: RecordError) -> String {
    format!("Record error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_config_overlays_defaults() {
        let cfg: JsAnalyticsConfig = serde_json::from_str(
            r#"{"stability_weight": 0.2, "medication_test_keyword": "AED", "attention_seizure_count": 5}"#,
        )
        .unwrap();
        let config = AnalyticsConfig::from(cfg);

        assert_eq!(config.severity_weights.stability, 0.2);
        assert_eq!(config.severity_weights.connectivity, 0.4);
        assert_eq!(config.medication_test_keyword, "AED");
        assert_eq!(config.severity_bands.high_from, 70.0);
        assert_eq!(config.attention_seizure_count, 5);
    }

    #[test]
    fn empty_js_config_is_default() {
        assert_eq!(
            AnalyticsConfig::from(JsAnalyticsConfig::default()),
            AnalyticsConfig::default()
        );
    }

    #[test]
    fn record_errors_are_prefixed() {
        let message = format_record_error(RecordError::Malformed {
            section: "diagnostic_tests",
            expected: "an array",
        });
        assert_eq!(
            message,
            "Record error: section `diagnostic_tests` must be an array"
        );
    }
}
