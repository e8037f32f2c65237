//! Dashboard metric bindings.
//!
//! Inputs and outputs are plain objects converted with serde-wasm-bindgen.
//!
//! ```typescript
//! const report = compute_oee({
//!   planned_minutes: 480, downtime_minutes: 47,
//!   ideal_cycle_seconds: 1.0, total_count: 19271, reject_count: 423,
//! });
//! const ranked = pareto([{ cause: "Jam", value: 30 }, { cause: "Changeover", value: 50 }]);
//! const focus = vital_few(ranked, 80);
//! ```

use oeepro_core::oee::{self, DowntimeEvent, OeeInputs, ParetoEntry};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::js_error;

/// One cause/value pair fed to [`pareto`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParetoItem {
    cause: String,
    value: f64,
}

/// OEE report with fractions and display percentages side by side.
#[derive(Debug, Serialize)]
struct OeeSummary {
    fraction: oee::OeeReport,
    percent: oee::OeeReport,
}

fn summarize_oee(inputs: &OeeInputs) -> OeeSummary {
    let fraction = oee::compute_oee(inputs);
    OeeSummary {
        fraction,
        percent: fraction.percent(),
    }
}

fn rank(items: Vec<ParetoItem>) -> Vec<ParetoEntry> {
    let pairs: Vec<(String, f64)> = items.into_iter().map(|i| (i.cause, i.value)).collect();
    oee::pareto(&pairs)
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

/// Compute `{fraction, percent}` OEE reports from shift figures.
#[wasm_bindgen]
pub fn compute_oee(inputs: JsValue) -> Result<JsValue, JsValue> {
    let inputs: OeeInputs = from_js(inputs)?;
    to_js(&summarize_oee(&inputs))
}

/// Rank `[{cause, value}]` into Pareto entries with cumulative percentages.
#[wasm_bindgen]
pub fn pareto(items: JsValue) -> Result<JsValue, JsValue> {
    to_js(&rank(from_js(items)?))
}

/// Leading Pareto entries up to the first reaching `threshold_percent`.
#[wasm_bindgen]
pub fn vital_few(entries: JsValue, threshold_percent: f64) -> Result<JsValue, JsValue> {
    let entries: Vec<ParetoEntry> = from_js(entries)?;
    to_js(&oee::vital_few(&entries, threshold_percent))
}

/// Minutes between two `HH:MM` times, wrapping past midnight.
#[wasm_bindgen]
pub fn downtime_minutes(start: &str, end: &str) -> Result<u32, JsValue> {
    oee::duration_minutes(start, end).map_err(js_error)
}

/// Planned/unplanned totals plus a by-cause Pareto for downtime events.
#[wasm_bindgen]
pub fn summarize_downtime(events: JsValue) -> Result<JsValue, JsValue> {
    let events: Vec<DowntimeEvent> = from_js(events)?;
    let summary = oee::summarize_downtime(&events).map_err(js_error)?;
    let by_cause = oee::downtime_pareto(&events).map_err(js_error)?;
    to_js(&DowntimeBreakdown { summary, by_cause })
}

#[derive(Debug, Serialize)]
struct DowntimeBreakdown {
    summary: oee::DowntimeSummary,
    by_cause: Vec<ParetoEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_oee() {
        let summary = summarize_oee(&OeeInputs {
            planned_minutes: 100.0,
            downtime_minutes: 20.0,
            ideal_cycle_seconds: 30.0,
            total_count: 100,
            reject_count: 10,
        });
        assert_eq!(summary.percent.availability, 80.0);
        assert_eq!(summary.percent.quality, 90.0);
        assert!((summary.fraction.performance - 50.0 / 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank() {
        let entries = rank(vec![
            ParetoItem {
                cause: "Jam".into(),
                value: 1.0,
            },
            ParetoItem {
                cause: "Starved".into(),
                value: 3.0,
            },
        ]);
        assert_eq!(entries[0].cause, "Starved");
        assert_eq!(entries[0].percent, 75.0);
    }

    #[test]
    fn test_downtime_minutes_ok() {
        assert_eq!(downtime_minutes("22:00", "01:30").ok(), Some(210));
    }
}
