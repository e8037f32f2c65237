//! Derived production metrics shown on the dashboards.
//!
//! OEE = Availability x Performance x Quality, where
//!
//! - availability = run time / planned production time
//! - performance = (ideal cycle time x total count) / run time, capped at 1
//! - quality = good count / total count
//!
//! Every ratio with a zero denominator is reported as 0 rather than NaN so
//! an idle shift renders as 0 % instead of breaking the chart.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw shift figures for one machine, line or zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OeeInputs {
    /// Planned production time in minutes.
    pub planned_minutes: f64,
    /// Logged downtime in minutes (planned and unplanned).
    pub downtime_minutes: f64,
    /// Ideal time to produce one unit, in seconds.
    pub ideal_cycle_seconds: f64,
    /// Units produced, good and rejected.
    pub total_count: u64,
    /// Rejected units.
    pub reject_count: u64,
}

/// OEE factors as fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OeeReport {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

impl OeeReport {
    /// The same factors as percentages rounded to one decimal place.
    pub fn percent(&self) -> OeeReport {
        OeeReport {
            availability: round_percent(self.availability),
            performance: round_percent(self.performance),
            quality: round_percent(self.quality),
            oee: round_percent(self.oee),
        }
    }
}

/// Convert a fraction to a percentage with one decimal.
pub fn round_percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() {
        (numerator / denominator).max(0.0)
    } else {
        0.0
    }
}

/// Compute availability, performance, quality and OEE.
pub fn compute_oee(inputs: &OeeInputs) -> OeeReport {
    let run_minutes = (inputs.planned_minutes - inputs.downtime_minutes).max(0.0);
    let availability = ratio(run_minutes, inputs.planned_minutes).min(1.0);

    let ideal_minutes = inputs.ideal_cycle_seconds * inputs.total_count as f64 / 60.0;
    let performance = ratio(ideal_minutes, run_minutes).min(1.0);

    let good = inputs.total_count.saturating_sub(inputs.reject_count);
    let quality = ratio(good as f64, inputs.total_count as f64);

    OeeReport {
        availability,
        performance,
        quality,
        oee: availability * performance * quality,
    }
}

/// One ranked cause in a Pareto breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoEntry {
    pub cause: String,
    pub value: f64,
    /// Share of the total, in percent.
    pub percent: f64,
    /// Running total of `percent` up to and including this entry.
    pub cumulative_percent: f64,
}

/// Rank causes by contribution and compute cumulative percentages.
///
/// Causes with the same name are merged. Non-positive and non-finite values
/// are dropped. Ties are ordered by name so the chart is stable.
pub fn pareto<S: AsRef<str>>(items: &[(S, f64)]) -> Vec<ParetoEntry> {
    let mut merged: Vec<(String, f64)> = Vec::new();
    for (cause, value) in items {
        if !value.is_finite() || *value <= 0.0 {
            continue;
        }
        let cause = cause.as_ref();
        match merged.iter_mut().find(|(c, _)| c == cause) {
            Some((_, total)) => *total += value,
            None => merged.push((cause.to_string(), *value)),
        }
    }

    merged.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let total: f64 = merged.iter().map(|(_, v)| v).sum();
    let mut running = 0.0;
    let mut entries: Vec<ParetoEntry> = merged
        .into_iter()
        .map(|(cause, value)| {
            let percent = ratio(value, total) * 100.0;
            running += percent;
            ParetoEntry {
                cause,
                value,
                percent,
                cumulative_percent: running,
            }
        })
        .collect();

    // Absorb float drift so the curve ends exactly at 100
    if let Some(last) = entries.last_mut() {
        last.cumulative_percent = 100.0;
    }
    entries
}

/// The "vital few": leading causes up to and including the first entry
/// whose cumulative share reaches `threshold_percent`.
pub fn vital_few(entries: &[ParetoEntry], threshold_percent: f64) -> &[ParetoEntry] {
    let cut = entries
        .iter()
        .position(|e| e.cumulative_percent >= threshold_percent)
        .map_or(entries.len(), |i| i + 1);
    &entries[..cut]
}

/// Errors from parsing clock times.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Parse `HH:MM` (24h) into minutes since midnight.
pub fn parse_clock(time: &str) -> Result<u32, DurationError> {
    let invalid = || DurationError::InvalidTime(time.to_string());
    let (h, m) = time.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 || m.len() != 2 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// Minutes from `start` to `end`, both `HH:MM`. An end before the start is
/// taken to be on the next day.
pub fn duration_minutes(start: &str, end: &str) -> Result<u32, DurationError> {
    let start = parse_clock(start)?;
    let end = parse_clock(end)?;
    Ok(if end >= start {
        end - start
    } else {
        end + 24 * 60 - start
    })
}

/// Whether a stop was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DowntimeCategory {
    Planned,
    Unplanned,
}

/// A logged equipment stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeEvent {
    pub zone: String,
    pub category: DowntimeCategory,
    pub cause: String,
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
}

impl DowntimeEvent {
    pub fn duration_minutes(&self) -> Result<u32, DurationError> {
        duration_minutes(&self.start, &self.end)
    }
}

/// Downtime totals in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DowntimeSummary {
    pub planned_minutes: u32,
    pub unplanned_minutes: u32,
}

impl DowntimeSummary {
    pub fn total_minutes(&self) -> u32 {
        self.planned_minutes + self.unplanned_minutes
    }
}

/// Sum event durations per category. Fails on the first malformed time.
pub fn summarize_downtime(events: &[DowntimeEvent]) -> Result<DowntimeSummary, DurationError> {
    let mut summary = DowntimeSummary::default();
    for event in events {
        let minutes = event.duration_minutes()?;
        match event.category {
            DowntimeCategory::Planned => summary.planned_minutes += minutes,
            DowntimeCategory::Unplanned => summary.unplanned_minutes += minutes,
        }
    }
    Ok(summary)
}

/// Pareto breakdown of downtime minutes by cause.
pub fn downtime_pareto(events: &[DowntimeEvent]) -> Result<Vec<ParetoEntry>, DurationError> {
    let items = events
        .iter()
        .map(|e| Ok((e.cause.as_str(), e.duration_minutes()? as f64)))
        .collect::<Result<Vec<_>, DurationError>>()?;
    Ok(pareto(&items))
}
