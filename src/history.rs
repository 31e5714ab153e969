use chrono::{DateTime, Local};
use itertools::Itertools;
use std::time::Duration;
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::session::SessionRecord;

/// How many of the latest sessions the profile graph plots
pub const GRAPH_WINDOW: usize = 15;
/// The graph's y axis never shrinks below this
pub const GRAPH_MIN_MAX_WPM: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySummary {
    pub sessions: usize,
    pub best_wpm: u32,
    pub average_wpm: f64,
    pub wpm_std_dev: f64,
}

/// Aggregate figures over the whole history, `None` when it is empty
pub fn summarize(records: &[SessionRecord]) -> Option<HistorySummary> {
    let wpms: Vec<f64> = records.iter().map(|r| r.wpm as f64).collect();

    Some(HistorySummary {
        sessions: records.len(),
        best_wpm: records.iter().map(|r| r.wpm).max()?,
        average_wpm: mean(&wpms)?,
        wpm_std_dev: std_dev(&wpms)?,
    })
}

/// Points and y bound for the WPM line chart.
///
/// Uses the last `GRAPH_WINDOW` records; `None` when fewer than two.
pub fn graph_points(records: &[SessionRecord]) -> Option<(Vec<(f64, f64)>, f64)> {
    let window = &records[records.len().saturating_sub(GRAPH_WINDOW)..];
    if window.len() < 2 {
        return None;
    }

    let points = window
        .iter()
        .enumerate()
        .map(|(idx, r)| (idx as f64, r.wpm as f64))
        .collect_vec();

    let max_wpm = points
        .iter()
        .map(|(_, wpm)| *wpm)
        .fold(GRAPH_MIN_MAX_WPM, f64::max);

    Some((points, max_wpm))
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation
fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// `dd/mm/yyyy at HH:MM`
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%d/%m/%Y at %H:%M").to_string()
}

/// Rough age of a record, e.g. "2 hours ago"
pub fn humanize_age(timestamp: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let secs = (*now - *timestamp).num_seconds().max(0) as u64;
    HumanTime::from(Duration::from_secs(secs)).to_text_en(Accuracy::Rough, Tense::Past)
}

/// Records newest first, as the history list shows them
pub fn newest_first(records: &[SessionRecord]) -> Vec<&SessionRecord> {
    records.iter().rev().collect()
}
