//! Statistics calculation engine.
//!
//! Aggregations over filtered tables, one function per metric:
//! - Map win rates
//! - Composition win rates
//! - Player x agent win-rate grid
//! - Attack/defense round win rates and post-plant success
//! - Pistol rounds and second-round conversion
//! - Player agent performance and role benchmark deltas
//!
//! The helpers in this module are the derivation step shared by all of them.

pub mod compositions;
pub mod grid;
pub mod maps;
pub mod pistol;
pub mod players;
pub mod sides;

pub use compositions::*;
pub use grid::*;
pub use maps::*;
pub use pistol::*;
pub use players::*;
pub use sides::*;

use crate::models::{BandThresholds, WinRateBand};

/// Shown in place of an undefined value.
pub const UNDEFINED: &str = "-";

/// `numerator / denominator`, undefined when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Mean of the present values. Missing values are skipped, not zeroed.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    ratio(sum, count as f64)
}

/// Sum of the present values.
pub fn sum(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    values.into_iter().flatten().sum()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a fraction as a percentage with one decimal, e.g. `0.667` -> `66.7%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => UNDEFINED.to_string(),
    }
}

/// Format a signed difference, e.g. `+0.25` or `-12.0%` for rates.
pub fn format_delta(delta: Option<f64>, as_percent: bool) -> String {
    let Some(delta) = delta else {
        return UNDEFINED.to_string();
    };
    let sign = if delta >= 0.0 { "+" } else { "" };
    if as_percent {
        format!("{}{:.1}%", sign, delta * 100.0)
    } else {
        format!("{}{:.2}", sign, delta)
    }
}

/// Colour band for an optional rate.
pub fn band(value: Option<f64>, thresholds: &BandThresholds) -> Option<WinRateBand> {
    value.map(|v| WinRateBand::from_win_rate(v, thresholds))
}
