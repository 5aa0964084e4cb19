//! Map win rates.

use std::collections::BTreeMap;

use crate::models::{MapSummary, MatchRoundRecord, OutcomeCounts, Report};

/// Games, wins, draws and losses per map, sorted by map name.
pub fn map_summary(rows: &[MatchRoundRecord]) -> Report<Vec<MapSummary>> {
    let mut groups: BTreeMap<&str, OutcomeCounts> = BTreeMap::new();
    for row in rows {
        groups.entry(row.map.as_str()).or_default().record(row.outcome);
    }

    let summaries = groups
        .into_iter()
        .map(|(map, counts)| MapSummary::new(map.to_string(), counts))
        .collect();
    Report::from_rows(summaries)
}

/// Reorder by win rate, highest first. Equal rates fall back to map name.
pub fn rank_by_win_rate(mut summaries: Vec<MapSummary>) -> Vec<MapSummary> {
    summaries.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| a.map.cmp(&b.map))
    });
    summaries
}
