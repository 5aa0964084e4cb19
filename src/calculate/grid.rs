//! Player x agent win-rate grid.

use std::collections::{BTreeMap, BTreeSet};

use crate::calculate::round1;
use crate::models::{AgentResultRecord, OutcomeCounts, Report, WinRateGrid};

/// Win rate (percent, one decimal) of every observed player on every
/// observed agent. Pairs that were never played, or have no recorded
/// result, are 0.
pub fn player_agent_grid(rows: &[AgentResultRecord]) -> Report<WinRateGrid> {
    if rows.is_empty() {
        return Report::NoData;
    }

    let mut players = BTreeSet::new();
    let mut agents = BTreeSet::new();
    let mut pairs: BTreeMap<(&str, &str), OutcomeCounts> = BTreeMap::new();

    for row in rows {
        players.insert(row.player.as_str());
        agents.insert(row.agent.as_str());
        if let Some(result) = row.result {
            pairs
                .entry((row.player.as_str(), row.agent.as_str()))
                .or_default()
                .record(result);
        }
    }

    let cells = players
        .iter()
        .map(|player| {
            agents
                .iter()
                .map(|agent| {
                    pairs
                        .get(&(*player, *agent))
                        .map(|counts| round1(counts.win_rate() * 100.0))
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    Report::Ready(WinRateGrid {
        players: players.into_iter().map(str::to_string).collect(),
        agents: agents.into_iter().map(str::to_string).collect(),
        cells,
    })
}
