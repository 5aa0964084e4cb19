//! Five-agent composition win rates.
//!
//! The form sheet lists each team lineup as five consecutive rows. Rows are
//! chunked in file order; a chunk only counts as a lineup when all five rows
//! share one map and one result.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::filter::MapFilter;
use crate::models::{
    CompositionStat, MatchRoundRecord, Outcome, OutcomeCounts, PlayerAgentRecord, Report,
};

/// Rows per lineup.
pub const BLOCK_SIZE: usize = 5;

/// Number of compositions returned by default.
pub const DEFAULT_TOP_COMPOSITIONS: usize = 15;

/// One team's lineup for one map instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionBlock {
    pub map: String,
    pub outcome: Outcome,

    /// Date of the block's first row
    pub date: Option<NaiveDate>,

    /// Agent names, sorted so that lineup identity ignores row order
    pub agents: Vec<String>,
}

impl CompositionBlock {
    /// Build a block from exactly five rows, or `None` if they disagree on
    /// map or result.
    pub fn from_rows(rows: &[&PlayerAgentRecord]) -> Option<Self> {
        let (first, rest) = rows.split_first()?;
        if rows.len() != BLOCK_SIZE {
            return None;
        }
        let outcome = first.result?;
        if rest
            .iter()
            .any(|r| r.map != first.map || r.result != Some(outcome))
        {
            return None;
        }

        let mut agents: Vec<String> = rows.iter().map(|r| r.agent.clone()).collect();
        agents.sort();

        Some(Self {
            map: first.map.clone(),
            outcome,
            date: first.date,
            agents,
        })
    }

    /// Whether some round record backs this lineup up.
    ///
    /// Map and outcome must agree; the date must agree too when the block
    /// has one.
    pub fn has_matching_round(&self, rounds: &[MatchRoundRecord]) -> bool {
        rounds.iter().any(|r| {
            r.map == self.map
                && r.outcome == self.outcome
                && self.date.map_or(true, |d| r.date == Some(d))
        })
    }
}

/// Valid lineups in file order.
///
/// Rows without a result cannot belong to a lineup and are left out before
/// chunking. Invalid chunks are dropped, never repaired.
pub fn composition_blocks(rows: &[PlayerAgentRecord]) -> Vec<CompositionBlock> {
    let eligible: Vec<&PlayerAgentRecord> = rows.iter().filter(|r| r.result.is_some()).collect();

    let chunks = eligible.chunks_exact(BLOCK_SIZE);
    let considered = chunks.len();
    let blocks: Vec<CompositionBlock> = chunks.filter_map(CompositionBlock::from_rows).collect();

    debug!(
        "{} of {} form chunks are valid lineups",
        blocks.len(),
        considered
    );
    blocks
}

/// Maps with at least one valid lineup, sorted.
pub fn composition_maps(rows: &[PlayerAgentRecord]) -> Vec<String> {
    composition_blocks(rows)
        .into_iter()
        .map(|b| b.map)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Win rate per lineup, best first, at most `top_n` entries.
///
/// `rounds` is the already-filtered round table; lineups with no matching
/// round in it are not counted.
pub fn composition_win_rates(
    form: &[PlayerAgentRecord],
    rounds: &[MatchRoundRecord],
    map: &MapFilter,
    top_n: usize,
) -> Report<Vec<CompositionStat>> {
    let mut groups: BTreeMap<Vec<String>, OutcomeCounts> = BTreeMap::new();

    for block in composition_blocks(form) {
        if !map.matches(Some(&block.map)) || !block.has_matching_round(rounds) {
            continue;
        }
        groups.entry(block.agents).or_default().record(block.outcome);
    }

    let mut stats: Vec<CompositionStat> = groups
        .into_iter()
        .map(|(agents, counts)| CompositionStat::new(agents, counts))
        .collect();

    stats.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| b.counts.games.cmp(&a.counts.games))
            .then_with(|| a.agents.cmp(&b.agents))
    });
    stats.truncate(top_n);

    Report::from_rows(stats)
}
