//! Row filters.
//!
//! Every filter borrows its input and returns the kept rows, so filters
//! compose in any order and the combination is the AND of the predicates.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AgentResultRecord, MatchRoundRecord, PlayerAgentRecord, Role};

/// Sentinel accepted in place of a map name to mean "every map".
pub const ALL_MAPS: &str = "All";

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Map selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapFilter {
    #[default]
    All,
    Only(String),
}

impl MapFilter {
    /// `"All"` (or a blank value) selects every map.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL_MAPS {
            MapFilter::All
        } else {
            MapFilter::Only(raw.to_string())
        }
    }

    pub fn matches(&self, map: Option<&str>) -> bool {
        match self {
            MapFilter::All => true,
            MapFilter::Only(wanted) => map == Some(wanted.as_str()),
        }
    }
}

/// Rows that carry a date.
pub trait Dated {
    fn date(&self) -> Option<NaiveDate>;
}

/// Rows that belong to a map.
pub trait OnMap {
    fn map_name(&self) -> Option<&str>;
}

/// Rows that belong to a player.
pub trait ByPlayer {
    fn player_name(&self) -> Option<&str>;
}

/// Rows that name an agent.
pub trait ByAgent {
    fn agent_name(&self) -> &str;
}

impl Dated for MatchRoundRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl OnMap for MatchRoundRecord {
    fn map_name(&self) -> Option<&str> {
        Some(&self.map)
    }
}

impl Dated for PlayerAgentRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl OnMap for PlayerAgentRecord {
    fn map_name(&self) -> Option<&str> {
        Some(&self.map)
    }
}

impl ByPlayer for PlayerAgentRecord {
    fn player_name(&self) -> Option<&str> {
        self.player.as_deref()
    }
}

impl ByAgent for PlayerAgentRecord {
    fn agent_name(&self) -> &str {
        &self.agent
    }
}

impl Dated for AgentResultRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl OnMap for AgentResultRecord {
    fn map_name(&self) -> Option<&str> {
        self.map.as_deref()
    }
}

impl ByPlayer for AgentResultRecord {
    fn player_name(&self) -> Option<&str> {
        Some(&self.player)
    }
}

impl ByAgent for AgentResultRecord {
    fn agent_name(&self) -> &str {
        &self.agent
    }
}

/// Keep rows dated within `range`. Undated rows are dropped.
pub fn filter_by_date_range<T: Dated + Clone>(rows: &[T], range: &DateRange) -> Vec<T> {
    rows.iter()
        .filter(|r| r.date().is_some_and(|d| range.contains(d)))
        .cloned()
        .collect()
}

/// Keep rows on the selected map. `MapFilter::All` keeps everything.
pub fn filter_by_map<T: OnMap + Clone>(rows: &[T], map: &MapFilter) -> Vec<T> {
    if *map == MapFilter::All {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|r| map.matches(r.map_name()))
        .cloned()
        .collect()
}

/// Keep rows whose map is one of `maps`.
pub fn filter_by_maps<T: OnMap + Clone>(rows: &[T], maps: &[String]) -> Vec<T> {
    rows.iter()
        .filter(|r| r.map_name().is_some_and(|m| maps.iter().any(|x| x == m)))
        .cloned()
        .collect()
}

/// Keep rows for exactly this player.
pub fn filter_by_player<T: ByPlayer + Clone>(rows: &[T], player: &str) -> Vec<T> {
    rows.iter()
        .filter(|r| r.player_name() == Some(player))
        .cloned()
        .collect()
}

/// Keep rows whose agent is one of `agents`.
pub fn filter_by_agents<T: ByAgent + Clone>(rows: &[T], agents: &[String]) -> Vec<T> {
    rows.iter()
        .filter(|r| agents.iter().any(|a| a == r.agent_name()))
        .cloned()
        .collect()
}

/// Keep rows whose agent plays `role`. Agents missing from the role table
/// never match.
pub fn filter_by_role<T: ByAgent + Clone>(rows: &[T], role: Role) -> Vec<T> {
    rows.iter()
        .filter(|r| Role::of_agent(r.agent_name()) == Some(role))
        .cloned()
        .collect()
}

// ── Selector values ─────────────────────────────────────────────

pub fn available_maps<T: OnMap>(rows: &[T]) -> Vec<String> {
    distinct(rows.iter().filter_map(|r| r.map_name()))
}

pub fn available_players<T: ByPlayer>(rows: &[T]) -> Vec<String> {
    distinct(rows.iter().filter_map(|r| r.player_name()))
}

pub fn available_agents<T: ByAgent>(rows: &[T]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.agent_name()))
}

pub fn available_dates<T: Dated>(rows: &[T]) -> Vec<NaiveDate> {
    rows.iter()
        .filter_map(|r| r.date())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Smallest range covering every dated row.
pub fn full_date_range<T: Dated>(rows: &[T]) -> Option<DateRange> {
    let dates = available_dates(rows);
    Some(DateRange::new(*dates.first()?, *dates.last()?))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
