//! Dashboard views.
//!
//! Each view takes the loaded tables and one immutable request, runs the
//! filter stage, then a single aggregation. Nothing is cached between calls;
//! a new selection is a new request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculate::{
    acs_spread, agent_performance, benchmark_comparison, composition_maps,
    composition_win_rates, conversion_breakdown, map_summary, pistol_summary, player_agent_grid,
    post_plant_summary, rank_by_side_average, rank_by_win_rate, side_summary, PostPlantSort,
    DEFAULT_TOP_COMPOSITIONS,
};
use crate::filter::{
    available_agents, available_maps, available_players, filter_by_agents, filter_by_date_range,
    filter_by_map, filter_by_maps, filter_by_player, full_date_range, DateRange, Dated, MapFilter,
};
use crate::models::{
    AcsSpread, AgentPerformance, BandThresholds, BenchmarkComparison, CompositionStat,
    ConversionBreakdown, MapSummary, PistolSummary, PostPlantSummary, Report, Role, SideSummary,
    WinRateGrid,
};
use crate::storage::{parse_date, Tables};

/// A request parameter that could not be understood.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("invalid date for '{field}': {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("unknown role: {0} (expected Controller, Duelist, Initiator or Sentinel)")]
    UnknownRole(String),

    #[error("unknown sort column: {0} (expected attack or defense)")]
    UnknownSort(String),

    #[error("unknown order: {0} (expected asc or desc)")]
    UnknownOrder(String),

    #[error("'{0}' is required for this view")]
    Missing(&'static str),

    #[error("'top' must be greater than zero")]
    ZeroTop,
}

/// Raw request as it arrives from a query string or the command line.
///
/// List values (`agents`, `maps`) are comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub map: Option<String>,
    pub player: Option<String>,
    pub role: Option<String>,
    pub agents: Option<String>,
    pub maps: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub top: Option<usize>,
}

/// Parsed, validated selection shared by every view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub map: MapFilter,
    pub player: Option<String>,
    pub role: Option<Role>,

    /// Empty means every agent
    pub agents: Vec<String>,

    /// Empty means every map
    pub maps: Vec<String>,

    pub sort: PostPlantSort,
    pub ascending: bool,
    pub top: Option<usize>,
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_date_param(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ParamError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_date(value).map(Some).ok_or_else(|| ParamError::InvalidDate {
            field,
            value: value.to_string(),
        }),
    }
}

impl ViewParams {
    pub fn from_request(request: &ViewRequest) -> Result<Self, ParamError> {
        let role = match request.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                Some(Role::parse(raw).ok_or_else(|| ParamError::UnknownRole(raw.into()))?)
            }
        };

        let sort = match request.sort.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
            None => PostPlantSort::default(),
            Some(s) if s.is_empty() || s == "attack" || s == "atk" => PostPlantSort::Attack,
            Some(s) if s == "defense" || s == "defence" || s == "def" => PostPlantSort::Defense,
            Some(s) => return Err(ParamError::UnknownSort(s)),
        };

        let ascending = match request.order.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
            None => false,
            Some(s) if s.is_empty() || s.starts_with("desc") => false,
            Some(s) if s.starts_with("asc") => true,
            Some(s) => return Err(ParamError::UnknownOrder(s)),
        };

        if request.top == Some(0) {
            return Err(ParamError::ZeroTop);
        }

        Ok(Self {
            from: parse_date_param("from", request.from.as_deref())?,
            to: parse_date_param("to", request.to.as_deref())?,
            map: request
                .map
                .as_deref()
                .map(MapFilter::parse)
                .unwrap_or_default(),
            player: request
                .player
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            role,
            agents: parse_list(request.agents.as_deref()),
            maps: parse_list(request.maps.as_deref()),
            sort,
            ascending,
            top: request.top,
        })
    }

    fn player(&self) -> Result<&str, ParamError> {
        self.player.as_deref().ok_or(ParamError::Missing("player"))
    }

    fn role(&self) -> Result<Role, ParamError> {
        self.role.ok_or(ParamError::Missing("role"))
    }

    /// Rows inside the requested date range. With no bounds at all every
    /// row is kept, undated ones included.
    fn window<T: Dated + Clone>(&self, rows: &[T]) -> Vec<T> {
        if self.from.is_none() && self.to.is_none() {
            return rows.to_vec();
        }
        let range = DateRange::new(
            self.from.unwrap_or(NaiveDate::MIN),
            self.to.unwrap_or(NaiveDate::MAX),
        );
        filter_by_date_range(rows, &range)
    }
}

/// Display settings the views need from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub thresholds: BandThresholds,
    pub top_compositions: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            thresholds: BandThresholds::default(),
            top_compositions: DEFAULT_TOP_COMPOSITIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    /// Per-map table, by map name
    pub maps: Vec<MapSummary>,

    /// Map names by win rate, best first
    pub ranking: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionsView {
    /// Maps that have at least one valid lineup
    pub maps: Vec<String>,
    pub compositions: Report<Vec<CompositionStat>>,
}

/// Values for populating selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selectors {
    pub maps: Vec<String>,
    pub composition_maps: Vec<String>,
    pub players: Vec<String>,
    pub agents: Vec<String>,
    pub roles: Vec<Role>,
    pub score_dates: Option<DateRange>,
    pub form_dates: Option<DateRange>,
}

/// Map overview: games, wins, draws, losses and win rate.
pub fn overview(tables: &Tables, params: &ViewParams) -> Report<OverviewView> {
    let rows = filter_by_map(&params.window(&tables.scores.rows), &params.map);
    debug!("overview over {} score rows", rows.len());

    map_summary(&rows).map(|maps| {
        let ranking = rank_by_win_rate(maps.clone())
            .into_iter()
            .map(|s| s.map)
            .collect();
        OverviewView { maps, ranking }
    })
}

/// Top lineups. The date range narrows the round records lineups are
/// matched against; the form sheet itself is chunked whole.
pub fn compositions(
    tables: &Tables,
    params: &ViewParams,
    settings: &ViewSettings,
) -> CompositionsView {
    let form = &tables.form.rows;
    let rounds = params.window(&tables.scores.rows);
    let top = params.top.unwrap_or(settings.top_compositions);

    CompositionsView {
        maps: composition_maps(form),
        compositions: composition_win_rates(form, &rounds, &params.map, top),
    }
}

/// Player x agent win-rate grid.
pub fn grid(tables: &Tables, params: &ViewParams) -> Report<WinRateGrid> {
    let mut rows = filter_by_map(&params.window(&tables.acs.rows), &params.map);
    if !params.agents.is_empty() {
        rows = filter_by_agents(&rows, &params.agents);
    }
    player_agent_grid(&rows)
}

/// Attack/defense insights per map, best side average first.
pub fn sides(
    tables: &Tables,
    params: &ViewParams,
    settings: &ViewSettings,
) -> Report<Vec<SideSummary>> {
    let rows = filter_by_map(&params.window(&tables.scores.rows), &params.map);
    side_summary(&rows, &settings.thresholds).map(rank_by_side_average)
}

pub fn post_plant(tables: &Tables, params: &ViewParams) -> Report<Vec<PostPlantSummary>> {
    let rows = filter_by_map(&params.window(&tables.scores.rows), &params.map);
    post_plant_summary(&rows, params.sort, params.ascending)
}

pub fn pistol(tables: &Tables, params: &ViewParams) -> Report<Vec<PistolSummary>> {
    let rows = filter_by_map(&params.window(&tables.scores.rows), &params.map);
    pistol_summary(&rows)
}

pub fn conversions(tables: &Tables, params: &ViewParams) -> Report<Vec<ConversionBreakdown>> {
    let rows = filter_by_map(&params.window(&tables.scores.rows), &params.map);
    conversion_breakdown(&rows)
}

/// Agent performance table for one player.
pub fn player_stats(
    tables: &Tables,
    params: &ViewParams,
) -> Result<Report<Vec<AgentPerformance>>, ParamError> {
    let player = params.player()?;
    let rows = filter_by_map(&params.window(&tables.form.rows), &params.map);
    Ok(agent_performance(&filter_by_player(&rows, player)))
}

/// One player against the benchmark of the selected role.
pub fn compare(
    tables: &Tables,
    params: &ViewParams,
) -> Result<Report<BenchmarkComparison>, ParamError> {
    let player = params.player()?;
    let role = params.role()?;
    let rows = filter_by_map(&params.window(&tables.form.rows), &params.map);
    Ok(benchmark_comparison(&rows, player, role))
}

/// Combat score samples for one player.
pub fn acs(tables: &Tables, params: &ViewParams) -> Result<Report<AcsSpread>, ParamError> {
    let player = params.player()?;
    let mut rows = params.window(&tables.acs.rows);
    if !params.agents.is_empty() {
        rows = filter_by_agents(&rows, &params.agents);
    }
    if !params.maps.is_empty() {
        rows = filter_by_maps(&rows, &params.maps);
    }
    Ok(acs_spread(&rows, player))
}

pub fn selectors(tables: &Tables) -> Selectors {
    let mut maps = available_maps(&tables.scores.rows);
    maps.extend(available_maps(&tables.form.rows));
    maps.sort();
    maps.dedup();

    let mut players = available_players(&tables.form.rows);
    players.extend(available_players(&tables.acs.rows));
    players.sort();
    players.dedup();

    let mut agents = available_agents(&tables.form.rows);
    agents.extend(available_agents(&tables.acs.rows));
    agents.sort();
    agents.dedup();

    Selectors {
        maps,
        composition_maps: composition_maps(&tables.form.rows),
        players,
        agents,
        roles: Role::ALL.to_vec(),
        score_dates: full_date_range(&tables.scores.rows),
        form_dates: full_date_range(&tables.form.rows),
    }
}
