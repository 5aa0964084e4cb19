//! Per-player statistics: agent performance, role benchmarks, ACS spread.

use std::collections::BTreeMap;

use crate::calculate::{format_delta, mean, ratio, sum};
use crate::filter::{filter_by_player, filter_by_role};
use crate::models::{
    AcsPoint, AcsSpread, AgentPerformance, AgentResultRecord, BenchmarkComparison,
    BenchmarkDelta, Metric, PlayerAgentRecord, Report, Role,
};

fn group_by_agent<'a>(
    rows: impl IntoIterator<Item = &'a PlayerAgentRecord>,
) -> BTreeMap<&'a str, Vec<&'a PlayerAgentRecord>> {
    let mut groups: BTreeMap<&str, Vec<&PlayerAgentRecord>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.agent.as_str()).or_default().push(row);
    }
    groups
}

/// Totals and derived ratios per agent, sorted by agent name.
///
/// `rows` should already be narrowed to one player.
pub fn agent_performance(rows: &[PlayerAgentRecord]) -> Report<Vec<AgentPerformance>> {
    let table = group_by_agent(rows)
        .into_iter()
        .map(|(agent, group)| {
            let rounds = sum(group.iter().map(|r| r.rounds));
            let kills = sum(group.iter().map(|r| r.kills));
            let deaths = sum(group.iter().map(|r| r.deaths));
            let assists = sum(group.iter().map(|r| r.assists));
            let first_kills = sum(group.iter().map(|r| r.first_kills));
            let first_deaths = sum(group.iter().map(|r| r.first_deaths));
            let first_deaths_defense = sum(group.iter().map(|r| r.first_deaths_defense));

            AgentPerformance {
                agent: agent.to_string(),
                games: group.len() as u32,
                rounds,
                kills,
                deaths,
                assists,
                acs: mean(group.iter().map(|r| r.acs)),
                first_kills,
                first_deaths,
                first_deaths_defense,
                plants: sum(group.iter().map(|r| r.plants)),
                kd_ratio: ratio(kills, deaths),
                kills_assists_per_round: ratio(kills + assists, rounds),
                first_kill_diff: first_kills - first_deaths,
                first_deaths_on_defense_pct: ratio(first_deaths_defense, first_deaths)
                    .map(|share| share * 100.0),
            }
        })
        .collect();

    Report::from_rows(table)
}

/// Value of a per-row metric.
fn row_metric(row: &PlayerAgentRecord, metric: Metric) -> Option<f64> {
    match metric {
        Metric::Acs => row.acs,
        Metric::Kpr => row.kpr,
        Metric::Fbsr => row.fbsr,
        Metric::Fkpr => row.fkpr,
        Metric::AtkEntry => row.atk_entry,
        Metric::FirstDeaths => row.first_deaths,
        Metric::Assists => row.assists,
        Metric::MultiKills => row.multi_kills,
        Metric::AnchorTime => row.anchor_time,
        Metric::KillsAssistsPerRound => ratio(row.kills? + row.assists?, row.rounds?),
    }
}

/// Player's value for `metric` over the rows of one role.
///
/// K+A per round is pooled over every row. Other metrics are averaged per
/// agent first, then across agents, so a heavily played agent does not
/// drown out the others.
fn role_value(groups: &BTreeMap<&str, Vec<&PlayerAgentRecord>>, metric: Metric) -> Option<f64> {
    if metric == Metric::KillsAssistsPerRound {
        let rows = || groups.values().flatten();
        let kills = sum(rows().map(|r| r.kills));
        let assists = sum(rows().map(|r| r.assists));
        return ratio(kills + assists, sum(rows().map(|r| r.rounds)));
    }

    mean(
        groups
            .values()
            .map(|group| mean(group.iter().map(|r| row_metric(r, metric)))),
    )
}

/// Compare `player`'s rows on agents of `role` with the role benchmark.
///
/// A metric the player has no values for keeps its benchmark but has no
/// delta. `NoData` when the player never played the role in `rows`.
pub fn benchmark_comparison(
    rows: &[PlayerAgentRecord],
    player: &str,
    role: Role,
) -> Report<BenchmarkComparison> {
    let role_rows = filter_by_role(&filter_by_player(rows, player), role);
    let groups = group_by_agent(&role_rows);
    if groups.is_empty() {
        return Report::NoData;
    }

    let deltas = role
        .benchmark()
        .values
        .iter()
        .map(|&(metric, benchmark)| {
            let player_value = role_value(&groups, metric);
            let delta = player_value.map(|v| v - benchmark);
            let scale = metric.radar_scale();

            BenchmarkDelta {
                metric,
                label: metric.label(),
                player_value,
                benchmark,
                delta,
                player_normalized: player_value.map(|v| v / scale),
                benchmark_normalized: benchmark / scale,
                display: format_delta(delta, metric.is_rate()),
            }
        })
        .collect();

    Report::Ready(BenchmarkComparison {
        player: player.to_string(),
        role,
        agents: groups.keys().map(|a| a.to_string()).collect(),
        deltas,
    })
}

/// Combat score samples for `player` and their mean.
///
/// Rows without a score are not samples.
pub fn acs_spread(rows: &[AgentResultRecord], player: &str) -> Report<AcsSpread> {
    let points: Vec<AcsPoint> = rows
        .iter()
        .filter(|r| r.player == player)
        .filter_map(|r| {
            Some(AcsPoint {
                date: r.date,
                map: r.map.clone(),
                agent: r.agent.clone(),
                acs: r.acs?,
            })
        })
        .collect();

    let Some(average) = mean(points.iter().map(|p| Some(p.acs))) else {
        return Report::NoData;
    };

    Report::Ready(AcsSpread {
        player: player.to_string(),
        mean: average,
        points,
    })
}
