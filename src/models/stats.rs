//! Aggregated statistics models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Metric, Outcome, Report, Role, SecondRoundCode};

/// Thresholds for the win-rate colour band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            low: 0.40,
            high: 0.60,
        }
    }
}

/// Display band for a win rate. Only used to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinRateBand {
    High,
    Mid,
    Low,
}

impl WinRateBand {
    /// Classify a win rate given as a fraction.
    pub fn from_win_rate(win_rate: f64, thresholds: &BandThresholds) -> Self {
        if win_rate >= thresholds.high {
            WinRateBand::High
        } else if win_rate < thresholds.low {
            WinRateBand::Low
        } else {
            WinRateBand::Mid
        }
    }
}

impl std::fmt::Display for WinRateBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinRateBand::High => write!(f, "high"),
            WinRateBand::Mid => write!(f, "mid"),
            WinRateBand::Low => write!(f, "low"),
        }
    }
}

/// Win/draw/loss tally for a group of map instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        self.games += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    /// Win rate as a fraction (0.0 to 1.0).
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

impl FromIterator<Outcome> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut counts = OutcomeCounts::default();
        for outcome in iter {
            counts.record(outcome);
        }
        counts
    }
}

/// Per-map results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub map: String,

    #[serde(flatten)]
    pub counts: OutcomeCounts,

    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,
}

impl MapSummary {
    pub fn new(map: String, counts: OutcomeCounts) -> Self {
        Self {
            map,
            win_rate: counts.win_rate(),
            counts,
        }
    }
}

/// Results of one five-agent lineup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionStat {
    /// Agent names in sorted order
    pub agents: Vec<String>,

    #[serde(flatten)]
    pub counts: OutcomeCounts,

    pub win_rate: f64,
}

impl CompositionStat {
    pub fn new(agents: Vec<String>, counts: OutcomeCounts) -> Self {
        Self {
            agents,
            win_rate: counts.win_rate(),
            counts,
        }
    }

    /// Lineup joined with dashes, e.g. `Jett-Omen-Skye-Sova-Viper`.
    pub fn label(&self) -> String {
        self.agents.join("-")
    }
}

/// Player x agent matrix of win-rate percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateGrid {
    pub players: Vec<String>,
    pub agents: Vec<String>,

    /// `cells[p][a]` is the win rate (0 to 100) of `players[p]` on `agents[a]`
    pub cells: Vec<Vec<f64>>,
}

impl WinRateGrid {
    pub fn get(&self, player: &str, agent: &str) -> Option<f64> {
        let p = self.players.iter().position(|x| x == player)?;
        let a = self.agents.iter().position(|x| x == agent)?;
        self.cells.get(p)?.get(a).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

/// Attack/defense breakdown for one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSummary {
    pub map: String,

    #[serde(flatten)]
    pub counts: OutcomeCounts,

    /// Mean attack round win rate
    pub attack_win_rate: Option<f64>,

    /// Mean defense round win rate
    pub defense_win_rate: Option<f64>,

    /// Unweighted mean of the attack and defense rates
    pub round_win_rate: Option<f64>,

    pub attack_post_plant: Option<f64>,
    pub defense_post_plant: Option<f64>,

    pub attack_band: Option<WinRateBand>,
    pub defense_band: Option<WinRateBand>,
    pub round_band: Option<WinRateBand>,
}

/// Post-plant and retake success for one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPlantSummary {
    pub map: String,
    pub attack: Option<f64>,
    pub defense: Option<f64>,
}

/// Pistol round results for one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PistolSummary {
    pub map: String,
    pub pistols_won: u32,
    pub pistols_played: u32,
    pub win_rate: f64,
}

/// Count and share of one second-round code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeShare {
    pub code: SecondRoundCode,
    pub count: u32,
    pub share: f64,
}

/// Second-round outcomes for one map, split by the pistol result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionBreakdown {
    pub map: String,

    /// `WW` and `WL` shares
    pub after_pistol_win: Report<Vec<CodeShare>>,

    /// `LL` and `LW` shares
    pub after_pistol_loss: Report<Vec<CodeShare>>,
}

/// One player's totals on one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPerformance {
    pub agent: String,
    pub games: u32,
    pub rounds: f64,
    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
    pub acs: Option<f64>,
    pub first_kills: f64,
    pub first_deaths: f64,
    pub first_deaths_defense: f64,
    pub plants: f64,

    /// Kills / deaths, undefined when deaths is zero
    pub kd_ratio: Option<f64>,

    /// (Kills + assists) / rounds, undefined when rounds is zero
    pub kills_assists_per_round: Option<f64>,

    /// First kills minus first deaths
    pub first_kill_diff: f64,

    /// Share of first deaths taken on defense (0 to 100)
    pub first_deaths_on_defense_pct: Option<f64>,
}

/// Player value against the role reference for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDelta {
    pub metric: Metric,
    pub label: &'static str,
    pub player_value: Option<f64>,
    pub benchmark: f64,

    /// `player_value - benchmark`; positive means the player is above
    pub delta: Option<f64>,

    /// Player value divided by the metric's radar scale
    pub player_normalized: Option<f64>,
    pub benchmark_normalized: f64,

    /// Signed delta formatted for display
    pub display: String,
}

/// A player's role averages compared with the role benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub player: String,
    pub role: Role,

    /// Agents of this role the player used in the selection
    pub agents: Vec<String>,

    pub deltas: Vec<BenchmarkDelta>,
}

impl BenchmarkComparison {
    pub fn get(&self, metric: Metric) -> Option<&BenchmarkDelta> {
        self.deltas.iter().find(|d| d.metric == metric)
    }
}

/// One combat score sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcsPoint {
    pub date: Option<NaiveDate>,
    pub map: Option<String>,
    pub agent: String,
    pub acs: f64,
}

/// Combat score samples for one player and their mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcsSpread {
    pub player: String,
    pub mean: f64,
    pub points: Vec<AcsPoint>,
}
