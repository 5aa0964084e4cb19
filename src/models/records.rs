//! Typed rows produced by the loader.
//!
//! Every numeric field is optional: a blank or unparsable cell is `None` and
//! is left out of sums and means rather than being read as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Outcome, SecondRoundCode, Side};

/// One map played, from the round-score sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRoundRecord {
    pub date: Option<NaiveDate>,
    pub map: String,
    pub outcome: Outcome,

    /// Side the team started the map on
    pub start: Option<Side>,

    /// Round win rate in the first half (fraction)
    pub first_half_wr: Option<f64>,

    /// Round win rate in the second half (fraction)
    pub second_half_wr: Option<f64>,

    pub first_pistol: Option<u32>,
    pub second_pistol: Option<u32>,

    /// Post-plant success on attack (fraction)
    pub atk_post_plant: Option<f64>,

    /// Retake success on defense (fraction)
    pub def_post_plant: Option<f64>,

    pub atk_second_round: Option<SecondRoundCode>,
    pub def_second_round: Option<SecondRoundCode>,
}

impl MatchRoundRecord {
    /// Minimal record; everything except the key fields is unset.
    pub fn new(map: impl Into<String>, outcome: Outcome, date: Option<NaiveDate>) -> Self {
        Self {
            date,
            map: map.into(),
            outcome,
            start: None,
            first_half_wr: None,
            second_half_wr: None,
            first_pistol: None,
            second_pistol: None,
            atk_post_plant: None,
            def_post_plant: None,
            atk_second_round: None,
            def_second_round: None,
        }
    }

    /// Builder method to set the half win rates and the starting side.
    pub fn with_halves(mut self, start: Side, first: f64, second: f64) -> Self {
        self.start = Some(start);
        self.first_half_wr = Some(first);
        self.second_half_wr = Some(second);
        self
    }

    /// Builder method to set pistol round results.
    pub fn with_pistols(mut self, first: u32, second: u32) -> Self {
        self.first_pistol = Some(first);
        self.second_pistol = Some(second);
        self
    }

    /// Builder method to set post-plant and retake success.
    pub fn with_post_plant(mut self, attack: Option<f64>, defense: Option<f64>) -> Self {
        self.atk_post_plant = attack;
        self.def_post_plant = defense;
        self
    }

    /// Builder method to set the second round codes.
    pub fn with_second_rounds(
        mut self,
        attack: Option<SecondRoundCode>,
        defense: Option<SecondRoundCode>,
    ) -> Self {
        self.atk_second_round = attack;
        self.def_second_round = defense;
        self
    }

    /// Round win rate for the given side.
    ///
    /// The half played on `side` depends on which side the team started on,
    /// so the column is chosen per row. A row missing either half rate is
    /// treated as having no side data at all.
    pub fn side_win_rate(&self, side: Side) -> Option<f64> {
        let start = self.start?;
        let first = self.first_half_wr?;
        let second = self.second_half_wr?;
        if start == side {
            Some(first)
        } else {
            Some(second)
        }
    }
}

/// One player on one agent for one map instance, from the form sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerAgentRecord {
    pub date: Option<NaiveDate>,
    pub map: String,
    pub player: Option<String>,
    pub agent: String,
    pub result: Option<Outcome>,
    pub rounds: Option<f64>,
    pub kills: Option<f64>,
    pub deaths: Option<f64>,
    pub assists: Option<f64>,
    pub acs: Option<f64>,
    pub first_kills: Option<f64>,
    pub first_deaths: Option<f64>,

    /// First deaths taken while defending
    pub first_deaths_defense: Option<f64>,

    pub plants: Option<f64>,
    pub multi_kills: Option<f64>,

    /// First blood success rate (fraction)
    pub fbsr: Option<f64>,

    /// First kills per round
    pub fkpr: Option<f64>,

    /// Kills per round
    pub kpr: Option<f64>,

    /// Attack entry rate (fraction)
    pub atk_entry: Option<f64>,

    /// Seconds held on site as anchor
    pub anchor_time: Option<f64>,
}

impl PlayerAgentRecord {
    /// Row with only the composition fields set.
    pub fn new(map: impl Into<String>, agent: impl Into<String>, result: Option<Outcome>) -> Self {
        Self {
            map: map.into(),
            agent: agent.into(),
            result,
            ..Default::default()
        }
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// One player-agent result with its combat score, from the ACS sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResultRecord {
    pub date: Option<NaiveDate>,
    pub player: String,
    pub agent: String,
    pub map: Option<String>,
    pub result: Option<Outcome>,
    pub acs: Option<f64>,
}

impl AgentResultRecord {
    pub fn new(player: impl Into<String>, agent: impl Into<String>, result: Option<Outcome>) -> Self {
        Self {
            date: None,
            player: player.into(),
            agent: agent.into(),
            map: None,
            result,
            acs: None,
        }
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }

    pub fn with_acs(mut self, acs: f64) -> Self {
        self.acs = Some(acs);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
