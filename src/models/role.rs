//! Agent roles and the pro-league reference values for each role.

use serde::{Deserialize, Serialize};

/// Tactical role of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Controller,
    Duelist,
    Initiator,
    Sentinel,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Controller,
        Role::Duelist,
        Role::Initiator,
        Role::Sentinel,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "controller" => Some(Role::Controller),
            "duelist" => Some(Role::Duelist),
            "initiator" => Some(Role::Initiator),
            "sentinel" => Some(Role::Sentinel),
            _ => None,
        }
    }

    /// Role of an agent, or `None` for an agent not in the table.
    pub fn of_agent(agent: &str) -> Option<Self> {
        let agent = agent.trim();
        AGENT_ROLES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(agent))
            .map(|(_, role)| *role)
    }

    /// Reference values for this role.
    pub fn benchmark(self) -> RoleBenchmark {
        let values: &'static [(Metric, f64)] = match self {
            Role::Duelist => &[
                (Metric::Acs, 240.0),
                (Metric::Kpr, 0.90),
                (Metric::Fbsr, 0.55),
                (Metric::Fkpr, 0.18),
                (Metric::AtkEntry, 0.55),
            ],
            Role::Initiator => &[
                (Metric::Acs, 196.0),
                (Metric::Kpr, 0.90),
                (Metric::FirstDeaths, 2.0),
                (Metric::KillsAssistsPerRound, 1.0),
                (Metric::Assists, 10.0),
            ],
            Role::Controller => &[
                (Metric::Acs, 203.0),
                (Metric::Kpr, 0.90),
                (Metric::FirstDeaths, 2.0),
                (Metric::KillsAssistsPerRound, 1.0),
                (Metric::MultiKills, 0.25),
            ],
            Role::Sentinel => &[
                (Metric::Acs, 200.0),
                (Metric::Kpr, 0.90),
                (Metric::FirstDeaths, 2.0),
                (Metric::MultiKills, 0.25),
                (Metric::AnchorTime, 48.0),
            ],
        };
        RoleBenchmark { role: self, values }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Controller => write!(f, "Controller"),
            Role::Duelist => write!(f, "Duelist"),
            Role::Initiator => write!(f, "Initiator"),
            Role::Sentinel => write!(f, "Sentinel"),
        }
    }
}

const AGENT_ROLES: &[(&str, Role)] = &[
    ("Jett", Role::Duelist),
    ("Raze", Role::Duelist),
    ("Reyna", Role::Duelist),
    ("Yoru", Role::Duelist),
    ("Phoenix", Role::Duelist),
    ("Iso", Role::Duelist),
    ("Waylay", Role::Duelist),
    ("Neon", Role::Duelist),
    ("Skye", Role::Initiator),
    ("KAY/O", Role::Initiator),
    ("Breach", Role::Initiator),
    ("Fade", Role::Initiator),
    ("Sova", Role::Initiator),
    ("Gekko", Role::Initiator),
    ("Tejo", Role::Initiator),
    ("Omen", Role::Controller),
    ("Brimstone", Role::Controller),
    ("Astra", Role::Controller),
    ("Viper", Role::Controller),
    ("Harbor", Role::Controller),
    ("Clove", Role::Controller),
    ("Killjoy", Role::Sentinel),
    ("Cypher", Role::Sentinel),
    ("Chamber", Role::Sentinel),
    ("Sage", Role::Sentinel),
    ("Deadlock", Role::Sentinel),
    ("Vyse", Role::Sentinel),
];

/// A per-agent statistic that can be compared against a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Acs,
    Kpr,
    Fbsr,
    Fkpr,
    AtkEntry,
    FirstDeaths,
    KillsAssistsPerRound,
    Assists,
    MultiKills,
    AnchorTime,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Acs => "ACS",
            Metric::Kpr => "KPR",
            Metric::Fbsr => "FBSR",
            Metric::Fkpr => "FKPR",
            Metric::AtkEntry => "Atk Entry",
            Metric::FirstDeaths => "FD",
            Metric::KillsAssistsPerRound => "K+A per Round",
            Metric::Assists => "Assists",
            Metric::MultiKills => "Multi Kills",
            Metric::AnchorTime => "Anchor Time",
        }
    }

    /// Value that maps to the outer ring of the radar chart.
    pub fn radar_scale(self) -> f64 {
        match self {
            Metric::Acs => 300.0,
            Metric::Kpr => 1.2,
            Metric::Fbsr => 1.0,
            Metric::Fkpr => 0.3,
            Metric::AtkEntry => 1.0,
            Metric::FirstDeaths => 20.0,
            Metric::KillsAssistsPerRound => 1.2,
            Metric::Assists => 20.0,
            Metric::MultiKills => 0.3,
            Metric::AnchorTime => 80.0,
        }
    }

    /// Rate metrics are shown as percentages.
    pub fn is_rate(self) -> bool {
        matches!(self, Metric::Fbsr | Metric::Fkpr | Metric::AtkEntry)
    }
}

/// Static reference values for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoleBenchmark {
    pub role: Role,
    pub values: &'static [(Metric, f64)],
}

impl RoleBenchmark {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.values.iter().map(|(m, _)| *m)
    }
}
