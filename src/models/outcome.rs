//! Categorical values that appear in the input sheets.

use serde::{Deserialize, Serialize};

/// Result of one map instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Normalize a sheet value. Case and surrounding whitespace are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "win" | "w" | "won" => Some(Outcome::Win),
            "draw" | "d" | "tie" => Some(Outcome::Draw),
            "loss" | "l" | "lose" | "lost" => Some(Outcome::Loss),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "Win"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::Loss => write!(f, "Loss"),
        }
    }
}

/// The side a team plays in a half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attack,
    Defense,
}

impl Side {
    /// Both spellings of defence are used in the score sheet.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "attack" | "atk" | "att" => Some(Side::Attack),
            "defence" | "defense" | "def" => Some(Side::Defense),
            _ => None,
        }
    }
}

/// Pistol round result followed by the second round result.
///
/// `WW`/`WL` follow a won pistol (conversion), `LL`/`LW` follow a lost one
/// (eco round).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecondRoundCode {
    WW,
    WL,
    LL,
    LW,
}

impl SecondRoundCode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "WW" => Some(SecondRoundCode::WW),
            "WL" => Some(SecondRoundCode::WL),
            "LL" => Some(SecondRoundCode::LL),
            "LW" => Some(SecondRoundCode::LW),
            _ => None,
        }
    }

    /// Whether the pistol round preceding this second round was won.
    pub fn after_pistol_win(self) -> bool {
        matches!(self, SecondRoundCode::WW | SecondRoundCode::WL)
    }
}

impl std::fmt::Display for SecondRoundCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            SecondRoundCode::WW => "WW",
            SecondRoundCode::WL => "WL",
            SecondRoundCode::LL => "LL",
            SecondRoundCode::LW => "LW",
        };
        write!(f, "{}", code)
    }
}
