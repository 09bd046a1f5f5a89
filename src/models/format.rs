//! Playoff format identifiers.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shape of an elimination bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    SingleElimination,
    DoubleElimination,
    /// Semifinals, then a championship and a third-place game
    ChampionshipConsolation,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::SingleElimination => write!(f, "single_elimination"),
            BracketKind::DoubleElimination => write!(f, "double_elimination"),
            BracketKind::ChampionshipConsolation => write!(f, "championship_consolation"),
        }
    }
}

/// A tournament's playoff format, parsed from its identifier string.
///
/// Parsing never fails: unrecognised identifiers are kept as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayoffFormat {
    /// `top_N`
    Top(u32),
    /// `top_8_four_pools`
    TopEightFourPools,
    /// `championship_consolation`
    ChampionshipConsolation,
    /// `all_seeded`
    AllSeeded,
    /// `single_elim_N`
    SingleElim(u32),
    /// `double_elim_N`
    DoubleElim(u32),
    /// Legacy `single_elimination`
    SingleElimination,
    /// Legacy `double_elimination`
    DoubleElimination,
    Unknown(String),
}

fn numbered_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(top|single_elim|double_elim)_(\d+)$").expect("format pattern is valid")
    })
}

impl PlayoffFormat {
    pub fn parse(identifier: &str) -> Self {
        let identifier = identifier.trim();
        match identifier {
            "top_8_four_pools" => return PlayoffFormat::TopEightFourPools,
            "championship_consolation" => return PlayoffFormat::ChampionshipConsolation,
            "all_seeded" => return PlayoffFormat::AllSeeded,
            "single_elimination" => return PlayoffFormat::SingleElimination,
            "double_elimination" => return PlayoffFormat::DoubleElimination,
            _ => {}
        }

        if let Some(caps) = numbered_format().captures(identifier) {
            if let Ok(n) = caps[2].parse::<u32>() {
                match &caps[1] {
                    "top" => return PlayoffFormat::Top(n),
                    "single_elim" => return PlayoffFormat::SingleElim(n),
                    "double_elim" => return PlayoffFormat::DoubleElim(n),
                    _ => {}
                }
            }
        }

        PlayoffFormat::Unknown(identifier.to_string())
    }

    /// Bracket shape used by this format, `None` for unknown formats.
    pub fn bracket_kind(&self) -> Option<BracketKind> {
        match self {
            PlayoffFormat::Top(_)
            | PlayoffFormat::TopEightFourPools
            | PlayoffFormat::AllSeeded
            | PlayoffFormat::SingleElim(_)
            | PlayoffFormat::SingleElimination => Some(BracketKind::SingleElimination),
            PlayoffFormat::DoubleElim(_) | PlayoffFormat::DoubleElimination => {
                Some(BracketKind::DoubleElimination)
            }
            PlayoffFormat::ChampionshipConsolation => Some(BracketKind::ChampionshipConsolation),
            PlayoffFormat::Unknown(_) => None,
        }
    }

    /// Number of teams the bracket is built for, given how many qualified.
    pub fn bracket_team_count(&self, qualifiers: usize) -> u32 {
        match self {
            PlayoffFormat::Top(n) | PlayoffFormat::SingleElim(n) | PlayoffFormat::DoubleElim(n) => *n,
            PlayoffFormat::TopEightFourPools => 8,
            PlayoffFormat::ChampionshipConsolation => 4,
            PlayoffFormat::AllSeeded
            | PlayoffFormat::SingleElimination
            | PlayoffFormat::DoubleElimination
            | PlayoffFormat::Unknown(_) => u32::try_from(qualifiers).unwrap_or(u32::MAX),
        }
    }

    /// Whether standings are ranked per pool and seeded pool-winners first.
    pub fn uses_pool_seeding(&self) -> bool {
        matches!(self, PlayoffFormat::TopEightFourPools)
    }
}

impl fmt::Display for PlayoffFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayoffFormat::Top(n) => write!(f, "top_{}", n),
            PlayoffFormat::TopEightFourPools => write!(f, "top_8_four_pools"),
            PlayoffFormat::ChampionshipConsolation => write!(f, "championship_consolation"),
            PlayoffFormat::AllSeeded => write!(f, "all_seeded"),
            PlayoffFormat::SingleElim(n) => write!(f, "single_elim_{}", n),
            PlayoffFormat::DoubleElim(n) => write!(f, "double_elim_{}", n),
            PlayoffFormat::SingleElimination => write!(f, "single_elimination"),
            PlayoffFormat::DoubleElimination => write!(f, "double_elimination"),
            PlayoffFormat::Unknown(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PlayoffFormat {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for PlayoffFormat {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<PlayoffFormat> for String {
    fn from(format: PlayoffFormat) -> Self {
        format.to_string()
    }
}
