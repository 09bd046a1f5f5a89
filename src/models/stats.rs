//! Derived statistics: per-team records and standings rows.

use serde::{Deserialize, Serialize};

use super::{PoolId, TeamId};

/// Record and run totals for one team over a set of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub runs_for: u32,
    pub runs_against: u32,
    /// Innings the team batted
    pub offensive_innings: f64,
    /// Innings the team was in the field
    pub defensive_innings: f64,
    pub forfeit_losses: u32,
}

impl TeamStats {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Two points per win, one per tie.
    pub fn points(&self) -> u32 {
        2 * self.wins + self.ties
    }

    /// Runs allowed per defensive inning (RA/DIP). `None` when no defensive
    /// innings have been recorded.
    pub fn runs_allowed_per_inning(&self) -> Option<f64> {
        ratio(self.runs_against, self.defensive_innings)
    }

    /// Runs scored per offensive inning. `None` when no innings were batted.
    pub fn runs_scored_per_inning(&self) -> Option<f64> {
        ratio(self.runs_for, self.offensive_innings)
    }

    pub fn run_differential(&self) -> i64 {
        i64::from(self.runs_for) - i64::from(self.runs_against)
    }
}

fn ratio(runs: u32, innings: f64) -> Option<f64> {
    if innings > 0.0 {
        Some(f64::from(runs) / innings)
    } else {
        None
    }
}

/// One row of a standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team_id: TeamId,
    pub team_name: String,
    pub pool_id: Option<PoolId>,
    /// 1-based, never shared
    pub rank: u32,
    pub points: u32,
    #[serde(flatten)]
    pub stats: TeamStats,
}

impl StandingEntry {
    pub fn runs_allowed_per_inning(&self) -> Option<f64> {
        self.stats.runs_allowed_per_inning()
    }

    pub fn runs_scored_per_inning(&self) -> Option<f64> {
        self.stats.runs_scored_per_inning()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points() {
        let stats = TeamStats {
            wins: 3,
            losses: 1,
            ties: 1,
            ..Default::default()
        };
        assert_eq!(stats.points(), 7);
        assert_eq!(stats.games_played(), 5);
    }

    #[test]
    fn test_runs_allowed_per_inning() {
        let stats = TeamStats {
            runs_against: 9,
            defensive_innings: 20.0,
            ..Default::default()
        };
        assert!((stats.runs_allowed_per_inning().unwrap() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_ratios_undefined_without_innings() {
        let stats = TeamStats {
            runs_for: 4,
            runs_against: 2,
            ..Default::default()
        };
        assert!(stats.runs_allowed_per_inning().is_none());
        assert!(stats.runs_scored_per_inning().is_none());
        assert_eq!(stats.run_differential(), 2);
    }

    #[test]
    fn test_standing_entry_flattens_stats() {
        let entry = StandingEntry {
            team_id: "t1".into(),
            team_name: "Rockets".to_string(),
            pool_id: None,
            rank: 1,
            points: 4,
            stats: TeamStats {
                wins: 2,
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["wins"], 2);
        assert_eq!(json["rank"], 1);
    }
}
