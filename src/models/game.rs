//! Game model: pool-play and playoff games share one record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BracketType, DivisionId, GameId, PoolId, SourceRef, TeamId, TournamentId};

/// Reporting status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Completed,
}

/// Which side, if any, forfeited a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForfeitStatus {
    #[default]
    None,
    Home,
    Away,
}

/// Home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Decided result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: TeamId,
    pub loser: TeamId,
}

/// A scheduled or completed game.
///
/// Playoff games use `home_team_id` as team 1 and `away_team_id` as team 2.
/// Either may be `None` until the source game named by `team1_source` /
/// `team2_source` has been decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier
    pub id: GameId,

    #[serde(default)]
    pub tournament_id: Option<TournamentId>,

    #[serde(default)]
    pub division_id: Option<DivisionId>,

    #[serde(default)]
    pub pool_id: Option<PoolId>,

    #[serde(default)]
    pub home_team_id: Option<TeamId>,

    #[serde(default)]
    pub away_team_id: Option<TeamId>,

    #[serde(default)]
    pub home_score: Option<u32>,

    #[serde(default)]
    pub away_score: Option<u32>,

    /// Innings the home side batted (decimal, e.g. 5.2 after a walk-off)
    #[serde(default)]
    pub home_innings_batted: Option<f64>,

    /// Innings the away side batted
    #[serde(default)]
    pub away_innings_batted: Option<f64>,

    #[serde(default)]
    pub status: GameStatus,

    #[serde(default)]
    pub forfeit_status: ForfeitStatus,

    /// Scheduled date
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub is_playoff: bool,

    #[serde(default)]
    pub playoff_round: Option<u32>,

    /// Unique within a division's bracket
    #[serde(default)]
    pub playoff_game_number: Option<u32>,

    #[serde(default)]
    pub playoff_bracket: Option<BracketType>,

    #[serde(default)]
    pub team1_source: Option<SourceRef>,

    #[serde(default)]
    pub team2_source: Option<SourceRef>,

    /// Second championship game, only played if the losers' bracket finalist wins the first
    #[serde(default)]
    pub if_necessary: bool,
}

impl Game {
    /// Create a scheduled pool-play game.
    pub fn new(id: impl Into<GameId>, home: impl Into<TeamId>, away: impl Into<TeamId>) -> Self {
        Self {
            home_team_id: Some(home.into()),
            away_team_id: Some(away.into()),
            ..Self::empty(id.into())
        }
    }

    /// A game with no teams assigned yet.
    pub fn empty(id: GameId) -> Self {
        Self {
            id,
            tournament_id: None,
            division_id: None,
            pool_id: None,
            home_team_id: None,
            away_team_id: None,
            home_score: None,
            away_score: None,
            home_innings_batted: None,
            away_innings_batted: None,
            status: GameStatus::Scheduled,
            forfeit_status: ForfeitStatus::None,
            date: None,
            is_playoff: false,
            playoff_round: None,
            playoff_game_number: None,
            playoff_bracket: None,
            team1_source: None,
            team2_source: None,
            if_necessary: false,
        }
    }

    /// Record a final score and mark the game completed.
    pub fn with_final_score(mut self, home: u32, away: u32) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self.status = GameStatus::Completed;
        self
    }

    /// Builder method to set innings batted by each side.
    pub fn with_innings(mut self, home: f64, away: f64) -> Self {
        self.home_innings_batted = Some(home);
        self.away_innings_batted = Some(away);
        self
    }

    /// Builder method to mark a forfeit.
    pub fn with_forfeit(mut self, forfeit: ForfeitStatus) -> Self {
        self.forfeit_status = forfeit;
        self
    }

    /// Builder method to set the pool.
    pub fn in_pool(mut self, pool_id: impl Into<PoolId>) -> Self {
        self.pool_id = Some(pool_id.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    /// Which side the team played, if it played at all.
    pub fn side_of(&self, team_id: &TeamId) -> Option<Side> {
        if self.home_team_id.as_ref() == Some(team_id) {
            Some(Side::Home)
        } else if self.away_team_id.as_ref() == Some(team_id) {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn team(&self, side: Side) -> Option<&TeamId> {
        match side {
            Side::Home => self.home_team_id.as_ref(),
            Side::Away => self.away_team_id.as_ref(),
        }
    }

    /// Runs scored by a side; unreported scores count as zero.
    pub fn runs(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score.unwrap_or(0),
            Side::Away => self.away_score.unwrap_or(0),
        }
    }

    /// Innings batted by a side; unreported innings count as zero.
    pub fn innings_batted(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_innings_batted.unwrap_or(0.0),
            Side::Away => self.away_innings_batted.unwrap_or(0.0),
        }
    }

    pub fn forfeited_by(&self, side: Side) -> bool {
        matches!(
            (self.forfeit_status, side),
            (ForfeitStatus::Home, Side::Home) | (ForfeitStatus::Away, Side::Away)
        )
    }

    /// Winner and loser of a completed game. A forfeit always loses,
    /// whatever the reported score; a tie has no outcome.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.is_completed() {
            return None;
        }
        let home = self.home_team_id.clone()?;
        let away = self.away_team_id.clone()?;

        let home_wins = match self.forfeit_status {
            ForfeitStatus::Home => false,
            ForfeitStatus::Away => true,
            ForfeitStatus::None => match self.runs(Side::Home).cmp(&self.runs(Side::Away)) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => return None,
            },
        };

        Some(if home_wins {
            GameOutcome {
                winner: home,
                loser: away,
            }
        } else {
            GameOutcome {
                winner: away,
                loser: home,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of() {
        let game = Game::new("g1", "a", "b");
        assert_eq!(game.side_of(&"a".into()), Some(Side::Home));
        assert_eq!(game.side_of(&"b".into()), Some(Side::Away));
        assert_eq!(game.side_of(&"c".into()), None);
    }

    #[test]
    fn test_outcome_by_score() {
        let game = Game::new("g1", "a", "b").with_final_score(3, 5);
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.winner.as_str(), "b");
        assert_eq!(outcome.loser.as_str(), "a");
    }

    #[test]
    fn test_outcome_forfeit_overrides_score() {
        let game = Game::new("g1", "a", "b")
            .with_final_score(9, 0)
            .with_forfeit(ForfeitStatus::Home);
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.winner.as_str(), "b");
    }

    #[test]
    fn test_outcome_tie_and_scheduled() {
        assert!(Game::new("g1", "a", "b").with_final_score(4, 4).outcome().is_none());
        assert!(Game::new("g2", "a", "b").outcome().is_none());
    }

    #[test]
    fn test_outcome_requires_both_teams() {
        let mut game = Game::empty("g1".into()).with_final_score(1, 0);
        game.home_team_id = Some("a".into());
        assert!(game.outcome().is_none());
    }

    #[test]
    fn test_game_deserialize_minimal_record() {
        let json = r#"{"id":"g1","home_team_id":"a","away_team_id":"b","home_score":2,"away_score":1,"status":"completed","forfeit_status":"none"}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert!(game.is_completed());
        assert!(!game.is_playoff);
        assert_eq!(game.innings_batted(Side::Home), 0.0);
    }
}
