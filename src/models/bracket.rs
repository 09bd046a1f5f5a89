//! Playoff bracket models: template matchups and generated games.

use serde::{Deserialize, Serialize};

use super::{BracketKind, DivisionId, EntityId, Game, TeamId, TournamentId};

/// Which part of a bracket a game belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Winners,
    Losers,
    Championship,
    /// Third-place game
    Consolation,
}

impl std::fmt::Display for BracketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketType::Winners => write!(f, "winners"),
            BracketType::Losers => write!(f, "losers"),
            BracketType::Championship => write!(f, "championship"),
            BracketType::Consolation => write!(f, "consolation"),
        }
    }
}

/// Which result of a source game fills a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePosition {
    Winner,
    Loser,
}

/// Pointer from a team slot to the winner or loser of another game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub game_number: u32,
    pub position: SourcePosition,
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            SourcePosition::Winner => write!(f, "W{}", self.game_number),
            SourcePosition::Loser => write!(f, "L{}", self.game_number),
        }
    }
}

/// How a team slot in a template is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRef {
    Seed(u32),
    Source(SourceRef),
    Unset,
}

impl SlotRef {
    pub fn source(&self) -> Option<SourceRef> {
        match self {
            SlotRef::Source(source) => Some(*source),
            _ => None,
        }
    }

    pub fn seed(&self) -> Option<u32> {
        match self {
            SlotRef::Seed(seed) => Some(*seed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotRef::Seed(seed) => write!(f, "#{}", seed),
            SlotRef::Source(source) => write!(f, "{}", source),
            SlotRef::Unset => write!(f, "TBD"),
        }
    }
}

/// Slot filled by a seed.
pub const fn seed(n: u32) -> SlotRef {
    SlotRef::Seed(n)
}

/// Slot filled by the winner of a game.
pub const fn winner_of(game_number: u32) -> SlotRef {
    SlotRef::Source(SourceRef {
        game_number,
        position: SourcePosition::Winner,
    })
}

/// Slot filled by the loser of a game.
pub const fn loser_of(game_number: u32) -> SlotRef {
    SlotRef::Source(SourceRef {
        game_number,
        position: SourcePosition::Loser,
    })
}

/// One game of a bracket template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatchup {
    pub round: u32,
    pub game_number: u32,
    pub bracket: BracketType,
    pub team1: SlotRef,
    pub team2: SlotRef,
    #[serde(default)]
    pub if_necessary: bool,
}

impl BracketMatchup {
    pub const fn new(
        round: u32,
        game_number: u32,
        bracket: BracketType,
        team1: SlotRef,
        team2: SlotRef,
    ) -> Self {
        Self {
            round,
            game_number,
            bracket,
            team1,
            team2,
            if_necessary: false,
        }
    }

    pub const fn if_necessary(mut self) -> Self {
        self.if_necessary = true;
        self
    }

    pub fn slots(&self) -> [SlotRef; 2] {
        [self.team1, self.team2]
    }
}

/// A complete bracket for one kind and team count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTemplate {
    pub kind: BracketKind,
    pub team_count: u32,
    pub games: Vec<BracketMatchup>,
}

impl BracketTemplate {
    pub fn new(kind: BracketKind, team_count: u32, games: Vec<BracketMatchup>) -> Self {
        Self {
            kind,
            team_count,
            games,
        }
    }

    pub fn game(&self, game_number: u32) -> Option<&BracketMatchup> {
        self.games.iter().find(|g| g.game_number == game_number)
    }

    pub fn round_count(&self) -> u32 {
        self.games.iter().map(|g| g.round).max().unwrap_or(0)
    }
}

/// A qualifying team and its playoff seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team_id: TeamId,
    pub seed: u32,
}

/// A bracket game instantiated against seeded teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlayoffGame {
    pub round: u32,
    pub game_number: u32,
    pub bracket: BracketType,
    pub if_necessary: bool,
    /// Template slot, kept so unresolved sides can be progressed later
    pub team1: SlotRef,
    pub team2: SlotRef,
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
}

impl GeneratedPlayoffGame {
    pub fn team1_source(&self) -> Option<SourceRef> {
        self.team1.source()
    }

    pub fn team2_source(&self) -> Option<SourceRef> {
        self.team2.source()
    }

    /// Convert into a playoff game row with a deterministic id.
    pub fn into_game(self, tournament_id: &TournamentId, division_id: Option<&DivisionId>) -> Game {
        let id = EntityId::playoff_game(tournament_id, division_id, self.game_number);
        let mut game = Game::empty(id);
        game.tournament_id = Some(tournament_id.clone());
        game.division_id = division_id.cloned();
        game.home_team_id = self.team1_id;
        game.away_team_id = self.team2_id;
        game.is_playoff = true;
        game.playoff_round = Some(self.round);
        game.playoff_game_number = Some(self.game_number);
        game.playoff_bracket = Some(self.bracket);
        game.team1_source = self.team1.source();
        game.team2_source = self.team2.source();
        game.if_necessary = self.if_necessary;
        game
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_helpers() {
        assert_eq!(seed(3).seed(), Some(3));
        assert_eq!(
            winner_of(2).source(),
            Some(SourceRef {
                game_number: 2,
                position: SourcePosition::Winner
            })
        );
        assert_eq!(loser_of(2).seed(), None);
        assert_eq!(SlotRef::Unset.source(), None);
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(seed(1).to_string(), "#1");
        assert_eq!(winner_of(4).to_string(), "W4");
        assert_eq!(loser_of(5).to_string(), "L5");
        assert_eq!(SlotRef::Unset.to_string(), "TBD");
    }

    #[test]
    fn test_slot_serialization() {
        assert_eq!(serde_json::to_string(&seed(2)).unwrap(), r#"{"seed":2}"#);
        assert_eq!(
            serde_json::to_string(&loser_of(3)).unwrap(),
            r#"{"source":{"game_number":3,"position":"loser"}}"#
        );
        assert_eq!(serde_json::to_string(&SlotRef::Unset).unwrap(), r#""unset""#);
    }

    #[test]
    fn test_generated_game_into_game() {
        let generated = GeneratedPlayoffGame {
            round: 2,
            game_number: 5,
            bracket: BracketType::Winners,
            if_necessary: false,
            team1: seed(1),
            team2: winner_of(2),
            team1_id: Some("t1".into()),
            team2_id: None,
        };
        let tournament = EntityId::from("spring");
        let division = EntityId::from("13u");

        let game = generated.into_game(&tournament, Some(&division));

        assert!(game.is_playoff);
        assert_eq!(game.id, EntityId::playoff_game(&tournament, Some(&division), 5));
        assert_eq!(game.home_team_id.as_ref().map(|t| t.as_str()), Some("t1"));
        assert!(game.away_team_id.is_none());
        assert!(game.team1_source.is_none());
        assert_eq!(game.team2_source.map(|s| s.game_number), Some(2));
        assert_eq!(game.playoff_round, Some(2));
    }

    #[test]
    fn test_template_round_count() {
        let template = BracketTemplate::new(
            BracketKind::SingleElimination,
            2,
            vec![BracketMatchup::new(
                1,
                1,
                BracketType::Championship,
                seed(1),
                seed(2),
            )],
        );
        assert_eq!(template.round_count(), 1);
        assert!(template.game(1).is_some());
        assert!(template.game(2).is_none());
    }
}
