//! Bracket progression: moving results into later games.

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Game, GameId, SourcePosition, SourceRef, TeamId};

/// Reasons a game result cannot be progressed.
#[derive(Debug, Error, PartialEq)]
pub enum ProgressionError {
    #[error("Game {0} is not a playoff game")]
    NotPlayoff(GameId),

    #[error("Game {0} has no playoff game number")]
    MissingGameNumber(GameId),

    #[error("Game {0} is not completed")]
    NotCompleted(GameId),

    #[error("Game {0} has no winner")]
    NoWinner(GameId),
}

/// Fill every playoff slot fed by `game_number` with its winner or loser.
///
/// `games` should hold a single division's bracket, since game numbers are
/// only unique within one. Returns the updated list; games not fed by the
/// completed game are returned unchanged. Applying the same result twice
/// gives the same list as applying it once.
pub fn advance_bracket(
    games: &[Game],
    game_number: u32,
    winner: &TeamId,
    loser: &TeamId,
) -> Vec<Game> {
    let resolve = |source: Option<SourceRef>| {
        match source {
            Some(s) if s.game_number == game_number => match s.position {
                SourcePosition::Winner => Some(winner),
                SourcePosition::Loser => Some(loser),
            },
            _ => None,
        }
    };

    games
        .iter()
        .map(|game| {
            let mut game = game.clone();
            if !game.is_playoff {
                return game;
            }
            if let Some(team) = resolve(game.team1_source) {
                debug!("Game {} team 1 <- {}", game.id, team);
                game.home_team_id = Some(team.clone());
            }
            if let Some(team) = resolve(game.team2_source) {
                debug!("Game {} team 2 <- {}", game.id, team);
                game.away_team_id = Some(team.clone());
            }
            game
        })
        .collect()
}

/// Progress a completed playoff game using its own recorded result.
pub fn advance_from_result(games: &[Game], completed: &Game) -> Result<Vec<Game>, ProgressionError> {
    if !completed.is_playoff {
        return Err(ProgressionError::NotPlayoff(completed.id.clone()));
    }
    let game_number = completed
        .playoff_game_number
        .ok_or_else(|| ProgressionError::MissingGameNumber(completed.id.clone()))?;
    if !completed.is_completed() {
        return Err(ProgressionError::NotCompleted(completed.id.clone()));
    }
    let outcome = completed
        .outcome()
        .ok_or_else(|| ProgressionError::NoWinner(completed.id.clone()))?;

    info!(
        "Advancing game {}: {} wins, {} loses",
        game_number, outcome.winner, outcome.loser
    );
    let updated = advance_bracket(games, game_number, &outcome.winner, &outcome.loser);

    let replay = updated
        .iter()
        .find(|g| g.if_necessary && g.team1_source.map(|s| s.game_number) == Some(game_number));
    if let Some(replay) = replay {
        if needs_if_necessary_game(completed) {
            info!("If-necessary game {} will be played", replay.id);
        } else {
            info!("If-necessary game {} is not needed", replay.id);
        }
    }

    Ok(updated)
}

/// Whether the if-necessary game after this first championship game is played.
///
/// Team 2 of a double-elimination championship game is the losers' bracket
/// finalist; the replay is needed only when that team wins.
pub fn needs_if_necessary_game(championship: &Game) -> bool {
    match (championship.outcome(), championship.away_team_id.as_ref()) {
        (Some(outcome), Some(losers_finalist)) => outcome.winner == *losers_finalist,
        _ => false,
    }
}
