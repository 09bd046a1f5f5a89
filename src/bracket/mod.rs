//! Playoff brackets.
//!
//! - Template registry: hand-written and generated bracket layouts
//! - Generation: template instantiation against seeded teams
//! - Progression: moving results into later games
//!
//! [`plan_bracket`] runs standings, seeding and generation for one division
//! and reports configuration problems as [`BracketError`].

mod data;
mod generator;
mod progression;
mod templates;

pub use generator::{generate_bracket, instantiate_template, BracketGenerationOptions};
pub use progression::{
    advance_bracket, advance_from_result, needs_if_necessary_game, ProgressionError,
};
pub use templates::{
    single_elimination, validate_template, TemplateError, TemplateRegistry, MAX_GENERATED_TEAMS,
};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{select_seeds, standings_for_format, QualifyingTable};
use crate::models::{
    Game, GeneratedPlayoffGame, PlayoffFormat, SeededTeam, StandingEntry, Team,
};

/// Why a bracket could not be planned.
#[derive(Debug, Error, PartialEq)]
pub enum BracketError {
    #[error("Playoff format '{0}' is not supported")]
    UnsupportedFormat(String),

    #[error("No bracket template for {format} with {team_count} teams")]
    NoTemplate { format: String, team_count: u32 },

    #[error("Not enough teams for {format}: {required} needed, {available} qualified")]
    NotEnoughTeams {
        format: String,
        required: u32,
        available: u32,
    },
}

/// A division's bracket along with the standings and seeds behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketPlan {
    pub format: PlayoffFormat,
    pub standings: Vec<StandingEntry>,
    pub seeds: Vec<SeededTeam>,
    pub games: Vec<GeneratedPlayoffGame>,
}

/// Rank, seed and instantiate a bracket for one division.
pub fn plan_bracket(
    teams: &[Team],
    games: &[Game],
    format: &PlayoffFormat,
    qualifying: &QualifyingTable,
    registry: &TemplateRegistry,
) -> Result<BracketPlan, BracketError> {
    if format.bracket_kind().is_none() {
        return Err(BracketError::UnsupportedFormat(format.to_string()));
    }

    let standings = standings_for_format(teams, games, format);
    let seeds = select_seeds(&standings, format, qualifying);
    let available = seeds.len() as u32;
    let team_count = format.bracket_team_count(seeds.len());

    let required = team_count.max(2);
    if available < required {
        warn!(
            "{} needs {} teams but only {} qualified",
            format, required, available
        );
        return Err(BracketError::NotEnoughTeams {
            format: format.to_string(),
            required,
            available,
        });
    }

    let template = registry
        .lookup(format, team_count)
        .ok_or_else(|| BracketError::NoTemplate {
            format: format.to_string(),
            team_count,
        })?;

    let seeds: Vec<SeededTeam> = seeds.into_iter().take(team_count as usize).collect();
    let bracket_games = instantiate_template(template, &seeds);
    info!(
        "Planned {} bracket: {} teams, {} games",
        format,
        team_count,
        bracket_games.len()
    );

    Ok(BracketPlan {
        format: format.clone(),
        standings,
        seeds,
        games: bracket_games,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pooled_division() -> (Vec<Team>, Vec<Game>) {
        let mut teams = Vec::new();
        let mut games = Vec::new();
        for pool in ["A", "B", "C", "D"] {
            let ids: Vec<String> = (1..=3).map(|i| format!("{}{}", pool.to_lowercase(), i)).collect();
            for id in &ids {
                teams.push(Team::new(id.as_str(), id.to_uppercase()).with_pool(pool));
            }
            // 1 beats 2 and 3, 2 beats 3.
            games.push(
                Game::new(format!("{}-12", pool), ids[0].as_str(), ids[1].as_str())
                    .with_final_score(4, 1)
                    .in_pool(pool),
            );
            games.push(
                Game::new(format!("{}-13", pool), ids[0].as_str(), ids[2].as_str())
                    .with_final_score(6, 2)
                    .in_pool(pool),
            );
            games.push(
                Game::new(format!("{}-23", pool), ids[1].as_str(), ids[2].as_str())
                    .with_final_score(3, 0)
                    .in_pool(pool),
            );
        }
        (teams, games)
    }

    #[test]
    fn test_plan_four_pool_bracket() {
        let (teams, games) = pooled_division();

        let plan = plan_bracket(
            &teams,
            &games,
            &PlayoffFormat::TopEightFourPools,
            &QualifyingTable::default(),
            &TemplateRegistry::builtin(),
        )
        .unwrap();

        assert_eq!(plan.seeds.len(), 8);
        assert_eq!(plan.games.len(), 7);
        assert!(plan.seeds[..4]
            .iter()
            .all(|s| s.team_id.as_str().ends_with('1')));
        assert!(plan.seeds[4..]
            .iter()
            .all(|s| s.team_id.as_str().ends_with('2')));
    }

    #[test]
    fn test_plan_not_enough_teams() {
        let (teams, games) = pooled_division();

        let result = plan_bracket(
            &teams[..5],
            &games,
            &PlayoffFormat::Top(6),
            &QualifyingTable::default(),
            &TemplateRegistry::builtin(),
        );

        assert_eq!(
            result,
            Err(BracketError::NotEnoughTeams {
                format: "top_6".to_string(),
                required: 6,
                available: 5,
            })
        );
    }

    #[test]
    fn test_plan_unknown_format() {
        let (teams, games) = pooled_division();

        let result = plan_bracket(
            &teams,
            &games,
            &PlayoffFormat::parse("swiss_system"),
            &QualifyingTable::default(),
            &TemplateRegistry::builtin(),
        );

        assert!(matches!(result, Err(BracketError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_plan_missing_template() {
        let (teams, games) = pooled_division();

        let result = plan_bracket(
            &teams,
            &games,
            &PlayoffFormat::DoubleElim(6),
            &QualifyingTable::default(),
            &TemplateRegistry::builtin(),
        );

        assert_eq!(
            result,
            Err(BracketError::NoTemplate {
                format: "double_elim_6".to_string(),
                team_count: 6,
            })
        );
    }

    #[test]
    fn test_plan_all_seeded_uses_every_team() {
        let (teams, games) = pooled_division();

        let plan = plan_bracket(
            &teams,
            &games,
            &PlayoffFormat::AllSeeded,
            &QualifyingTable::default(),
            &TemplateRegistry::builtin(),
        )
        .unwrap();

        assert_eq!(plan.seeds.len(), 12);
        assert_eq!(plan.games.len(), 11);
    }
}
