//! Bracket instantiation against seeded teams.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TemplateRegistry;
use crate::models::{
    BracketTemplate, GeneratedPlayoffGame, PlayoffFormat, SeededTeam, SlotRef, TeamId,
};

/// Inputs for generating one division's bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketGenerationOptions {
    pub format: PlayoffFormat,
    pub team_count: u32,
    pub seeded_teams: Vec<SeededTeam>,
}

impl BracketGenerationOptions {
    pub fn new(format: PlayoffFormat, team_count: u32, seeded_teams: Vec<SeededTeam>) -> Self {
        Self {
            format,
            team_count,
            seeded_teams,
        }
    }
}

/// Generate the playoff games for `options`.
///
/// Returns an empty list when the registry has no template for the format
/// and team count.
pub fn generate_bracket(
    registry: &TemplateRegistry,
    options: &BracketGenerationOptions,
) -> Vec<GeneratedPlayoffGame> {
    match registry.lookup(&options.format, options.team_count) {
        Some(template) => instantiate_template(template, &options.seeded_teams),
        None => {
            warn!(
                "No bracket template for {} with {} teams",
                options.format, options.team_count
            );
            Vec::new()
        }
    }
}

/// Resolve a template's seed slots to team ids.
///
/// Source slots, and seeds with no matching team, stay unresolved.
pub fn instantiate_template(
    template: &BracketTemplate,
    seeded_teams: &[SeededTeam],
) -> Vec<GeneratedPlayoffGame> {
    let by_seed: HashMap<u32, &TeamId> = seeded_teams
        .iter()
        .map(|s| (s.seed, &s.team_id))
        .collect();
    let resolve = |slot: SlotRef| -> Option<TeamId> {
        slot.seed()
            .and_then(|seed| by_seed.get(&seed))
            .map(|id| (*id).clone())
    };

    debug!(
        "Instantiating {} template for {} teams ({} games)",
        template.kind,
        template.team_count,
        template.games.len()
    );

    template
        .games
        .iter()
        .map(|matchup| GeneratedPlayoffGame {
            round: matchup.round,
            game_number: matchup.game_number,
            bracket: matchup.bracket,
            if_necessary: matchup.if_necessary,
            team1: matchup.team1,
            team2: matchup.team2,
            team1_id: resolve(matchup.team1),
            team2_id: resolve(matchup.team2),
        })
        .collect()
}
