//! Tournament snapshots: the teams and games handed to the engine.

use std::collections::HashMap;

use tracing::{debug, info};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{DivisionId, Game, GameId, Team, TournamentId};

/// All stored teams and games of one tournament, or of one division of it.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentSnapshot {
    pub tournament_id: TournamentId,
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
}

impl TournamentSnapshot {
    pub fn new(tournament_id: TournamentId, teams: Vec<Team>, games: Vec<Game>) -> Self {
        Self {
            tournament_id,
            teams,
            games,
        }
    }

    /// Load a tournament from its JSONL files.
    pub fn load(config: &StorageConfig, tournament_id: &TournamentId) -> Result<Self, StorageError> {
        if !config.tournament_dir(tournament_id).is_dir() {
            return Err(StorageError::TournamentNotFound(tournament_id.clone()));
        }

        let teams: Vec<Team> =
            JsonlReader::for_entity(config, EntityType::Team, tournament_id).read_all()?;
        let games: Vec<Game> =
            JsonlReader::for_entity(config, EntityType::Game, tournament_id).read_all()?;
        info!(
            "Loaded tournament {}: {} teams, {} games",
            tournament_id,
            teams.len(),
            games.len()
        );

        Ok(Self::new(tournament_id.clone(), teams, games))
    }

    /// Write both files, replacing what is stored.
    pub fn save(&self, config: &StorageConfig) -> Result<(), StorageError> {
        JsonlWriter::for_entity(config, EntityType::Team, &self.tournament_id)
            .write_all(&self.teams)?;
        JsonlWriter::for_entity(config, EntityType::Game, &self.tournament_id)
            .write_all(&self.games)?;
        Ok(())
    }

    /// Append new games to the stored games file.
    pub fn append_games(
        config: &StorageConfig,
        tournament_id: &TournamentId,
        games: &[Game],
    ) -> Result<usize, StorageError> {
        JsonlWriter::for_entity(config, EntityType::Game, tournament_id).append_batch(games)
    }

    /// The teams and games of one division; `None` keeps everything.
    pub fn division(&self, division_id: Option<&DivisionId>) -> Self {
        let Some(division_id) = division_id else {
            return self.clone();
        };
        let in_division = |d: &Option<DivisionId>| d.as_ref() == Some(division_id);

        Self {
            tournament_id: self.tournament_id.clone(),
            teams: self
                .teams
                .iter()
                .filter(|t| in_division(&t.division_id))
                .cloned()
                .collect(),
            games: self
                .games
                .iter()
                .filter(|g| in_division(&g.division_id))
                .cloned()
                .collect(),
        }
    }

    pub fn playoff_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.is_playoff)
    }

    pub fn has_playoff_games(&self) -> bool {
        self.playoff_games().next().is_some()
    }

    pub fn game(&self, id: &GameId) -> Option<&Game> {
        self.games.iter().find(|g| &g.id == id)
    }

    /// Replace stored games with updated copies, matched by id.
    ///
    /// Returns how many stored games changed; ids not in the snapshot are ignored.
    pub fn apply_games(&mut self, updated: Vec<Game>) -> usize {
        let mut by_id: HashMap<GameId, Game> =
            updated.into_iter().map(|g| (g.id.clone(), g)).collect();
        let mut changed = 0;

        for game in &mut self.games {
            if let Some(new) = by_id.remove(&game.id) {
                if *game != new {
                    *game = new;
                    changed += 1;
                }
            }
        }

        debug!("Applied {} game updates", changed);
        changed
    }
}
