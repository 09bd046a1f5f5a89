//! JSONL (JSON Lines) storage.
//!
//! One JSON object per line, one file per entity type and tournament.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::TournamentId;

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Team,
    Game,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Team => "teams.jsonl",
            EntityType::Game => "games.jsonl",
        }
    }
}

/// Get the path of a tournament's entity file.
pub fn entity_path(
    config: &StorageConfig,
    entity: EntityType,
    tournament_id: &TournamentId,
) -> PathBuf {
    config
        .tournament_dir(tournament_id)
        .join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for one tournament's entity file.
    pub fn for_entity(
        config: &StorageConfig,
        entity: EntityType,
        tournament_id: &TournamentId,
    ) -> Self {
        Self::new(entity_path(config, entity, tournament_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append entities to the end of the file.
    pub fn append_batch(&self, entities: &[T]) -> Result<usize, StorageError> {
        if entities.is_empty() {
            return Ok(0);
        }

        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let count = Self::write_lines(BufWriter::new(file), entities)?;
        info!("Appended {} entities to {:?}", count, self.path);
        Ok(count)
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let count = Self::write_lines(BufWriter::new(file), entities)?;
        info!("Wrote {} entities to {:?}", count, self.path);
        Ok(count)
    }

    fn write_lines(mut writer: BufWriter<File>, entities: &[T]) -> Result<usize, StorageError> {
        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;
        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for one tournament's entity file.
    pub fn for_entity(
        config: &StorageConfig,
        entity: EntityType,
        tournament_id: &TournamentId,
    ) -> Self {
        Self::new(entity_path(config, entity, tournament_id))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities. A missing file reads as empty; unparseable lines
    /// are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Read entities matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}

/// Find all tournament directories, sorted by id.
pub fn list_tournaments(config: &StorageConfig) -> Result<Vec<TournamentId>, StorageError> {
    let dir = config.tournaments_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut tournaments = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                tournaments.push(TournamentId::from(name));
            }
        }
    }

    tournaments.sort();
    Ok(tournaments)
}
