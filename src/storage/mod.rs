//! Filesystem snapshot storage.
//!
//! Each tournament lives in its own directory of JSONL files:
//! - `teams.jsonl`: registered teams with pool and division
//! - `games.jsonl`: pool-play and playoff games

pub mod jsonl;
mod snapshot;

pub use jsonl::{list_tournaments, EntityType, JsonlReader, JsonlWriter};
pub use snapshot::TournamentSnapshot;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::TournamentId;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    pub fn tournament_dir(&self, tournament_id: &TournamentId) -> PathBuf {
        self.tournaments_dir().join(tournament_id.as_str())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.tournaments_dir(), PathBuf::from("/data/tournaments"));
        assert_eq!(
            config.tournament_dir(&TournamentId::from("spring-classic")),
            PathBuf::from("/data/tournaments/spring-classic")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
