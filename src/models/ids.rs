//! Deterministic ID generation using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// An entity ID. Either handed in by the persistence layer or derived
/// from a content hash.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId from a raw string.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate an EntityId from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    /// ID of a playoff game row created from a generated bracket.
    pub fn playoff_game(
        tournament_id: &TournamentId,
        division_id: Option<&DivisionId>,
        game_number: u32,
    ) -> Self {
        Self::generate(&[
            tournament_id.as_str(),
            division_id.map(|d| d.as_str()).unwrap_or(""),
            "playoff",
            &game_number.to_string(),
        ])
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for team IDs
pub type TeamId = EntityId;

/// Type alias for game IDs
pub type GameId = EntityId;

/// Type alias for pool IDs
pub type PoolId = EntityId;

/// Type alias for division IDs
pub type DivisionId = EntityId;

/// Type alias for tournament IDs
pub type TournamentId = EntityId;
