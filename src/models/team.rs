//! Team model.

use serde::{Deserialize, Serialize};

use super::{DivisionId, PoolId, TeamId};

/// A team entered in a tournament division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: TeamId,

    /// Display name, also the last-resort tie-break
    pub name: String,

    /// Round-robin pool the team plays in
    #[serde(default)]
    pub pool_id: Option<PoolId>,

    /// Division the team belongs to
    #[serde(default)]
    pub division_id: Option<DivisionId>,
}

impl Team {
    /// Create a new Team outside any pool or division.
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pool_id: None,
            division_id: None,
        }
    }

    /// Builder method to set the pool.
    pub fn with_pool(mut self, pool_id: impl Into<PoolId>) -> Self {
        self.pool_id = Some(pool_id.into());
        self
    }

    /// Builder method to set the division.
    pub fn with_division(mut self, division_id: impl Into<DivisionId>) -> Self {
        self.division_id = Some(division_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_builder() {
        let team = Team::new("t1", "Riverside Rockets")
            .with_pool("A")
            .with_division("13u");

        assert_eq!(team.id.as_str(), "t1");
        assert_eq!(team.name, "Riverside Rockets");
        assert_eq!(team.pool_id.as_ref().map(|p| p.as_str()), Some("A"));
        assert_eq!(team.division_id.as_ref().map(|d| d.as_str()), Some("13u"));
    }

    #[test]
    fn test_team_deserialize_without_optional_fields() {
        let team: Team = serde_json::from_str(r#"{"id":"t2","name":"Lakeshore"}"#).unwrap();
        assert!(team.pool_id.is_none());
        assert!(team.division_id.is_none());
    }
}
