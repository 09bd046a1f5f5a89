//! Playoff qualification and seeding.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::compare_ratio;
use crate::models::{PlayoffFormat, PoolId, SeededTeam, StandingEntry};

/// How many teams qualify for a format, and how they are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum QualifyRule {
    /// The top `count` division-wide ranks
    Top { count: u32 },
    /// Every team
    All,
    /// The top `per_pool` local ranks of each pool, seeded pool winners first
    PoolLeaders { pools: u32, per_pool: u32 },
}

impl QualifyRule {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            QualifyRule::Top { count: 0 } => Err("top rule needs a count above 0".to_string()),
            QualifyRule::PoolLeaders { pools, per_pool } if *pools == 0 || *per_pool == 0 => {
                Err("pool_leaders rule needs pools and per_pool above 0".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Qualifying rules keyed by format identifier.
///
/// Identifiers without an entry fall back to their numbered pattern
/// (`top_N`, `single_elim_N`, `double_elim_N` qualify N), then to `All`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingTable {
    rules: BTreeMap<String, QualifyRule>,
}

impl Default for QualifyingTable {
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(
            "top_8_four_pools".to_string(),
            QualifyRule::PoolLeaders {
                pools: 4,
                per_pool: 2,
            },
        );
        rules.insert(
            "championship_consolation".to_string(),
            QualifyRule::Top { count: 4 },
        );
        rules.insert("all_seeded".to_string(), QualifyRule::All);
        rules.insert("single_elimination".to_string(), QualifyRule::All);
        rules.insert("double_elimination".to_string(), QualifyRule::All);
        Self { rules }
    }
}

impl QualifyingTable {
    /// Add or replace the rule for a format identifier.
    pub fn with_rule(mut self, identifier: impl Into<String>, rule: QualifyRule) -> Self {
        self.rules.insert(identifier.into(), rule);
        self
    }

    pub fn rule_for(&self, format: &PlayoffFormat) -> QualifyRule {
        if let Some(rule) = self.rules.get(&format.to_string()) {
            return *rule;
        }
        match format {
            PlayoffFormat::Top(n) | PlayoffFormat::SingleElim(n) | PlayoffFormat::DoubleElim(n) => {
                QualifyRule::Top { count: *n }
            }
            PlayoffFormat::Unknown(identifier) => {
                warn!("Unknown playoff format '{}', qualifying every team", identifier);
                QualifyRule::All
            }
            _ => QualifyRule::All,
        }
    }
}

/// Pick and seed playoff teams from ranked standings.
///
/// For `Top` and `All`, `standings` should hold division-wide ranks; for
/// `PoolLeaders`, pool-local ranks. Fewer teams than the rule asks for is
/// not an error here: the shortfall is reported when the bracket is built.
pub fn select_seeds(
    standings: &[StandingEntry],
    format: &PlayoffFormat,
    table: &QualifyingTable,
) -> Vec<SeededTeam> {
    let rule = table.rule_for(format);
    debug!("Seeding {} with {:?}", format, rule);

    let qualifiers: Vec<&StandingEntry> = match rule {
        QualifyRule::Top { count } => by_rank(standings).into_iter().take(count as usize).collect(),
        QualifyRule::All => by_rank(standings),
        QualifyRule::PoolLeaders { pools, per_pool } => pool_leaders(standings, pools, per_pool),
    };

    qualifiers
        .into_iter()
        .enumerate()
        .map(|(i, entry)| SeededTeam {
            team_id: entry.team_id.clone(),
            seed: (i + 1) as u32,
        })
        .collect()
}

fn by_rank(standings: &[StandingEntry]) -> Vec<&StandingEntry> {
    let mut ordered: Vec<&StandingEntry> = standings.iter().collect();
    ordered.sort_by_key(|e| e.rank);
    ordered
}

/// All pool winners first, then all runners-up, and so on. Within a tier
/// teams are ordered by RA/DIP, never by their raw record.
fn pool_leaders(standings: &[StandingEntry], pools: u32, per_pool: u32) -> Vec<&StandingEntry> {
    let mut by_pool: BTreeMap<Option<&PoolId>, Vec<&StandingEntry>> = BTreeMap::new();
    for entry in standings {
        by_pool.entry(entry.pool_id.as_ref()).or_default().push(entry);
    }
    if by_pool.len() != pools as usize {
        warn!(
            "Pool seeding expects {} pools but standings have {}",
            pools,
            by_pool.len()
        );
    }

    let mut seeded = Vec::new();
    for tier in 1..=per_pool {
        let mut tier_entries: Vec<&StandingEntry> = by_pool
            .values()
            .filter_map(|entries| entries.iter().find(|e| e.rank == tier).copied())
            .collect();
        tier_entries.sort_by(|a, b| compare_within_tier(a, b));
        seeded.extend(tier_entries);
    }
    seeded
}

fn compare_within_tier(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    compare_ratio(a.runs_allowed_per_inning(), b.runs_allowed_per_inning(), true)
        .then_with(|| {
            compare_ratio(a.runs_scored_per_inning(), b.runs_scored_per_inning(), false)
        })
        .then_with(|| b.points.cmp(&a.points))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then_with(|| a.team_id.cmp(&b.team_id))
}
