//! Standings calculation engine.
//!
//! Computes derived rankings from recorded pool-play games:
//! - Per-team records and run ratios
//! - The tie-break cascade for teams level on points
//! - Division-wide and per-pool standings
//! - Playoff qualification and seeding

mod aggregate;
mod seeding;
mod standings;
mod tiebreak;

pub use aggregate::aggregate_stats;
pub use seeding::{select_seeds, QualifyRule, QualifyingTable};
pub use standings::{build_pool_standings, build_standings, standings_for_format};
pub use tiebreak::{compare_ratio, partition_by, resolve_ties, TieBreakStep, CASCADE};
