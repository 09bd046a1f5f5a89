//! # Playoff Engine
//!
//! Standings, tie-breaks, seeding and playoff brackets for youth baseball
//! tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, games, standings, brackets)
//! - **calculate**: Records, the tie-break cascade, standings and seeding
//! - **bracket**: Bracket templates, generation and progression
//! - **storage**: JSONL tournament snapshots
//! - **config**: Configuration loading and validation
//!
//! Everything under `calculate` and `bracket` is a pure function of its
//! inputs; only `storage` and `config` touch the filesystem.

pub mod bracket;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
