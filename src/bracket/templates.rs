//! Bracket template registry and validation.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::data;
use crate::models::{
    seed, winner_of, BracketKind, BracketMatchup, BracketTemplate, BracketType, PlayoffFormat,
    SlotRef, SourcePosition,
};

/// Largest field the single-elimination builder covers.
pub const MAX_GENERATED_TEAMS: u32 = 16;

/// Template loading and validation errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid {kind} template for {team_count} teams: {reason}")]
    Invalid {
        kind: BracketKind,
        team_count: u32,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<BracketTemplate>,
}

/// Templates keyed by bracket kind and team count.
///
/// Built once at start-up and passed by reference to the generator.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<(BracketKind, u32), BracketTemplate>,
}

impl TemplateRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hand-written tables, plus generated single-elimination brackets
    /// for every other field size from 2 to [`MAX_GENERATED_TEAMS`].
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let tables: [(BracketKind, u32, &[BracketMatchup]); 7] = [
            (BracketKind::SingleElimination, 4, &data::SINGLE_ELIM_4),
            (BracketKind::SingleElimination, 6, &data::SINGLE_ELIM_6),
            (BracketKind::SingleElimination, 8, &data::SINGLE_ELIM_8),
            (
                BracketKind::ChampionshipConsolation,
                4,
                &data::CHAMPIONSHIP_CONSOLATION_4,
            ),
            (BracketKind::DoubleElimination, 4, &data::DOUBLE_ELIM_4),
            (BracketKind::DoubleElimination, 8, &data::DOUBLE_ELIM_8),
            (BracketKind::DoubleElimination, 12, &data::DOUBLE_ELIM_12),
        ];
        for (kind, team_count, games) in tables {
            registry.put(BracketTemplate::new(kind, team_count, games.to_vec()));
        }

        for team_count in 2..=MAX_GENERATED_TEAMS {
            if registry.get(BracketKind::SingleElimination, team_count).is_none() {
                if let Some(template) = single_elimination(team_count) {
                    registry.put(template);
                }
            }
        }
        registry
    }

    pub fn get(&self, kind: BracketKind, team_count: u32) -> Option<&BracketTemplate> {
        self.templates.get(&(kind, team_count))
    }

    /// Template for a playoff format and field size, `None` when unsupported.
    pub fn lookup(&self, format: &PlayoffFormat, team_count: u32) -> Option<&BracketTemplate> {
        let kind = format.bracket_kind()?;
        self.get(kind, team_count)
    }

    /// Validate and add a template, returning the one it replaced.
    pub fn insert(
        &mut self,
        template: BracketTemplate,
    ) -> Result<Option<BracketTemplate>, TemplateError> {
        validate_template(&template)?;
        Ok(self.put(template))
    }

    /// Load `[[templates]]` from a TOML file, replacing built-ins with the
    /// same kind and team count. Nothing is added if any template is invalid.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, TemplateError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TemplateError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TemplateFile = toml::from_str(&contents)?;

        for template in &file.templates {
            validate_template(template)?;
        }

        let count = file.templates.len();
        for template in file.templates {
            if self.put(template).is_some() {
                debug!("Template from {} replaced a built-in", path.display());
            }
        }
        info!("Loaded {} bracket templates from {}", count, path.display());
        Ok(count)
    }

    pub fn templates(&self) -> impl Iterator<Item = &BracketTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn put(&mut self, template: BracketTemplate) -> Option<BracketTemplate> {
        self.templates
            .insert((template.kind, template.team_count), template)
    }
}

/// Build a standard single-elimination bracket (1 v N, 2 v N-1, ...).
///
/// When the field is not a power of two the top seeds get first-round
/// byes and enter in round 2. Returns `None` below two teams.
pub fn single_elimination(team_count: u32) -> Option<BracketTemplate> {
    if team_count < 2 {
        return None;
    }

    let size = team_count.next_power_of_two();
    let mut order = vec![1u32];
    while (order.len() as u32) < size {
        let width = order.len() as u32 * 2;
        order = order.iter().flat_map(|&s| [s, width + 1 - s]).collect();
    }

    let rounds = size.trailing_zeros();
    let mut slots: Vec<SlotRef> = order
        .into_iter()
        .map(|s| if s <= team_count { seed(s) } else { SlotRef::Unset })
        .collect();
    let mut games = Vec::with_capacity(team_count as usize - 1);
    let mut game_number = 1;

    for round in 1..=rounds {
        let bracket = if round == rounds {
            BracketType::Championship
        } else {
            BracketType::Winners
        };
        let mut advancing = Vec::with_capacity(slots.len() / 2);
        for pair in slots.chunks(2) {
            match (pair[0], pair[1]) {
                (slot, SlotRef::Unset) | (SlotRef::Unset, slot) => advancing.push(slot),
                (team1, team2) => {
                    games.push(BracketMatchup::new(round, game_number, bracket, team1, team2));
                    advancing.push(winner_of(game_number));
                    game_number += 1;
                }
            }
        }
        slots = advancing;
    }

    Some(BracketTemplate::new(
        BracketKind::SingleElimination,
        team_count,
        games,
    ))
}

/// Check a template's structure.
///
/// Game numbers are unique, each seed `1..=team_count` is placed exactly
/// once, every source points at a game in an earlier round, and no winner
/// or loser is sent to two games. An if-necessary game must replay the
/// winner and loser of a championship game whose team 2 came through the
/// losers' bracket.
pub fn validate_template(template: &BracketTemplate) -> Result<(), TemplateError> {
    let invalid = |reason: String| TemplateError::Invalid {
        kind: template.kind,
        team_count: template.team_count,
        reason,
    };

    if template.games.is_empty() {
        return Err(invalid("template has no games".to_string()));
    }

    let mut rounds: HashMap<u32, u32> = HashMap::new();
    for game in &template.games {
        if game.round == 0 {
            return Err(invalid(format!("game {} has round 0", game.game_number)));
        }
        if rounds.insert(game.game_number, game.round).is_some() {
            return Err(invalid(format!("duplicate game number {}", game.game_number)));
        }
    }

    let mut seeds = BTreeSet::new();
    let mut sources = HashSet::new();
    for game in &template.games {
        for slot in game.slots() {
            match slot {
                SlotRef::Seed(s) => {
                    if s == 0 || s > template.team_count {
                        return Err(invalid(format!(
                            "game {} uses seed {} outside 1..={}",
                            game.game_number, s, template.team_count
                        )));
                    }
                    if !seeds.insert(s) {
                        return Err(invalid(format!("seed {} is placed twice", s)));
                    }
                }
                SlotRef::Source(source) => {
                    match rounds.get(&source.game_number) {
                        None => {
                            return Err(invalid(format!(
                                "game {} references missing game {}",
                                game.game_number, source.game_number
                            )))
                        }
                        Some(round) if *round >= game.round => {
                            return Err(invalid(format!(
                                "game {} (round {}) references {} from round {}",
                                game.game_number, game.round, source, round
                            )))
                        }
                        Some(_) => {}
                    }
                    if !sources.insert(source) {
                        return Err(invalid(format!("{} feeds more than one game", source)));
                    }
                }
                SlotRef::Unset => {}
            }
        }

        if game.if_necessary && !replays_championship(template, game) {
            return Err(invalid(format!(
                "if-necessary game {} does not replay a championship game",
                game.game_number
            )));
        }
    }

    if seeds.len() != template.team_count as usize {
        return Err(invalid(format!(
            "{} of {} seeds are placed",
            seeds.len(),
            template.team_count
        )));
    }

    Ok(())
}

fn replays_championship(template: &BracketTemplate, game: &BracketMatchup) -> bool {
    let (Some(first), Some(second)) = (game.team1.source(), game.team2.source()) else {
        return false;
    };
    if first.game_number != second.game_number || first.position == second.position {
        return false;
    }
    let Some(championship) = template.game(first.game_number) else {
        return false;
    };
    if championship.bracket != BracketType::Championship {
        return false;
    }

    // Team 2 of the first championship game is the losers' bracket finalist.
    championship
        .team2
        .source()
        .filter(|s| s.position == SourcePosition::Winner)
        .and_then(|s| template.game(s.game_number))
        .is_some_and(|feeder| feeder.bracket == BracketType::Losers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loser_of;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn game_count(registry: &TemplateRegistry, format: &str, team_count: u32) -> Option<usize> {
        registry
            .lookup(&PlayoffFormat::parse(format), team_count)
            .map(|t| t.games.len())
    }

    #[test]
    fn test_builtin_game_counts() {
        let registry = TemplateRegistry::builtin();

        assert_eq!(game_count(&registry, "top_4", 4), Some(3));
        assert_eq!(game_count(&registry, "top_6", 6), Some(5));
        assert_eq!(game_count(&registry, "top_8", 8), Some(7));
        assert_eq!(game_count(&registry, "top_8_four_pools", 8), Some(7));
        assert_eq!(game_count(&registry, "championship_consolation", 4), Some(4));
        assert_eq!(game_count(&registry, "double_elim_4", 4), Some(7));
        assert_eq!(game_count(&registry, "double_elim_8", 8), Some(15));
        assert_eq!(game_count(&registry, "double_elim_12", 12), Some(22));
    }

    #[test]
    fn test_unknown_lookup_is_none() {
        let registry = TemplateRegistry::builtin();

        assert!(registry.lookup(&PlayoffFormat::parse("round_robin"), 8).is_none());
        assert!(registry.lookup(&PlayoffFormat::DoubleElim(6), 6).is_none());
        assert!(registry.lookup(&PlayoffFormat::ChampionshipConsolation, 8).is_none());
        assert!(registry.lookup(&PlayoffFormat::Top(1), 1).is_none());
    }

    #[test]
    fn test_every_builtin_template_is_valid() {
        let registry = TemplateRegistry::builtin();
        assert!(!registry.is_empty());

        for template in registry.templates() {
            if let Err(e) = validate_template(template) {
                panic!("{}", e);
            }
        }
    }

    #[test]
    fn test_every_winner_advances_except_finals() {
        let registry = TemplateRegistry::builtin();

        for template in registry.templates() {
            let referenced: HashSet<u32> = template
                .games
                .iter()
                .flat_map(|g| g.slots())
                .filter_map(|slot| slot.source())
                .filter(|s| s.position == SourcePosition::Winner)
                .map(|s| s.game_number)
                .collect();
            for game in &template.games {
                if matches!(
                    game.bracket,
                    BracketType::Winners | BracketType::Losers
                ) {
                    assert!(
                        referenced.contains(&game.game_number),
                        "{} {}: winner of game {} goes nowhere",
                        template.kind,
                        template.team_count,
                        game.game_number
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_elimination_games() {
        for team_count in 2..=MAX_GENERATED_TEAMS {
            let template = single_elimination(team_count).unwrap();
            assert_eq!(template.games.len() as u32, team_count - 1);
            assert_eq!(
                template.games.last().map(|g| g.bracket),
                Some(BracketType::Championship)
            );
        }
        assert!(single_elimination(1).is_none());
    }

    #[test]
    fn test_hand_written_tables_match_builder() {
        let cases: [(u32, &[BracketMatchup]); 3] = [
            (4, &data::SINGLE_ELIM_4),
            (6, &data::SINGLE_ELIM_6),
            (8, &data::SINGLE_ELIM_8),
        ];
        for (team_count, table) in cases {
            let built = single_elimination(team_count).unwrap();
            assert_eq!(built.games, table.to_vec());
        }
    }

    #[test]
    fn test_single_elimination_byes_go_to_top_seeds() {
        let template = single_elimination(5).unwrap();

        let round_one: Vec<[SlotRef; 2]> = template
            .games
            .iter()
            .filter(|g| g.round == 1)
            .map(|g| g.slots())
            .collect();
        assert_eq!(round_one, vec![[seed(4), seed(5)]]);
        assert_eq!(template.round_count(), 3);
    }

    #[test]
    fn test_double_elim_12_layout() {
        let template = TemplateRegistry::builtin()
            .get(BracketKind::DoubleElimination, 12)
            .cloned()
            .unwrap();

        let count = |bracket: BracketType| {
            template
                .games
                .iter()
                .filter(|g| g.bracket == bracket)
                .count()
        };
        assert_eq!(count(BracketType::Winners), 11);
        assert_eq!(count(BracketType::Losers), 9);
        assert_eq!(count(BracketType::Championship), 2);

        let last = template.games.last().unwrap();
        assert!(last.if_necessary);
        assert_eq!(last.slots(), [winner_of(21), loser_of(21)]);

        let byes: Vec<u32> = template
            .games
            .iter()
            .filter(|g| g.round == 2)
            .filter_map(|g| g.team1.seed())
            .collect();
        assert_eq!(byes, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_validation_rejects_dangling_source() {
        let template = BracketTemplate::new(
            BracketKind::SingleElimination,
            2,
            vec![
                BracketMatchup::new(1, 1, BracketType::Winners, seed(1), seed(2)),
                BracketMatchup::new(2, 2, BracketType::Championship, winner_of(1), winner_of(9)),
            ],
        );
        assert!(matches!(
            validate_template(&template),
            Err(TemplateError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_same_round_source() {
        let template = BracketTemplate::new(
            BracketKind::SingleElimination,
            3,
            vec![
                BracketMatchup::new(1, 1, BracketType::Winners, seed(2), seed(3)),
                BracketMatchup::new(1, 2, BracketType::Championship, seed(1), winner_of(1)),
            ],
        );
        assert!(validate_template(&template).is_err());
    }

    #[test]
    fn test_validation_rejects_reused_source_and_missing_seed() {
        let reused = BracketTemplate::new(
            BracketKind::SingleElimination,
            2,
            vec![
                BracketMatchup::new(1, 1, BracketType::Winners, seed(1), seed(2)),
                BracketMatchup::new(2, 2, BracketType::Championship, winner_of(1), winner_of(1)),
            ],
        );
        assert!(validate_template(&reused).is_err());

        let missing_seed = BracketTemplate::new(
            BracketKind::SingleElimination,
            3,
            vec![BracketMatchup::new(1, 1, BracketType::Championship, seed(1), seed(2))],
        );
        assert!(validate_template(&missing_seed).is_err());
    }

    #[test]
    fn test_validation_rejects_stray_if_necessary() {
        let template = BracketTemplate::new(
            BracketKind::SingleElimination,
            4,
            vec![
                BracketMatchup::new(1, 1, BracketType::Winners, seed(1), seed(4)),
                BracketMatchup::new(1, 2, BracketType::Winners, seed(2), seed(3)),
                BracketMatchup::new(2, 3, BracketType::Championship, winner_of(1), winner_of(2))
                    .if_necessary(),
            ],
        );
        assert!(validate_template(&template).is_err());
    }

    #[test]
    fn test_insert_validates() {
        let mut registry = TemplateRegistry::new();
        let bad = BracketTemplate::new(BracketKind::DoubleElimination, 2, vec![]);
        assert!(registry.insert(bad).is_err());
        assert!(registry.is_empty());

        let good = single_elimination(3).unwrap();
        assert!(registry.insert(good).unwrap().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[templates]]
kind = "double_elimination"
team_count = 2

[[templates.games]]
round = 1
game_number = 1
bracket = "winners"
team1 = {{ seed = 1 }}
team2 = {{ seed = 2 }}

[[templates.games]]
round = 2
game_number = 2
bracket = "championship"
team1 = {{ source = {{ game_number = 1, position = "winner" }} }}
team2 = {{ source = {{ game_number = 1, position = "loser" }} }}
"#
        )
        .unwrap();

        let mut registry = TemplateRegistry::builtin();
        let before = registry.len();
        let loaded = registry.load_file(file.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(registry.len(), before + 1);
        let template = registry.lookup(&PlayoffFormat::DoubleElim(2), 2).unwrap();
        assert_eq!(template.games[1].team2, loser_of(1));
    }

    #[test]
    fn test_load_file_rejects_invalid_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[templates]]
kind = "single_elimination"
team_count = 4

[[templates.games]]
round = 1
game_number = 1
bracket = "championship"
team1 = {{ seed = 1 }}
team2 = {{ seed = 5 }}
"#
        )
        .unwrap();

        let mut registry = TemplateRegistry::builtin();
        let original = registry.get(BracketKind::SingleElimination, 4).cloned();

        assert!(registry.load_file(file.path()).is_err());
        assert_eq!(registry.get(BracketKind::SingleElimination, 4).cloned(), original);
    }

    #[test]
    fn test_load_missing_file() {
        let mut registry = TemplateRegistry::new();
        let result = registry.load_file(Path::new("/nonexistent/templates.toml"));
        assert!(matches!(result, Err(TemplateError::ReadError { .. })));
    }
}
