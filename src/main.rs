use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playoff_engine::bracket::{advance_from_result, needs_if_necessary_game, plan_bracket};
use playoff_engine::calculate::{build_standings, select_seeds, standings_for_format};
use playoff_engine::config::AppConfig;
use playoff_engine::models::{
    BracketType, DivisionId, ForfeitStatus, Game, GameId, GeneratedPlayoffGame, PlayoffFormat,
    SeededTeam, SlotRef, StandingEntry, Team, TeamId, TournamentId,
};
use playoff_engine::storage::{list_tournaments, StorageConfig, TournamentSnapshot};

#[derive(Parser)]
#[command(name = "playoff-engine")]
#[command(about = "Baseball tournament standings and playoff bracket engine")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which tournament and division a command works on.
#[derive(Args)]
struct Scope {
    /// Tournament id
    #[arg(long)]
    tournament: String,

    /// Division id (all teams when omitted)
    #[arg(long)]
    division: Option<String>,
}

impl Scope {
    fn tournament_id(&self) -> TournamentId {
        TournamentId::from(self.tournament.as_str())
    }

    fn division_id(&self) -> Option<DivisionId> {
        self.division.as_deref().map(DivisionId::from)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List stored tournaments
    Tournaments,

    /// Show pool-play standings
    Standings {
        #[command(flatten)]
        scope: Scope,

        /// Playoff format; pool formats rank each pool separately
        #[arg(long)]
        format: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show playoff qualifiers and their seeds
    Seeds {
        #[command(flatten)]
        scope: Scope,

        /// Playoff format (e.g. "top_8", "top_8_four_pools", "double_elim_12")
        #[arg(long)]
        format: String,

        #[arg(long)]
        json: bool,
    },

    /// Generate a playoff bracket and store its games
    Bracket {
        #[command(flatten)]
        scope: Scope,

        #[arg(long)]
        format: String,

        /// Print the bracket without storing it
        #[arg(long)]
        dry_run: bool,

        #[arg(long)]
        json: bool,
    },

    /// Record a playoff result and advance the bracket
    Advance {
        /// Tournament id
        #[arg(long)]
        tournament: String,

        /// Game id
        #[arg(long)]
        game: String,

        #[arg(long)]
        home_score: u32,

        #[arg(long)]
        away_score: u32,

        #[arg(long)]
        home_innings: Option<f64>,

        #[arg(long)]
        away_innings: Option<f64>,

        /// Side that forfeited
        #[arg(long, value_enum)]
        forfeit: Option<ForfeitSide>,
    },

    /// List available bracket templates
    Templates {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ForfeitSide {
    Home,
    Away,
}

impl From<ForfeitSide> for ForfeitStatus {
    fn from(side: ForfeitSide) -> Self {
        match side {
            ForfeitSide::Home => ForfeitStatus::Home,
            ForfeitSide::Away => ForfeitStatus::Away,
        }
    }
}

#[derive(Serialize)]
struct StandingsReport {
    tournament_id: TournamentId,
    division_id: Option<DivisionId>,
    format: Option<PlayoffFormat>,
    computed_at: DateTime<Utc>,
    standings: Vec<StandingEntry>,
}

#[derive(Serialize)]
struct TemplateSummary {
    kind: String,
    team_count: u32,
    games: usize,
    rounds: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };

    // Initialize tracing
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting playoff-engine v{}", env!("CARGO_PKG_VERSION"));
    if !cli.config.exists() {
        tracing::debug!("No config at {}, using defaults", cli.config.display());
    }

    let storage = StorageConfig::new(cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone()));

    match cli.command {
        Commands::Tournaments => {
            let tournaments = list_tournaments(&storage)?;
            if tournaments.is_empty() {
                println!("No tournaments in {}", storage.tournaments_dir().display());
            }
            for id in tournaments {
                println!("{}", id);
            }
        }

        Commands::Standings {
            scope,
            format,
            json,
        } => {
            let snapshot = load_division(&storage, &scope)?;
            let format = format.as_deref().map(PlayoffFormat::parse);
            let standings = match &format {
                Some(format) => standings_for_format(&snapshot.teams, &snapshot.games, format),
                None => build_standings(&snapshot.teams, &snapshot.games),
            };

            let report = StandingsReport {
                tournament_id: scope.tournament_id(),
                division_id: scope.division_id(),
                format,
                computed_at: Utc::now(),
                standings,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_standings(&report.standings);
            }
        }

        Commands::Seeds {
            scope,
            format,
            json,
        } => {
            let snapshot = load_division(&storage, &scope)?;
            let format = PlayoffFormat::parse(&format);
            let standings = standings_for_format(&snapshot.teams, &snapshot.games, &format);
            let seeds = select_seeds(&standings, &format, &config.qualifying_table());

            if json {
                println!("{}", serde_json::to_string_pretty(&seeds)?);
            } else {
                print_seeds(&seeds, &standings);
            }
        }

        Commands::Bracket {
            scope,
            format,
            dry_run,
            json,
        } => {
            let snapshot = load_division(&storage, &scope)?;
            if snapshot.has_playoff_games() {
                bail!(
                    "Division already has playoff games; refusing to generate a second bracket"
                );
            }

            let format = PlayoffFormat::parse(&format);
            let registry = config.template_registry()?;
            let plan = plan_bracket(
                &snapshot.teams,
                &snapshot.games,
                &format,
                &config.qualifying_table(),
                &registry,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_seeds(&plan.seeds, &plan.standings);
                println!();
                print_bracket(&plan.games, &snapshot.teams);
            }

            if dry_run {
                println!("\n(dry run - no games written to disk)");
            } else {
                let tournament_id = scope.tournament_id();
                let division_id = scope.division_id();
                let games: Vec<Game> = plan
                    .games
                    .into_iter()
                    .map(|g| g.into_game(&tournament_id, division_id.as_ref()))
                    .collect();
                let written =
                    TournamentSnapshot::append_games(&storage, &tournament_id, &games)?;
                tracing::info!("Stored {} playoff games for {}", written, tournament_id);
            }
        }

        Commands::Advance {
            tournament,
            game,
            home_score,
            away_score,
            home_innings,
            away_innings,
            forfeit,
        } => {
            let tournament_id = TournamentId::from(tournament.as_str());
            let game_id = GameId::from(game.as_str());
            let mut snapshot = TournamentSnapshot::load(&storage, &tournament_id)?;

            let mut completed = snapshot
                .game(&game_id)
                .cloned()
                .with_context(|| format!("Game {} not found in {}", game_id, tournament_id))?
                .with_final_score(home_score, away_score);
            completed.home_innings_batted = home_innings.or(completed.home_innings_batted);
            completed.away_innings_batted = away_innings.or(completed.away_innings_batted);
            if let Some(side) = forfeit {
                completed = completed.with_forfeit(side.into());
            }

            let bracket: Vec<Game> = snapshot
                .division(completed.division_id.as_ref())
                .playoff_games()
                .cloned()
                .collect();
            let advanced = advance_from_result(&bracket, &completed)?;

            let mut changed = snapshot.apply_games(advanced);
            changed += snapshot.apply_games(vec![completed.clone()]);
            snapshot.save(&storage)?;
            println!("Recorded game {} ({} games updated)", completed.id, changed);

            let is_first_final = completed.playoff_bracket == Some(BracketType::Championship)
                && !completed.if_necessary
                && bracket.iter().any(|g| g.if_necessary);
            if is_first_final {
                if needs_if_necessary_game(&completed) {
                    println!("Losers' bracket champion won: the if-necessary game will be played");
                } else {
                    println!("Winners' bracket champion won: no if-necessary game");
                }
            }
        }

        Commands::Templates { json } => {
            let registry = config.template_registry()?;
            let summaries: Vec<TemplateSummary> = registry
                .templates()
                .map(|t| TemplateSummary {
                    kind: t.kind.to_string(),
                    team_count: t.team_count,
                    games: t.games.len(),
                    rounds: t.round_count(),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                println!("{:<26} {:>5} {:>5} {:>6}", "Kind", "Teams", "Games", "Rounds");
                for s in summaries {
                    println!(
                        "{:<26} {:>5} {:>5} {:>6}",
                        s.kind, s.team_count, s.games, s.rounds
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_division(storage: &StorageConfig, scope: &Scope) -> Result<TournamentSnapshot> {
    let snapshot = TournamentSnapshot::load(storage, &scope.tournament_id())?;
    let division = snapshot.division(scope.division_id().as_ref());
    if division.teams.is_empty() {
        bail!(
            "No teams in tournament {}{}",
            scope.tournament,
            scope
                .division
                .as_deref()
                .map(|d| format!(" division {}", d))
                .unwrap_or_default()
        );
    }
    Ok(division)
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map(|r| format!("{:.2}", r)).unwrap_or_else(|| "-".to_string())
}

fn print_standings(standings: &[StandingEntry]) {
    println!(
        "{:>4}  {:<24} {:<6} {:>8} {:>4} {:>4} {:>4} {:>5} {:>6} {:>6}",
        "Rank", "Team", "Pool", "W-L-T", "Pts", "RS", "RA", "Diff", "RA/DIP", "RS/OIP"
    );
    for entry in standings {
        let record = format!(
            "{}-{}-{}",
            entry.stats.wins, entry.stats.losses, entry.stats.ties
        );
        println!(
            "{:>4}  {:<24} {:<6} {:>8} {:>4} {:>4} {:>4} {:>5} {:>6} {:>6}",
            entry.rank,
            entry.team_name,
            entry.pool_id.as_ref().map(|p| p.as_str()).unwrap_or("-"),
            record,
            entry.points,
            entry.stats.runs_for,
            entry.stats.runs_against,
            entry.stats.run_differential(),
            format_ratio(entry.runs_allowed_per_inning()),
            format_ratio(entry.runs_scored_per_inning()),
        );
    }
}

fn print_seeds(seeds: &[SeededTeam], standings: &[StandingEntry]) {
    let entries: HashMap<&TeamId, &StandingEntry> =
        standings.iter().map(|e| (&e.team_id, e)).collect();

    println!("{:>4}  {:<24} {:<6} {:>4} {:>6}", "Seed", "Team", "Pool", "Rank", "RA/DIP");
    for seed in seeds {
        match entries.get(&seed.team_id) {
            Some(entry) => println!(
                "{:>4}  {:<24} {:<6} {:>4} {:>6}",
                seed.seed,
                entry.team_name,
                entry.pool_id.as_ref().map(|p| p.as_str()).unwrap_or("-"),
                entry.rank,
                format_ratio(entry.runs_allowed_per_inning()),
            ),
            None => println!("{:>4}  {}", seed.seed, seed.team_id),
        }
    }
}

fn print_bracket(games: &[GeneratedPlayoffGame], teams: &[Team]) {
    let names: HashMap<&TeamId, &str> = teams.iter().map(|t| (&t.id, t.name.as_str())).collect();
    let label = |slot: SlotRef, team_id: Option<&TeamId>| match (slot, team_id) {
        (SlotRef::Seed(_), Some(id)) => {
            format!("{} {}", slot, names.get(id).copied().unwrap_or(id.as_str()))
        }
        _ => slot.to_string(),
    };

    for game in games {
        println!(
            "R{:<2} G{:<3} {:<13} {:<28} vs {}{}",
            game.round,
            game.game_number,
            game.bracket.to_string(),
            label(game.team1, game.team1_id.as_ref()),
            label(game.team2, game.team2_id.as_ref()),
            if game.if_necessary {
                "  (if necessary)"
            } else {
                ""
            },
        );
    }
}
