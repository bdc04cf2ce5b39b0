//! Command-line driver for the tourney engine
//!
//! Reads JSON snapshots (from a file or stdin), runs one engine operation and
//! prints the result as pretty JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tourney_core::config::{validate_config, EngineConfig};
use tourney_core::rating::{points_distribution, EloRatingCalculator, RatingCalculator};
use tourney_core::schedule::{
    assign_tables_to_rounds, assign_tables_with_variety, generate_schedule, split_into_groups,
    total_rounds, validate_group_size, TableHistory,
};
use tourney_core::standings::compute_standings;
use tourney_core::swiss::{generate_pairings, validate_swiss_system};
use tourney_core::utils::{current_timestamp, UuidIdGenerator};
use tourney_core::{
    GameType, Match, Participant, ParticipantId, Round, Standing, TableNumber, Tier,
};
use tracing::{debug, info};

/// Tourney - pairing, standings and rating engine for multi-round tournaments
#[derive(Parser)]
#[command(
    name = "tourney",
    version,
    about = "Pairing, standings and rating engine for multi-round tournaments",
    long_about = "Tourney runs the tournament engine over JSON snapshots: round-robin \
                 schedules with table rotation, Swiss pairings, standings with tiebreaks, \
                 season ranking points and Elo rating deltas."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Seed for the round-1 Swiss draw
    #[arg(long, global = true, value_name = "SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Round-robin schedule with tables from a JSON list of participant ids
    Schedule {
        /// JSON input file, stdin when omitted
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Override the configured table count
        #[arg(long)]
        tables: Option<TableNumber>,
    },
    /// Snake-draft groups from a JSON list of participants
    Groups {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(short, long, default_value_t = 1)]
        groups: usize,
    },
    /// Next Swiss round with tables from a JSON pairing state
    Pair {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long)]
        tables: Option<TableNumber>,
    },
    /// Ranked standings from JSON participants and matches
    Standings {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Rank as a Swiss group
        #[arg(long)]
        swiss: bool,
    },
    /// Ranking points table for a tier and field size
    Points {
        #[arg(long)]
        tier: Option<Tier>,
        #[arg(long)]
        field_size: Option<u32>,
        /// Use the doubles drop curve
        #[arg(long)]
        doubles: bool,
    },
    /// Elo deltas from a JSON list of participants with final positions
    Elo {
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

/// Swiss state handed to `pair`
#[derive(Debug, Deserialize)]
struct PairInput {
    participants: Vec<Participant>,
    #[serde(default)]
    standings: Vec<Standing>,
    #[serde(default)]
    previous_pairings: Vec<Round>,
    round_number: u32,
    /// Planned number of rounds, validated when present
    #[serde(default)]
    total_rounds: Option<u32>,
    #[serde(default)]
    table_history: TableHistory,
    /// Tables claimed by other groups this round
    #[serde(default)]
    tables_in_use: BTreeSet<TableNumber>,
}

#[derive(Debug, Deserialize)]
struct StandingsInput {
    participants: Vec<Participant>,
    matches: Vec<Match>,
}

#[derive(Debug, Serialize)]
struct PointsOutput {
    tier: Tier,
    game_type: GameType,
    field_size: u32,
    distribution: Vec<tourney_core::rating::PositionPoints>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = if let Some(config_path) = &args.config {
        EngineConfig::from_file(config_path)?
    } else {
        EngineConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_input<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let contents = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&contents).context("Failed to parse JSON input")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn run(args: &Args, config: &EngineConfig) -> Result<()> {
    let mut ids = UuidIdGenerator;

    match &args.command {
        Command::Schedule { input, tables } => {
            let participant_ids: Vec<ParticipantId> = read_input(input.as_deref())?;
            validate_group_size(participant_ids.len(), config.scheduling.max_per_group)?;

            let rounds = generate_schedule(&participant_ids, &mut ids, current_timestamp())?;
            let total_tables = tables.unwrap_or(config.scheduling.total_tables);
            let scheduled = assign_tables_to_rounds(&rounds, total_tables, &TableHistory::new())?;

            info!(
                "Scheduled {} rounds per cycle, {} in total",
                scheduled.rounds.len(),
                total_rounds(participant_ids.len(), config.scheduling.cycles)
            );
            print_json(&scheduled)
        }
        Command::Groups { input, groups } => {
            let participants: Vec<Participant> = read_input(input.as_deref())?;
            let groups = split_into_groups(&participants, *groups, &mut ids)?;
            print_json(&groups)
        }
        Command::Pair { input, tables } => {
            let state: PairInput = read_input(input.as_deref())?;

            if let Some(planned) = state.total_rounds {
                let active = state.participants.iter().filter(|p| p.is_active()).count();
                validate_swiss_system(active, planned)?;
            }

            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let matches = generate_pairings(
                &state.participants,
                &state.standings,
                &state.previous_pairings,
                state.round_number,
                &mut rng,
                &mut ids,
                current_timestamp(),
            )?;

            let total_tables = tables.unwrap_or(config.scheduling.total_tables);
            let assigned = assign_tables_with_variety(
                &matches,
                total_tables,
                &state.table_history,
                &state.tables_in_use,
            );
            print_json(&assigned)
        }
        Command::Standings { input, swiss } => {
            let state: StandingsInput = read_input(input.as_deref())?;
            let participant_ids: Vec<ParticipantId> =
                state.participants.iter().map(|p| p.id.clone()).collect();

            let standings = compute_standings(
                &participant_ids,
                &state.matches,
                &state.participants,
                *swiss,
                config.ranking.mode,
            );
            print_json(&standings)
        }
        Command::Points {
            tier,
            field_size,
            doubles,
        } => {
            let tier = tier.unwrap_or(config.ranking.tier);
            let field_size = field_size.unwrap_or(tourney_core::rating::DEFAULT_FIELD_SIZE);
            let game_type = if *doubles {
                GameType::Doubles
            } else {
                config.ranking.game_type
            };

            print_json(&PointsOutput {
                tier,
                game_type,
                field_size,
                distribution: points_distribution(tier, field_size, game_type),
            })
        }
        Command::Elo { input } => {
            let participants: Vec<Participant> = read_input(input.as_deref())?;
            let calculator = EloRatingCalculator::new(config.elo.clone())?;
            debug!("Elo configuration: {}", calculator.config());
            print_json(&calculator.calculate_rating_changes(&participants)?)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    run(&args, &config)
}
