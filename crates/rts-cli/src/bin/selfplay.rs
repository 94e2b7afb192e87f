//! `rts-selfplay` - run planner-vs-planner games and print the metrics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use rts_cli::{run_batch, GameOutcome, SelfPlayConfig};

#[derive(Parser)]
#[command(name = "rts-selfplay")]
#[command(about = "Pit fog-of-war planners against each other on a generated map", version)]
struct Cli {
    /// YAML file with map, planner and game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Planning cycles per game
    #[arg(long)]
    cycles: Option<u32>,

    /// Wall-clock budget per player per cycle, in milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Number of games, seeds counting up from --seed
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => SelfPlayConfig::load(path)
            .with_context(|| format!("loading self-play config {}", path.display()))?,
        None => SelfPlayConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(cycles) = cli.cycles {
        config.cycles = cycles;
    }
    if let Some(budget_ms) = cli.budget_ms {
        config.budget_ms = budget_ms;
    }

    let batch = run_batch(&config, cli.games);

    if cli.json {
        let out = serde_json::to_string_pretty(&batch).context("serializing results")?;
        println!("{out}");
        return Ok(());
    }

    for result in &batch.results {
        let outcome = match &result.outcome {
            GameOutcome::Victory { winner } => format!("p{winner} wins"),
            GameOutcome::Unfinished { leader: Some(p) } => format!("unfinished, p{p} leads"),
            GameOutcome::Unfinished { leader: None } => "unfinished, tied".to_owned(),
            GameOutcome::Aborted { reason } => format!("aborted: {reason}"),
        };
        println!(
            "seed {:>6}  cycles {:>4}  game time {:>7}ms  {}",
            result.seed, result.cycles_played, result.game_time_ms, outcome
        );
        for p in &result.players {
            let decisions: Vec<String> =
                p.decisions.iter().map(|(k, n)| format!("{k}={n}")).collect();
            println!(
                "  p{}  cities {:>2}  units {:>3}  iterations {:>7}  dispatched {:>4}  rejected {:>3}  [{}]",
                p.player,
                p.final_cities,
                p.final_units,
                p.iterations,
                p.orders_dispatched,
                p.orders_rejected,
                decisions.join(" ")
            );
        }
    }
    if batch.games > 1 {
        println!(
            "wins {:?}  unfinished {}  aborted {}",
            batch.wins, batch.unfinished, batch.aborted
        );
    }
    Ok(())
}
