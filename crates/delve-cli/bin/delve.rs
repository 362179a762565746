//! Dungeon level generator
//!
//! Generates one level and prints it as ASCII or JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delve_core::{GenerationParams, LevelRng, LevelTemplate, StrategyKind, generate};

/// Generate a dungeon level
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Generate a dungeon level", long_about = None)]
struct Args {
    /// Level width in tiles
    #[arg(short = 'W', long, default_value_t = 80)]
    width: usize,

    /// Level height in tiles
    #[arg(short = 'H', long, default_value_t = 40)]
    height: usize,

    /// Level number recorded in the template
    #[arg(short = 'l', long, default_value_t = 1)]
    level: u32,

    /// Random seed (random if omitted)
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// JSON file with generation parameters
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Room connection strategy (greedy, spanning-tree)
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Place up stairs at the start position
    #[arg(long)]
    stairs_up: bool,

    /// Print the level template as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn load_params(args: &Args) -> Result<GenerationParams, String> {
    let mut params = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            serde_json::from_str(&contents)
                .map_err(|e| format!("invalid config {}: {}", path.display(), e))?
        }
        None => GenerationParams::default(),
    };

    if let Some(strategy) = args.strategy {
        params.strategy = strategy;
    }
    if args.stairs_up {
        params.enable_stairs_up = true;
    }
    Ok(params)
}

fn print_ascii(level: &LevelTemplate) {
    print!("{}", level.tiles);
    println!("seed:   {}", level.seed);
    println!("start:  {}", level.start);
    println!("stairs: {}", level.stairs_down);
    if let Some(up) = level.stairs_up {
        println!("up:     {}", up);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let params = match load_params(&args) {
        Ok(params) => params,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?params, "generation parameters");

    let mut rng = args.seed.map_or_else(LevelRng::from_entropy, LevelRng::new);
    let level = match generate(args.width, args.height, args.level, &params, &mut rng) {
        Ok(level) => level,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&level) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_ascii(&level);
    }
    ExitCode::SUCCESS
}
