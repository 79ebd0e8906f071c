pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use affinity_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use affinity_core::SimilarityMetric;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "affinity",
    about = "User similarity and item recommendation CLI",
    long_about = "Score users against each other from shared item ratings, rank them, and derive items to recommend or avoid.",
    after_help = "Examples:\n  affinity rank --user Alice\n  affinity recommend --user Alice --metric euclidean\n  affinity score --user Alice --other Bob --json"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    #[arg(long, global = true, help = "Path to an affinity.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Path to the ratings JSON dataset")]
    dataset: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute both similarity scores between two users")]
    Score {
        #[arg(long, help = "Reference user")]
        user: String,
        #[arg(long, help = "User to compare against")]
        other: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Rank every other user by similarity to the given user")]
    Rank {
        #[arg(long, help = "Reference user")]
        user: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Recommend and discourage items for the given user")]
    Recommend {
        #[arg(long, help = "Reference user")]
        user: String,
        #[arg(long, help = "Ranking used to pick items (pearson|euclidean)")]
        metric: Option<SimilarityMetric>,
        #[arg(long, help = "Maximum items per list")]
        limit: Option<usize>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let require_file = cli.global.config.is_some();
    let mut options = LoadOptions {
        config_path: cli.global.config,
        require_file,
        overrides: ConfigOverrides {
            dataset_path: cli.global.dataset,
            log_level: cli.global.log_level,
            ..ConfigOverrides::default()
        },
    };
    if let Command::Recommend { metric, limit, .. } = &cli.command {
        options.overrides.metric = *metric;
        options.overrides.limit = *limit;
    }

    if let Ok(config) = AppConfig::load(options.clone()) {
        if let Err(error) = logging::init(&config.logging) {
            eprintln!("logging disabled: {error:#}");
        }
    }

    let result = match cli.command {
        Command::Score { user, other, json } => commands::score::run(&options, &user, &other, json),
        Command::Rank { user, json } => commands::rank::run(&options, &user, json),
        Command::Recommend { user, json, .. } => commands::recommend::run(&options, &user, json),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
