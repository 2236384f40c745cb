use std::path::PathBuf;

use auctioneer_cli::{
    commands::{genesis as genesis_cmd, governance as governance_cmd, params as params_cmd},
    config::{AuctionConfig, DEFAULT_CONFIG_PATH, load_config, load_config_or_default},
};
use auctioneer_core::{AllowedParams, Timestamp};
use clap::{Args, Parser, Subcommand};
use eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "auctioneer", about = "Auction engine operator tools", version)]
struct Cli {
    /// Path to the auction configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: PathBuf,

    /// Log filter, e.g. `info` or `auctioneer_core=debug`
    #[arg(long, env = "AUCTION_LOG", default_value = "info", value_name = "FILTER")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the effective parameters
    Params,

    /// Inspect or simulate a genesis snapshot
    #[command(subcommand)]
    Genesis(GenesisCommands),

    /// Check parameter changes against an allow-list
    #[command(subcommand)]
    Governance(GovernanceCommands),
}

#[derive(Debug, Subcommand)]
enum GenesisCommands {
    /// Load and validate a snapshot
    Validate(GenesisArgs),

    /// Close every auction expired at `--now` and print the result
    Sweep {
        #[command(flatten)]
        genesis: GenesisArgs,

        /// Block time in unix seconds
        #[arg(long, value_name = "SECS")]
        now: u64,
    },
}

#[derive(Debug, Args)]
struct GenesisArgs {
    /// Genesis JSON file (defaults to `genesis` from the config)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum GovernanceCommands {
    /// Whether moving from CURRENT to INCOMING params is permitted
    Check {
        /// Config file holding the params in force
        current: PathBuf,

        /// Config file holding the proposed params
        incoming: PathBuf,

        /// Comma-separated fields the proposal may change
        #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
        allow: Vec<String>,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log)?)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config_or_default(&cli.config)?;
    tracing::debug!(path = %cli.config.display(), ?config, "config loaded");

    match cli.command {
        Commands::Params => print!("{}", params_cmd::render(&config.params)?),
        Commands::Genesis(GenesisCommands::Validate(args)) => {
            let path = genesis_path(&config, args)?;
            let state = genesis_cmd::load_genesis(&path)?;
            println!("{} is valid", path.display());
            println!("{}", genesis_cmd::summarize(&state)?);
        }
        Commands::Genesis(GenesisCommands::Sweep { genesis, now }) => {
            let path = genesis_path(&config, genesis)?;
            let state = genesis_cmd::load_genesis(&path)?;
            let report = genesis_cmd::sweep(state, Timestamp::new(now))
                .wrap_err("sweep halted")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Governance(GovernanceCommands::Check {
            current,
            incoming,
            allow,
        }) => {
            let allowed = AllowedParams::from_fields(allow.iter().map(String::as_str))
                .ok_or_else(|| eyre!("unknown field in --allow: {}", allow.join(",")))?;
            let current = load_config(&current)?.params;
            let incoming = load_config(&incoming)?.params;

            let verdict = governance_cmd::check(&current, &incoming, &allowed)?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if !verdict.permitted {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn genesis_path(config: &AuctionConfig, args: GenesisArgs) -> eyre::Result<PathBuf> {
    args.file
        .or_else(|| config.genesis.clone())
        .ok_or_else(|| eyre!("no genesis file given and none set in the config"))
}
