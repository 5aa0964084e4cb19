use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrim_stats::api::{build_router, state::AppState};
use scrim_stats::config::AppConfig;
use scrim_stats::storage::Tables;
use scrim_stats::views::{self, ViewParams, ViewRequest};

#[derive(Parser)]
#[command(name = "scrim-stats")]
#[command(about = "Scrim analytics: maps, compositions, sides, pistols and players")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./scrim-stats.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Selection shared by every view.
#[derive(Args, Debug, Clone, Default)]
struct ViewArgs {
    /// First day to include (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long)]
    from: Option<String>,

    /// Last day to include
    #[arg(long)]
    to: Option<String>,

    /// Map name, or "All"
    #[arg(long)]
    map: Option<String>,

    #[arg(long)]
    player: Option<String>,

    /// Controller, Duelist, Initiator or Sentinel
    #[arg(long)]
    role: Option<String>,

    /// Comma-separated agent names
    #[arg(long)]
    agents: Option<String>,

    /// Comma-separated map names
    #[arg(long)]
    maps: Option<String>,

    /// Post-plant sort column: attack or defense
    #[arg(long)]
    sort: Option<String>,

    /// asc or desc
    #[arg(long)]
    order: Option<String>,

    /// Number of lineups to show
    #[arg(long)]
    top: Option<usize>,
}

impl From<ViewArgs> for ViewRequest {
    fn from(args: ViewArgs) -> Self {
        ViewRequest {
            from: args.from,
            to: args.to,
            map: args.map,
            player: args.player,
            role: args.role,
            agents: args.agents,
            maps: args.maps,
            sort: args.sort,
            order: args.order,
            top: args.top,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Games, wins, draws, losses and win rate per map
    Overview(ViewArgs),

    /// Most successful five-agent lineups
    Compositions(ViewArgs),

    /// Player x agent win-rate grid
    Grid(ViewArgs),

    /// Attack/defense round win rates per map
    Sides(ViewArgs),

    /// Post-plant and retake success per map
    PostPlant(ViewArgs),

    /// Pistol round win rate per map
    Pistol(ViewArgs),

    /// Second-round outcomes after pistol wins and losses
    Conversions(ViewArgs),

    /// Agent performance for one player (requires --player)
    Player(ViewArgs),

    /// Compare a player with a role benchmark (requires --player and --role)
    Compare(ViewArgs),

    /// Combat score samples for one player (requires --player)
    Acs(ViewArgs),

    /// Load every input and report what was skipped
    Check,

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn params(args: ViewArgs) -> Result<ViewParams> {
    Ok(ViewParams::from_request(&args.into())?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("loading {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing. Logs go to stderr so view output stays clean JSON.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json_layer = cli
        .json_logs
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!cli.json_logs).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::debug!("Starting scrim-stats v{}", env!("CARGO_PKG_VERSION"));

    let tables = Tables::load(&config.storage());
    let settings = config.view_settings();

    match cli.command {
        Commands::Overview(args) => print_json(&views::overview(&tables, &params(args)?))?,
        Commands::Compositions(args) => {
            print_json(&views::compositions(&tables, &params(args)?, &settings))?
        }
        Commands::Grid(args) => print_json(&views::grid(&tables, &params(args)?))?,
        Commands::Sides(args) => print_json(&views::sides(&tables, &params(args)?, &settings))?,
        Commands::PostPlant(args) => print_json(&views::post_plant(&tables, &params(args)?))?,
        Commands::Pistol(args) => print_json(&views::pistol(&tables, &params(args)?))?,
        Commands::Conversions(args) => print_json(&views::conversions(&tables, &params(args)?))?,
        Commands::Player(args) => print_json(&views::player_stats(&tables, &params(args)?)?)?,
        Commands::Compare(args) => print_json(&views::compare(&tables, &params(args)?)?)?,
        Commands::Acs(args) => print_json(&views::acs(&tables, &params(args)?)?)?,
        Commands::Check => {
            println!(
                "form: {} rows, scores: {} rows, acs: {} rows",
                tables.form.len(),
                tables.scores.len(),
                tables.acs.len()
            );
            let mut count = 0;
            for diagnostic in tables.diagnostics() {
                println!("  {}", diagnostic);
                count += 1;
            }
            if count == 0 {
                println!("No problems found");
            }
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState::new(tables, &config);
            let app = build_router(state);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
