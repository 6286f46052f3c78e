//! Cell lottery watcher CLI
//!
//! Follows a game account on a node and prints the board as it changes.

use anyhow::Context;
use clap::{Parser, Subcommand};
use lottery_core::{GameClient, LotteryConfig, MemoryPreferences, NoWallet, PreferenceStore};
use lottery_types::{Address, Asset, CellIndex, Locale, CELL_COUNT};
use lottery_watcher::{render_board, FilePreferences};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lottery-watcher")]
#[command(about = "Terminal front end for the cell lottery")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Game account address
    #[arg(long, global = true)]
    game: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the game and print the board on every change
    Watch {
        /// Node URL
        #[arg(short, long)]
        node: Option<String>,

        /// Delay between polls (e.g., "1s", "500ms")
        #[arg(short, long)]
        interval: Option<humantime::Duration>,

        /// Interface language (en, ru)
        #[arg(long)]
        locale: Option<Locale>,

        /// File holding locale and asset preferences
        #[arg(long)]
        preferences: Option<PathBuf>,

        /// Poll once, print and exit
        #[arg(long)]
        once: bool,
    },

    /// Print the purchase transaction parameters for a cell
    BuyParams {
        /// Cell index (0-99)
        #[arg(long)]
        cell: usize,

        /// Payment asset (waves, wct)
        #[arg(long, default_value = "waves")]
        asset: Asset,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<LotteryConfig> {
    let config = match &cli.config {
        Some(path) => LotteryConfig::load(path)?,
        None => LotteryConfig::default(),
    };
    Ok(match &cli.game {
        Some(game) => config.with_game_address(Address::new(game.clone())),
        None => config,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::BuyParams { cell, asset } => {
            // Don't initialize tracing - output goes to stdout
            let cell = CellIndex::new(cell)
                .with_context(|| format!("cell must be below {}", CELL_COUNT))?;
            let tx = config.buy_transaction(cell, asset);
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }

        Commands::Watch {
            node,
            interval,
            locale,
            preferences,
            once,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();

            let mut config = config;
            if let Some(node) = node {
                config = config.with_node_url(node);
            }
            if let Some(interval) = interval {
                config = config.with_poll_interval(*interval);
            }

            let preferences: Arc<dyn PreferenceStore> = match preferences {
                Some(path) => Arc::new(FilePreferences::open(&path).with_context(|| {
                    format!("failed to open preferences {}", path.display())
                })?),
                None => Arc::new(MemoryPreferences::new()),
            };

            let client = GameClient::connect(config, Arc::new(NoWallet), preferences)?;
            if let Some(locale) = locale {
                client.set_locale(locale)?;
            }

            if once {
                client.poll_once().await;
                print_board(&client);
                return Ok(());
            }

            watch(&client).await?;
        }
    }

    Ok(())
}

async fn watch(client: &GameClient) -> anyhow::Result<()> {
    let mut state = client.subscribe();
    let mut status = client.subscribe_status();

    info!(
        game = %client.config().game_address,
        node = %client.config().node_url,
        interval = ?client.config().poll_interval(),
        "Watching game"
    );
    client.start();
    print_board(client);

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                print_board(client);
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                print_board(client);
            }
        }
    }

    client.stop().await;
    info!("Stopped");
    Ok(())
}

fn print_board(client: &GameClient) {
    println!(
        "{}",
        render_board(
            &client.snapshot(),
            &client.status(),
            client.locale(),
            client.config()
        )
    );
}
