//! artree - a bot that turns code snippets into procedural art.
//!
//! Three snippets per author, one per color channel, each evaluated once
//! per pixel. Run it as a polling bot (`serve`) or plot a single image
//! from the command line (`plot`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use artree_bot::{Bot, JsonStore};
use artree_engine::generate;
use clap::{Parser, Subcommand};
use tokio::time::Instant;
use tracing::{info, Level};

mod config;
mod spool;

use config::Config;
use spool::{OutboxPublisher, SpoolSource};

/// artree: turn code snippets into procedural art.
#[derive(Parser, Debug)]
#[command(name = "artree", author, version, about = "Procedural art from code snippets", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll for mentions and reply with generated art.
    ///
    /// Accumulates code snippets per author; the third snippet triggers
    /// image generation (R, G, B in submission order).
    Serve,

    /// Plot one image from three snippets, one per color channel.
    Plot {
        /// Snippet for the red channel.
        red: String,

        /// Snippet for the green channel.
        green: String,

        /// Snippet for the blue channel.
        blue: String,

        /// Output file path.
        #[arg(short, long, default_value = "result.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Plot {
            red,
            green,
            blue,
            output,
        } => plot(&config, &red, &green, &blue, &output).await,
    }
}

/// Run the polling bot until interrupted.
async fn serve(config: Config) -> Result<()> {
    info!("starting artree");

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;
    let store = JsonStore::open(config.store_path())
        .with_context(|| format!("Failed to open {}", config.store_path().display()))?;
    let source = SpoolSource::new(config.inbox_dir());
    let publisher = OutboxPublisher::new(config.outbox_dir());

    let mut bot = Bot::new(
        config.bot_config(),
        Arc::new(store),
        Box::new(source),
        Arc::new(publisher),
    );
    bot.run().await?;
    Ok(())
}

/// Generate one image from the given snippets and write it to disk.
async fn plot(config: &Config, red: &str, green: &str, blue: &str, output: &PathBuf) -> Result<()> {
    let deadline = Instant::now() + config.plot_timeout();
    let img = generate(red, green, blue, config.width, config.height, deadline)
        .await
        .context("Failed to generate image")?;

    img.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), "done");
    Ok(())
}
