mod cli;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slatescore")]
#[command(about = "Pick reconciliation and scoring for daily NBA slates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve pick outcomes and compute the slate score
    Score {
        /// JSON file with the user's picks for the slate
        #[arg(short, long)]
        picks: PathBuf,
        /// JSON file with the declared winners
        #[arg(short, long)]
        winners: PathBuf,
        /// Optional roster snapshot (teamId -> entries) for display names
        #[arg(short, long)]
        roster: Option<PathBuf>,
        /// Optional scoring config (hit values + multiplier tiers)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Fetch box scores and propose winners for admin review
    Autofill {
        /// Slate date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        /// JSON file with the slate's games
        #[arg(short, long)]
        games: PathBuf,
        /// Optional JSON file with selectable player options
        #[arg(short, long)]
        options: Option<PathBuf>,
        /// Emit JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            picks,
            winners,
            roster,
            config,
            json,
        } => {
            tracing::info!("Scoring slate from {}", picks.display());
            cli::score(&picks, &winners, roster.as_deref(), config.as_deref(), json)?;
        }
        Commands::Autofill {
            date,
            games,
            options,
            json,
        } => {
            tracing::info!("Proposing winners for {}", date);
            cli::autofill(date, &games, options.as_deref(), json).await?;
        }
    }

    Ok(())
}
