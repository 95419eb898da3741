//! fundlens-cli - maintenance commands for the record store
//!
//! Recomputes the denormalized cumulative fields (per-entity totals and
//! undisclosed flags) after bulk imports. Every command takes `--dry-run`
//! to preview the computation without writing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use fundlens_cli::cumulate;
use fundlens_common::config::{resolve_database_path, DB_ENV_VAR};
use fundlens_common::db;

/// Command-line arguments for fundlens-cli
#[derive(Parser, Debug)]
#[command(name = "fundlens-cli")]
#[command(about = "Maintenance commands for the donation record store")]
#[command(version)]
struct Cli {
    /// Database file (falls back to FUNDLENS_DB, the config file, then the
    /// platform default)
    #[arg(short, long, env = DB_ENV_VAR)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute cumulative data for donors and think tanks
    CumulativeData {
        /// Compute and log without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Recompute cumulative data for donors only
    CumulativeDonorData {
        /// Compute and log without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Recompute cumulative data for think tanks only
    CumulativeThinkTankData {
        /// Compute and log without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let db_path = resolve_database_path(cli.database.as_deref())?;
    info!("Database path: {}", db_path.display());

    // Read-write: these commands exist to update entity metadata
    let pool = db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let updates = match cli.command {
        Command::CumulativeData { dry_run } => cumulate::recompute_all(&pool, dry_run).await?,
        Command::CumulativeDonorData { dry_run } => {
            cumulate::recompute_donor_data(&pool, dry_run).await?
        }
        Command::CumulativeThinkTankData { dry_run } => {
            cumulate::recompute_think_tank_data(&pool, dry_run).await?
        }
    };

    info!("Recomputed cumulative data for {} entities", updates.len());
    Ok(())
}
