use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use horizon_archive::{Archive, FeedSource, FixtureSource, HttpClient, SourcePlan};
use horizon_common::file_config::load_config;
use horizon_common::{Config, ScanConfig};
use horizon_scout::schema::snapshot_schema_json;
use horizon_scout::scout::Scout;
use horizon_scout::store::FileSink;

#[derive(Parser)]
#[command(name = "horizon-scout", about = "Weekly AI harms horizon scan")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gather sources, classify and cluster, write news_data.json and weekly_digest.md
    Run {
        /// TOML file with rule, section and clustering overrides (defaults to HS_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Read sections from a JSON fixture instead of the network
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Output directory (defaults to HS_OUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the snapshot JSON Schema
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Schema => {
            println!("{}", snapshot_schema_json()?);
            Ok(())
        }
        Command::Run {
            config,
            fixture,
            out_dir,
        } => run(config, fixture, out_dir).await,
    }
}

async fn run(
    config_path: Option<PathBuf>,
    fixture: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let env = Config::from_env();

    let scan_config = match config_path.or(env.config_path.clone()) {
        Some(path) => {
            info!(config = %path.display(), "Loading config");
            let file_config = load_config(&path)?;
            ScanConfig::from_file_config(file_config)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => ScanConfig::default(),
    };

    let source: Box<dyn FeedSource> = match fixture {
        Some(path) => {
            info!(fixture = %path.display(), "Using fixture source");
            Box::new(FixtureSource::load(&path)?)
        }
        None => {
            let client = HttpClient::new(&env.user_agent)?;
            Box::new(Archive::new(client, SourcePlan::standard(&scan_config)))
        }
    };

    let sink = FileSink::new(out_dir.unwrap_or(env.out_dir));
    let stats = Scout::new(source.as_ref(), &sink, &scan_config)
        .run(Utc::now())
        .await?;

    info!("{stats}");
    Ok(())
}
