use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::settings::get_settings;
use trivia_api::telemetry::init_tracing;
use trivia_api::transfer::{export_data, import_data};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database url, overrides the configured one
    #[clap(long)]
    database_url: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = get_settings().context("Failed to load configuration")?;
    init_tracing(&settings.log)?;
    if let Some(url) = cli.database_url {
        settings.database.url = SecretString::from(url);
    }
    let pool = establish_connection(&settings.database)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await?;

    match cli.command {
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export"),
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import"),
    }
}
