use anyhow::Context;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::settings::get_settings;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_settings().context("Failed to load configuration")?;
    init_tracing(&settings.log)?;
    let pool = establish_connection(&settings.database)
        .await
        .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    run_server(pool, &settings.application.address()).await
}
