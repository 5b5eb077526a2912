//! Tic-tac-toe rooms - server entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tictactoe_rooms::{AppState, GameRepository, RoomRegistry, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            db_path,
        } => serve(host, port, db_path).await,
    }
}

/// Runs the HTTP room server.
async fn serve(host: String, port: u16, db_path: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(db_path = %db_path, "Applying pending migrations");
    let mut conn = SqliteConnection::establish(&db_path)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Migrations failed: {}", e))?;
    drop(conn);

    let repository = GameRepository::new(db_path);
    let registry = RoomRegistry::new();
    let state = AppState::new(registry, repository);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(host = %host, port, "Room server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
