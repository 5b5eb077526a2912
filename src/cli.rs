//! Command-line interface for the room server.

use clap::{Parser, Subcommand};

/// Tic-tac-toe rooms - two-player board game server
#[derive(Parser, Debug)]
#[command(name = "tictactoe_rooms")]
#[command(about = "Tic-tac-toe room server with SQLite persistence", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP room server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "tictactoe_rooms.db")]
        db_path: String,
    },
}
