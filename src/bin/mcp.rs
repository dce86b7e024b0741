//! tagreg MCP server binary.
//!
//! Opens the register database, runs migrations, and serves the MCP
//! streamable HTTP transport until interrupted.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use miette::Diagnostic;
use tagreg::db::{DbError, SqliteStore};
use tagreg::http::{self, Config, ServeError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(tagreg::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(tagreg::binary::io))]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    #[diagnostic(code(tagreg::binary::serve))]
    Serve(#[from] ServeError),
}

#[derive(Parser)]
#[command(name = "tagreg")]
#[command(author, version, about = "MCP server over an engineering asset register", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// SQLite database file holding the register
    #[arg(long, env = "TAGREG_DB", default_value = "tagreg.db")]
    db: PathBuf,

    /// Shared secret clients must present as `Bearer <key>`
    #[arg(long, env = "API_KEY")]
    api_key: String,

    /// Upper bound on any single register query, in seconds
    #[arg(long, default_value = "30")]
    query_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let cli = Cli::parse();

    println!("Opening register at {:?}", cli.db);

    // Ensure parent directory exists; a bare filename has none.
    if let Some(parent) = cli.db.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::open(&cli.db, Duration::from_secs(cli.query_timeout)).await?;
    store.migrate().await?;
    println!("Register migrations complete");

    http::run(
        Config {
            host: cli.host,
            port: cli.port,
            api_key: cli.api_key,
        },
        store,
    )
    .await?;

    Ok(())
}
