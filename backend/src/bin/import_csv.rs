//! Import a CSV file of sleep sessions for one account straight into
//! PostgreSQL.
//!
//! ```text
//! slumbertrack-import --username ada --file nights.csv --database-url postgres://…
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use slumbertrack::domain::SleepSessionService;
use slumbertrack::domain::ports::{AccountRepository, ImportRow, SleepSessionCommand};
use slumbertrack::inbound::csv::read_import_rows;
use slumbertrack::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselSleepGoalRepository, DieselSleepSessionRepository,
    PoolConfig, run_pending_migrations,
};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "SLUMBERTRACK_DATABASE_URL";

/// `slumbertrack-import` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "slumbertrack-import",
    about = "Import sleep sessions from a CSV file for an existing account",
    version
)]
struct CliArgs {
    /// Account that will own the imported sessions.
    #[arg(long, value_name = "name")]
    username: String,
    /// CSV file with at least `start` and `end` columns.
    #[arg(long, value_name = "path")]
    file: PathBuf,
    /// Database connection URL. Falls back to `SLUMBERTRACK_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

/// Install the log subscriber; returns whether this call installed it.
fn init_tracing() -> bool {
    match fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "tracing init failed");
            false
        }
    }
}

fn main() -> io::Result<()> {
    init_tracing();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let rows = read_rows(&args.file)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;

    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let accounts = DieselAccountRepository::new(pool.clone());
    let account = accounts
        .find_by_username(args.username.trim())
        .await
        .map_err(|error| io::Error::other(format!("look up account: {error}")))?
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no account named '{}'", args.username.trim()),
            )
        })?;

    let service = SleepSessionService::new(
        Arc::new(DieselSleepSessionRepository::new(pool.clone())),
        Arc::new(DieselSleepGoalRepository::new(pool)),
    );
    let summary = service
        .import(account.user.id(), rows)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {}", error.message())))?;

    info!(username = %account.user.username(), imported = summary.imported, "import complete");
    println!("imported={}", summary.imported);
    Ok(())
}

fn read_rows(path: &Path) -> io::Result<Vec<ImportRow>> {
    let file = File::open(path)
        .map_err(|error| io::Error::other(format!("open '{}': {error}", path.display())))?;
    read_import_rows(BufReader::new(file)).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("read '{}': {}", path.display(), error.message()),
        )
    })
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    explicit
        .or(from_env)
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("database URL missing: set --database-url or {DATABASE_URL_ENV}"),
            )
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    #[rstest]
    #[case(Some("postgres://cli"), Some("postgres://env"), Some("postgres://cli"))]
    #[case(None, Some(" postgres://env "), Some("postgres://env"))]
    #[case(Some("  "), None, None)]
    #[case(None, None, None)]
    fn database_url_prefers_the_flag(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved = resolve_database_url(
            explicit.map(str::to_owned),
            from_env.map(str::to_owned),
        );
        assert_eq!(resolved.ok().as_deref(), expected);
    }

    #[rstest]
    fn rows_are_read_from_the_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "start,end,quality").expect("write header");
        writeln!(file, "2024-03-01T23:00:00Z,2024-03-02T07:00:00Z,4").expect("write row");
        writeln!(file, "2024-03-02T23:00:00Z,,4").expect("write row");

        let rows = read_rows(file.path()).expect("rows");
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|row| row.parsed.is_ok()));
    }

    #[rstest]
    fn missing_files_are_reported() {
        let err = read_rows(Path::new("/nonexistent/nights.csv")).expect_err("missing file");
        assert!(err.to_string().contains("nights.csv"));
    }

    #[rstest]
    fn repeated_tracing_init_is_reported_not_fatal() {
        init_tracing();
        assert!(!init_tracing());
    }
}
