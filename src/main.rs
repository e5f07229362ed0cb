// LapsSync - Application Entry Point
//
// Parses CLI arguments, initializes structured logging (stdout or a daily
// rolling log file), and dispatches to the command handler. Any error ends
// the process with exit code 1.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use laps_sync::cli::{execute, Cli, LogLevel};

/// Current file plus three rotated ones.
const LOG_FILES_KEPT: usize = 4;

/// Split `--log-file` into the appender's directory, prefix and suffix:
/// `/var/log/laps-sync.log` rolls as `/var/log/laps-sync.<date>.log`.
fn log_file_parts(path: &Path) -> (PathBuf, String, Option<String>) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "laps-sync".to_string());
    let suffix = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    (dir, prefix, suffix)
}

fn rolling_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let (dir, prefix, suffix) = log_file_parts(path);
    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(LOG_FILES_KEPT);
    if let Some(suffix) = suffix {
        builder = builder.filename_suffix(suffix);
    }
    builder.build(dir)
}

fn init_tracing(level: LogLevel, log_file: Option<&Path>) -> Result<(), InitError> {
    // RUST_LOG overrides --log-level. Secrets are never logged at any level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let appender = rolling_appender(path)?;
            builder.with_ansi(false).with_writer(appender).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = execute(cli.command()).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
