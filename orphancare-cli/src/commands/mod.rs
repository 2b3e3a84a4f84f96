//! CLI command implementations

pub mod auth;
pub mod children;
pub mod config;
pub mod dashboard;
pub mod health;
pub mod logs;
pub mod nutrition;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use orphancare_core::domain::Mutation;
use orphancare_core::services::{EntryPoint, LogEvent, LoggingService};
use orphancare_core::{Error, OrphanCareContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Data directory from `ORPHANCARE_DIR` or `~/.orphancare`
pub fn get_data_dir() -> PathBuf {
    orphancare_core::config::default_data_dir()
}

/// Build the context for `command`, recording the invocation
pub fn get_context(command: &str) -> Result<OrphanCareContext> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let logger = get_logger();
    if let Some(l) = &logger {
        let _ = l.log_command(command);
    }

    OrphanCareContext::new(&data_dir, logger).context("Failed to initialize OrphanCare context")
}

/// Context with a restored session, or the `NoSession` error
pub async fn get_authenticated_context(command: &str) -> Result<OrphanCareContext> {
    let ctx = get_context(command)?;
    let state = ctx.session.restore().await;
    if !state.is_authenticated {
        return Err(Error::NoSession.into());
    }
    Ok(ctx)
}

/// Run `future` behind a spinner, cleared whatever the outcome
pub async fn with_spinner<T, F>(message: &str, json: bool, future: F) -> T
where
    F: Future<Output = T>,
{
    if json || atty::isnt(atty::Stream::Stderr) {
        return future.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = future.await;
    spinner.finish_and_clear();
    result
}

/// Print a mutation acknowledgement
pub fn print_mutation(result: &Mutation, fallback: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    crate::output::success(result.message.as_deref().unwrap_or(fallback));
    if let Some(id) = result.record_id() {
        println!("  ID: {}", id);
    }
    Ok(())
}
