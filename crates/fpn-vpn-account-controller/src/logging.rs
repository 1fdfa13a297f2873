// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub const DEFAULT_LOG_FILE: &str = "fpn-vpn-account.log";

const NOISY_DEPENDENCIES: &[&str] = &["hyper=info", "reqwest=warn", "mio=warn", "want=warn"];

fn env_filter() -> EnvFilter {
    NOISY_DEPENDENCIES
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
            EnvFilter::add_directive,
        )
}

/// Enables logging using `tracing-subscriber`. The filter is read from `RUST_LOG` and defaults to
/// `INFO`.
///
/// If a log directory is given, logs are written to "{log_dir}/fpn-vpn-account.log" instead of
/// stdout and panics are logged. The returned guard must be kept alive for the file writer to
/// flush. Calling this more than once leaves the first subscriber in place.
pub fn init_logger(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let log_builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .compact();

    let Some(log_dir) = log_dir else {
        if log_builder.try_init().is_err() {
            tracing::debug!("Logger already initialized");
        }
        return None;
    };

    let file_appender = tracing_appender::rolling::never(log_dir, DEFAULT_LOG_FILE);
    let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);

    if log_builder.with_writer(file_writer).try_init().is_err() {
        tracing::debug!("Logger already initialized");
        return None;
    }

    tracing::info!("Logging to {}", log_dir.join(DEFAULT_LOG_FILE).display());

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        tracing::error!(message = %panic);
        default_hook(panic);
    }));

    Some(worker_guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_dependency_directives_parse() {
        for directive in NOISY_DEPENDENCIES {
            assert!(
                directive.parse::<tracing_subscriber::filter::Directive>().is_ok(),
                "{directive}"
            );
        }
    }

    #[test]
    fn logging_to_file_creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();

        // Another test may have installed the global subscriber first
        if let Some(guard) = init_logger(Some(dir.path())) {
            drop(guard);
            assert!(dir.path().join(DEFAULT_LOG_FILE).exists());
        }
    }
}
