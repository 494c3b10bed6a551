use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the lifetime of the program.
pub fn init_logging(log_dir: &str) -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("club_analysis=info,warn"));

    // Console logs go to stderr so stdout stays clean for exported tables
    if fs::create_dir_all(log_dir).is_err() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
        return None;
    }

    // Daily-rolled JSON file log
    let file_appender = tracing_appender::rolling::daily(log_dir, "club_analysis.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    Some(guard)
}
