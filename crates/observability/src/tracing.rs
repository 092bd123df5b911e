//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process from `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter, true);
}

/// Initialize tracing with an explicit filter directive.
///
/// An unparsable directive falls back to `info` rather than failing startup.
pub fn init_with(directive: &str, json: bool) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("invalid log filter '{directive}': {err}; using 'info'");
        EnvFilter::new("info")
    });
    install(filter, json);
}

fn install(filter: EnvFilter, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    // JSON logs + timestamps by default; plain text for local runs.
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_ok() {
        ::tracing::info!(json, "logging initialized");
    }
}
