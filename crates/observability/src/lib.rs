//! Tracing and logging setup shared by console processes and tests.

use admin_console_core::ConsoleConfig;

/// Initialize process-wide logging with defaults (`RUST_LOG`, JSON lines).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize logging from a loaded [`ConsoleConfig`].
pub fn init_with(config: &ConsoleConfig) {
    tracing::init_with(&config.log_filter, config.log_json);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
