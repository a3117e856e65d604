//! Process-wide logging setup shared by the console binary and its tests.

/// Log subscriber configuration.
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Install the default subscriber: JSON lines, filtered by `RUST_LOG`
/// (falls back to `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init_with(LogFormat::Json, None);
}
