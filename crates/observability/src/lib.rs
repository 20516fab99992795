//! Tracing and logging setup shared by every binary in the workspace.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops. Components do
/// not hold on to a logger: they open their own spans and emit through whatever
/// subscriber is installed here.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}
