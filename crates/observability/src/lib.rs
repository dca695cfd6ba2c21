//! Tracing and logging (shared setup).

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging with the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
