//! Pass-through logging for inspecting values mid-pipeline.

use std::fmt::Debug;
use std::io::Write;
use tracing::{debug, warn};

/// Prints `value` to stdout and hands it back unchanged.
pub fn log_and_return<T: Debug>(value: T) -> T {
    let stdout = std::io::stdout();
    log_and_return_to(&mut stdout.lock(), value)
}

/// Writes the `Debug` form of `value` to `writer` and returns `value`.
///
/// A failed write is logged and otherwise ignored.
pub fn log_and_return_to<W: Write, T: Debug>(writer: &mut W, value: T) -> T {
    debug!(value = ?value, "Observed pipeline value");
    if let Err(e) = writeln!(writer, "{value:?}") {
        warn!(error = %e, "Failed to write observed value");
    }
    value
}
