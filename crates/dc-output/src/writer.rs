//! The `OutputWriter` trait implemented by telemetry backends.

use crate::{CommandRow, ConflictRow, OutputResult};

/// Sink for telemetry rows.
///
/// Errors never reach the control loop: [`TelemetryObserver`] stores them
/// for [`take_error`].
///
/// [`TelemetryObserver`]: crate::TelemetryObserver
/// [`take_error`]: crate::TelemetryObserver::take_error
pub trait OutputWriter {
    /// Write the commands emitted by one decision.
    fn write_commands(&mut self, rows: &[CommandRow]) -> OutputResult<()>;

    /// Write the conflicting pairs found by one decision.
    fn write_conflicts(&mut self, rows: &[ConflictRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
