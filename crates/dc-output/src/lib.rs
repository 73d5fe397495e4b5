//! `dc-output`: controller telemetry writers.
//!
//! | Backend | Files created                       |
//! |---------|-------------------------------------|
//! | CSV     | `commands.csv`, `conflicts.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`TelemetryObserver`], which implements
//! `dc_control::ControllerObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dc_output::{CsvWriter, TelemetryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TelemetryObserver::new(writer);
//! controller.process(agent, pose, &mut sink, &mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TelemetryObserver;
pub use row::{CommandRow, ConflictRow};
pub use writer::OutputWriter;
