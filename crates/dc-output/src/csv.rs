//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `commands.csv`
//! - `conflicts.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CommandRow, ConflictRow, OutputResult};

pub const COMMAND_HEADERS: [&str; 14] = [
    "seq", "source", "agent", "name", "mode", "x", "y", "heading",
    "prev_x", "prev_y", "prev_heading", "linear_speed", "angular_speed", "resolved",
];

pub const CONFLICT_HEADERS: [&str; 4] = ["seq", "agent_a", "agent_b", "distance"];

/// Writes controller telemetry to two CSV files.
pub struct CsvWriter {
    commands:  Writer<File>,
    conflicts: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut commands = Writer::from_path(dir.join("commands.csv"))?;
        commands.write_record(COMMAND_HEADERS)?;

        let mut conflicts = Writer::from_path(dir.join("conflicts.csv"))?;
        conflicts.write_record(CONFLICT_HEADERS)?;

        Ok(Self {
            commands,
            conflicts,
            finished: false,
        })
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_commands(&mut self, rows: &[CommandRow]) -> OutputResult<()> {
        for row in rows {
            self.commands.write_record(&[
                row.seq.to_string(),
                row.source.to_string(),
                row.agent.to_string(),
                row.name.clone(),
                row.mode.to_owned(),
                row.x.to_string(),
                row.y.to_string(),
                row.heading.to_string(),
                opt(row.prev_x),
                opt(row.prev_y),
                opt(row.prev_heading),
                row.linear_speed.to_string(),
                row.angular_speed.to_string(),
                (row.resolved as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_conflicts(&mut self, rows: &[ConflictRow]) -> OutputResult<()> {
        for row in rows {
            self.conflicts.write_record(&[
                row.seq.to_string(),
                row.agent_a.to_string(),
                row.agent_b.to_string(),
                row.distance.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.commands.flush()?;
        self.conflicts.flush()?;
        Ok(())
    }
}
