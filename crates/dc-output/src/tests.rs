//! Integration tests for dc-output.

use tempfile::TempDir;

use dc_control::{ControllerBuilder, DeconflictionController, RecordingSink};
use dc_core::{AgentId, DeconflictionConfig, Pose};

use crate::csv::{COMMAND_HEADERS, CONFLICT_HEADERS};
use crate::{CommandRow, ConflictRow, CsvWriter, OutputError, OutputResult, OutputWriter, TelemetryObserver};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn two_agents() -> DeconflictionController {
    ControllerBuilder::new(DeconflictionConfig::default())
        .agent("turtle1")
        .spawn("turtle2", Pose::new(3.0, 3.0, 0.0))
        .build()
        .unwrap()
}

fn records(path: &std::path::Path) -> Vec<csv::StringRecord> {
    csv::Reader::from_path(path)
        .unwrap()
        .records()
        .map(Result::unwrap)
        .collect()
}

#[cfg(test)]
mod csv_tests {
    use super::*;

    fn command_row(seq: u64) -> CommandRow {
        CommandRow {
            seq,
            source:        0,
            agent:         0,
            name:          "turtle1".into(),
            mode:          "CLEAR",
            x:             5.0,
            y:             5.0,
            heading:       0.0,
            prev_x:        None,
            prev_y:        None,
            prev_heading:  None,
            linear_speed:  2.0,
            angular_speed: 0.0,
            resolved:      false,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("commands.csv").exists());
        assert!(dir.path().join("conflicts.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("commands.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, COMMAND_HEADERS);

        let mut rdr = csv::Reader::from_path(dir.path().join("conflicts.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, CONFLICT_HEADERS);
    }

    #[test]
    fn missing_previous_pose_is_blank() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_commands(&[command_row(1)]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("commands.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "turtle1");
        assert_eq!(&rows[0][8], "");
        assert_eq!(&rows[0][13], "0");
    }

    #[test]
    fn conflict_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_conflicts(&[ConflictRow { seq: 4, agent_a: 0, agent_b: 1, distance: 0.5 }])
            .unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("conflicts.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(rows[0][3].parse::<f64>().unwrap(), 0.5);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_errors() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("does/not/exist"));
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn records_commands_and_conflicts() {
        let dir = tmp();
        let mut obs = TelemetryObserver::new(CsvWriter::new(dir.path()).unwrap());
        let mut sink = RecordingSink::new();
        let mut c = two_agents();

        c.process(AgentId(0), Pose::new(5.0, 5.0, 0.0), &mut sink, &mut obs).unwrap();
        c.process(AgentId(0), Pose::new(5.1, 5.0, 0.0), &mut sink, &mut obs).unwrap();
        c.process(AgentId(1), Pose::new(5.5, 5.5, 0.0), &mut sink, &mut obs).unwrap();
        obs.finish().unwrap();
        assert!(obs.take_error().is_none());
        assert_eq!(obs.decisions(), 3);
        assert_eq!(obs.transitions(), 1);

        let commands = records(&dir.path().join("commands.csv"));
        // One row per clear update, two for the conflicting one.
        assert_eq!(commands.len(), 4);
        assert_eq!(commands.len(), sink.len());

        // Second report of turtle1 carries its previous pose.
        assert_eq!(&commands[1][8], "5");
        // Conflict: turtle1 stops (resolved), turtle2 advances (resolved).
        assert_eq!(&commands[2][3], "turtle1");
        assert_eq!(&commands[2][4], "CONFLICT");
        assert_eq!(commands[2][11].parse::<f64>().unwrap(), 0.0);
        assert_eq!(&commands[2][13], "1");
        assert_eq!(&commands[3][3], "turtle2");
        assert_eq!(commands[3][11].parse::<f64>().unwrap(), 2.0);

        let conflicts = records(&dir.path().join("conflicts.csv"));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(&conflicts[0][0], "3");
    }

    #[test]
    fn counts_rejections() {
        let dir = tmp();
        let mut obs = TelemetryObserver::new(CsvWriter::new(dir.path()).unwrap());
        let mut c = two_agents();
        let _ = c.process(AgentId(9), Pose::default(), &mut RecordingSink::new(), &mut obs);
        assert_eq!(obs.rejected(), 1);
        assert_eq!(obs.decisions(), 0);
    }

    struct FailingWriter;

    impl OutputWriter for FailingWriter {
        fn write_commands(&mut self, _rows: &[CommandRow]) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }

        fn write_conflicts(&mut self, _rows: &[ConflictRow]) -> OutputResult<()> {
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_stored_not_raised() {
        let mut obs = TelemetryObserver::new(FailingWriter);
        let mut sink = RecordingSink::new();
        let mut c = two_agents();
        c.process(AgentId(0), Pose::new(5.0, 5.0, 0.0), &mut sink, &mut obs).unwrap();
        c.process(AgentId(1), Pose::new(8.0, 8.0, 0.0), &mut sink, &mut obs).unwrap();

        // The control loop is unaffected.
        assert_eq!(sink.len(), 2);
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }
}
