//! Timestamped flight commands and their CSV encoding.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One RC setpoint applied at a point in the simulation timeline.
///
/// Channel values are normalized to `[-1, 1]`; the timestamp is offset from
/// the start of the test in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Microseconds since test start.
    pub timestamp_us: u64,

    /// Roll channel.
    pub x: f64,

    /// Pitch channel.
    pub y: f64,

    /// Throttle channel.
    pub z: f64,

    /// Yaw channel.
    pub r: f64,
}

impl Command {
    /// Serialize a command sequence to a CSV file.
    pub fn save_csv(commands: &[Command], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for command in commands {
            writer.serialize(command)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Deserialize a command sequence from a CSV file.
    pub fn load_csv(path: &Path) -> Result<Vec<Command>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut commands = Vec::new();
        for record in reader.deserialize() {
            commands.push(record?);
        }
        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sequence() -> Vec<Command> {
        vec![
            Command {
                timestamp_us: 0,
                x: 0.0,
                y: 0.0,
                z: 0.5,
                r: 0.0,
            },
            Command {
                timestamp_us: 2_000_000,
                x: 0.25,
                y: -0.1,
                z: 0.5,
                r: 0.0,
            },
            Command {
                timestamp_us: 5_500_000,
                x: 0.0,
                y: 0.0,
                z: -1.0,
                r: 0.3,
            },
        ]
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.csv");

        let commands = sample_sequence();
        Command::save_csv(&commands, &path).unwrap();
        let back = Command::load_csv(&path).unwrap();

        assert_eq!(commands, back);
    }

    #[test]
    fn test_csv_has_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.csv");

        Command::save_csv(&sample_sequence(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "timestamp_us,x,y,z,r");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(Command::load_csv(Path::new("does/not/exist.csv")).is_err());
    }
}
