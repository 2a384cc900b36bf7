//! CSV event log.
//!
//! One file per run, header row first:
//!
//! ```csv
//! timestamp,lat,lon,stop_name,seat_occupied,alert
//! 2023-11-14 22:13:20,37.7749,-122.4194,Stop A,3,Stop Arrived: Stop A
//! 2023-11-14 22:13:20,37.77495,-122.4192,,3,
//! ```
//!
//! The `timestamp` column is UTC, not local time.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use log::debug;

use bt_core::StateUpdate;

use crate::row::LogRecord;
use crate::sink::EventSink;
use crate::OutputResult;

/// Default file name used by [`CsvEventLog::create_in`].
pub const LOG_FILE_NAME: &str = "bus_simulation_log.csv";

/// Column names, in on-disk order.
pub const LOG_HEADER: [&str; 6] = ["timestamp", "lat", "lon", "stop_name", "seat_occupied", "alert"];

/// Appends one CSV row per tick.  Each append is flushed and synced to disk
/// before returning, so a crash loses at most the record being written.
pub struct CsvEventLog {
    writer:  Writer<File>,
    path:    PathBuf,
    written: u64,
}

impl CsvEventLog {
    /// Create (truncating) `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(LOG_HEADER)?;
        writer.flush()?;
        debug!("event log opened at {}", path.display());

        Ok(Self { writer, path: path.to_path_buf(), written: 0 })
    }

    /// Create [`LOG_FILE_NAME`] inside `dir`.
    pub fn create_in(dir: &Path) -> OutputResult<Self> {
        Self::create(&dir.join(LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for CsvEventLog {
    fn append(&mut self, update: &StateUpdate) -> OutputResult<()> {
        self.writer.serialize(LogRecord::from(update))?;
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.written += 1;
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.written
    }
}
