//! Reading a persisted event log back.

use std::io::Read;
use std::path::Path;

use bt_core::{StateUpdate, Tick};

use crate::row::LogRecord;
use crate::{OutputError, OutputResult};

/// Load every record from the log at `path`.
pub fn read_log(path: &Path) -> OutputResult<Vec<LogRecord>> {
    let file = std::fs::File::open(path)?;
    read_log_reader(file)
}

/// Like [`read_log`] but accepts any `Read` source.
pub fn read_log_reader<R: Read>(reader: R) -> OutputResult<Vec<LogRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: LogRecord = row?;
        records.push(record);
    }
    Ok(records)
}

/// Rebuild typed updates from log records, numbering ticks from zero in file
/// order.
pub fn replay_updates(records: &[LogRecord]) -> OutputResult<Vec<StateUpdate>> {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.to_update(Tick(i as u64)).map_err(|source| OutputError::Replay {
                // +2: 1-based, after the header row
                line: i as u64 + 2,
                source,
            })
        })
        .collect()
}
