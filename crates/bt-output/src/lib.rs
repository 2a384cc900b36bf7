//! `bt-output` — the append-only event log for the bus_track engine.
//!
//! Every tick the engine hands its [`StateUpdate`][bt_core::StateUpdate] to
//! an [`EventSink`] before anything is dispatched to consumers.  Two sinks
//! are provided:
//!
//! | Sink            | Storage                                              |
//! |-----------------|------------------------------------------------------|
//! | [`CsvEventLog`] | `bus_simulation_log.csv`, flushed + synced per tick  |
//! | [`MemorySink`]  | `Vec<StateUpdate>` (tests, embedding)                |
//!
//! Persisted logs are read back with [`read_log`] for audit and replay.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bt_output::CsvEventLog;
//!
//! let sink = CsvEventLog::create_in(Path::new("./output"))?;
//! let engine = SimBuilder::new(config, SimRng::new(seed), sink).build()?;
//! ```

pub mod csv_log;
pub mod error;
pub mod replay;
pub mod row;
pub mod sink;


pub use csv_log::{CsvEventLog, LOG_FILE_NAME, LOG_HEADER};
pub use error::{OutputError, OutputResult};
pub use replay::{read_log, read_log_reader, replay_updates};
pub use row::LogRecord;
pub use sink::{EventSink, MemorySink};
