//! # pearclock Core Library
//!
//! Business logic for pearclock, a focus timer that watches how long you have
//! been working without a break. Everything is available to the `pearclock`
//! CLI; any other front-end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Session**: a clock-driven state machine. The caller invokes `tick()`
//!   once per simulated second; every operation returns the effects to
//!   perform instead of performing them.
//! - **Escalation**: a pure function turning the current focus streak into
//!   color changes, cues and the automatic record.
//! - **Controller**: runs a session on a tokio tick task and forwards effects
//!   to display and audio sinks.
//! - **Storage**: SQLite entry log and TOML configuration.
//!
//! ## Key Components
//!
//! - [`Session`]: Core timer state machine
//! - [`FocusController`]: Real-time driver for a session
//! - [`Entry`] / [`EntryLog`]: Recorded sessions and where they go
//! - [`Database`]: SQLite entry log
//! - [`Config`]: Application configuration management

pub mod controller;
pub mod effects;
pub mod entry;
pub mod error;
pub mod sinks;
pub mod storage;
pub mod timer;

pub use controller::FocusController;
pub use effects::{Cue, DisplayTarget, Effect};
pub use entry::{
    clear_entries, digest, export_tsv, make_entry, ClearOutcome, Entry, EntryLog, MemoryEntryLog,
};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use sinks::{Confirm, CueSink, DisplaySink, RecordingSink};
pub use storage::{Config, Database};
pub use timer::{
    Clock, ColorState, ManualClock, Mode, MonotonicClock, Session, SessionSnapshot, TimeScale,
    MAX_ACCELERATOR,
};
