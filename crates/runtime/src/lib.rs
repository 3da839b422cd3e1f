//! Game runtime: the async driver that owns the game state, the drop clock
//! schedule, highscore persistence, the event log and env configuration.

pub mod config;
pub mod driver;
pub mod event_log;
pub mod highscores;
pub mod host;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use config::RuntimeConfig;
pub use driver::{Driver, DriverHandle, DriverInput, DriverNotice};
pub use event_log::{EventLog, LogRecord};
pub use highscores::{HighscoreRecord, HighscoreStore, JsonFileStore, MemoryStore, StoreError};
pub use host::{open_store, GameHost};
