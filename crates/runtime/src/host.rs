//! Runtime host: bridges the synchronous terminal loop with the async driver.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::config::RuntimeConfig;
use crate::driver::{Driver, DriverHandle};
use crate::event_log::EventLog;
use crate::highscores::{HighscoreStore, JsonFileStore, MemoryStore};
use crate::types::GameAction;

/// How long shutdown waits for the driver to flush its log.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Highscore store selected by the configuration.
pub fn open_store(config: &RuntimeConfig) -> Box<dyn HighscoreStore> {
    match &config.scores_path {
        Some(path) => Box::new(JsonFileStore::new(path.clone())),
        None => Box::new(MemoryStore::new()),
    }
}

/// Running game instance.
pub struct GameHost {
    rt: Runtime,
    task: JoinHandle<()>,
    handle: DriverHandle,
}

impl GameHost {
    /// Start the driver on a fresh multi-threaded runtime.
    pub fn start(config: &RuntimeConfig) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;

        let (task, handle) = {
            let _guard = rt.enter();
            let log = EventLog::from_path(config.log_path.clone());
            Driver::spawn(config, open_store(config), log)
        };

        Ok(Self { rt, task, handle })
    }

    pub fn handle(&self) -> &DriverHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut DriverHandle {
        &mut self.handle
    }

    /// Queue a player command from the terminal thread.
    ///
    /// Returns false if the command was dropped.
    pub fn submit(&self, action: GameAction) -> bool {
        submit_on(&self.rt, &self.handle, action)
    }

    /// Stop the driver and wait (bounded) for it to finish writing.
    pub fn shutdown(self) -> Result<()> {
        self.handle.request_shutdown();
        let task = self.task;
        self.rt
            .block_on(async { tokio::time::timeout(SHUTDOWN_GRACE, task).await })
            .context("driver did not stop in time")?
            .context("driver task failed")?;
        Ok(())
    }
}

/// Moves and drops are discarded when the command queue is full; pause and
/// restart block until the driver makes room.
fn submit_on(rt: &Runtime, handle: &DriverHandle, action: GameAction) -> bool {
    if handle.try_send(action) {
        return true;
    }
    match action {
        GameAction::TogglePause | GameAction::Restart => rt.block_on(handle.send(action)),
        _ => false,
    }
}
