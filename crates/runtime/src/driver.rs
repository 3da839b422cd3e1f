//! Game driver: the single task that owns the `GameState`.
//!
//! Player commands arrive on a bounded channel and the drop clock is a tokio
//! interval; both are consumed by one `select!` loop, so every mutation runs
//! to completion before the next one starts. Renderers read the latest
//! snapshot from a `watch` channel and observers get `DriverNotice`s.
//! Highscore store calls run on tokio's blocking pool.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::config::RuntimeConfig;
use crate::core::{GameEvent, GameOverReason, GameSnapshot, GameState, LineClearEvent};
use crate::event_log::{EventLog, LogRecord};
use crate::highscores::{normalize_name, HighscoreRecord, HighscoreStore, StoreError};
use crate::types::{GameAction, HIGHSCORE_LIMIT};

/// Input delivered to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverInput {
    Action(GameAction),
    Shutdown,
}

/// Outbound notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverNotice {
    LineClear(LineClearEvent),
    LevelUp {
        level: u32,
        drop_interval_ms: u32,
    },
    GameOver {
        reason: GameOverReason,
        score: u32,
    },
    /// Current top list (at start, after restart and after a save).
    Highscores(Vec<HighscoreRecord>),
    /// The finished game's score could not be stored.
    SaveFailed(String),
}

/// Caller side of a running driver.
pub struct DriverHandle {
    commands: mpsc::Sender<DriverInput>,
    pub snapshots: watch::Receiver<GameSnapshot>,
    pub notices: mpsc::UnboundedReceiver<DriverNotice>,
}

impl DriverHandle {
    /// Queue an action without waiting. Returns false if the queue is full or
    /// the driver is gone; the action is dropped in that case.
    pub fn try_send(&self, action: GameAction) -> bool {
        self.commands.try_send(DriverInput::Action(action)).is_ok()
    }

    /// Queue an action, waiting for room in the queue.
    pub async fn send(&self, action: GameAction) -> bool {
        self.commands.send(DriverInput::Action(action)).await.is_ok()
    }

    /// Ask the driver to stop. Safe to call from outside the runtime.
    pub fn request_shutdown(&self) {
        let _ = self.commands.try_send(DriverInput::Shutdown);
    }

    /// Copy of the most recent snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        *self.snapshots.borrow()
    }

    pub fn try_notice(&mut self) -> Option<DriverNotice> {
        self.notices.try_recv().ok()
    }
}

type SharedStore = Arc<Mutex<Box<dyn HighscoreStore>>>;

pub struct Driver {
    game: GameState,
    player: String,
    store: SharedStore,
    log: EventLog,
    commands: mpsc::Receiver<DriverInput>,
    snapshots: watch::Sender<GameSnapshot>,
    notices: mpsc::UnboundedSender<DriverNotice>,
}

impl Driver {
    pub fn new(
        config: &RuntimeConfig,
        store: Box<dyn HighscoreStore>,
        log: EventLog,
    ) -> (Self, DriverHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_commands.max(1));
        let (snap_tx, snap_rx) = watch::channel(GameSnapshot::default());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        let driver = Self {
            game: GameState::new(config.seed),
            player: normalize_name(&config.player),
            store: Arc::new(Mutex::new(store)),
            log,
            commands: cmd_rx,
            snapshots: snap_tx,
            notices: notice_tx,
        };
        let handle = DriverHandle {
            commands: cmd_tx,
            snapshots: snap_rx,
            notices: notice_rx,
        };
        (driver, handle)
    }

    /// Spawn the driver onto the current tokio runtime.
    pub fn spawn(
        config: &RuntimeConfig,
        store: Box<dyn HighscoreStore>,
        log: EventLog,
    ) -> (JoinHandle<()>, DriverHandle) {
        let (driver, handle) = Self::new(config, store, log);
        (tokio::spawn(driver.run()), handle)
    }

    /// Run until `Shutdown` arrives or every handle is dropped.
    pub async fn run(mut self) {
        self.game.start();
        self.log.record(LogRecord::SessionStart {
            seed: self.game.seed(),
            player: self.player.clone(),
        });
        self.publish_highscores().await;
        self.publish_snapshot();

        let mut interval_ms = self.game.drop_interval_ms();
        let mut timer = drop_timer(interval_ms);

        loop {
            let ticking = self.game.clock().is_running() && !self.game.paused();

            tokio::select! {
                input = self.commands.recv() => match input {
                    Some(DriverInput::Action(action)) => {
                        let was_paused = self.game.paused();
                        if self.game.apply_action(action) {
                            self.log.record(LogRecord::Action { action: action.as_str() });
                        }
                        // Restart and resume both start a fresh drop period.
                        if action == GameAction::Restart || (was_paused && !self.game.paused()) {
                            timer.reset();
                        }
                    }
                    Some(DriverInput::Shutdown) | None => break,
                },
                _ = timer.tick(), if ticking => {
                    self.game.tick();
                }
            }

            self.handle_events().await;

            if self.game.drop_interval_ms() != interval_ms {
                interval_ms = self.game.drop_interval_ms();
                timer = drop_timer(interval_ms);
            }

            self.publish_snapshot();
        }

        self.log.record(LogRecord::Shutdown);
        self.log.close().await;
    }

    async fn handle_events(&mut self) {
        for event in self.game.take_events() {
            match event {
                GameEvent::LineClear(clear) => {
                    self.log.record(LogRecord::LineClear {
                        lines: clear.lines.len(),
                        score_delta: clear.score_delta,
                        level: clear.level,
                        total_lines: clear.total_lines,
                    });
                    self.notify(DriverNotice::LineClear(clear));
                }
                GameEvent::LevelUp {
                    level,
                    drop_interval_ms,
                } => {
                    self.log.record(LogRecord::LevelUp {
                        level,
                        drop_interval_ms,
                    });
                    self.notify(DriverNotice::LevelUp {
                        level,
                        drop_interval_ms,
                    });
                }
                GameEvent::GameOver {
                    reason,
                    score,
                    level,
                    lines,
                } => {
                    self.log.record(LogRecord::GameOver {
                        reason: reason.as_str(),
                        score,
                        level,
                        lines,
                    });
                    self.notify(DriverNotice::GameOver { reason, score });
                    self.save_score(score).await;
                }
                GameEvent::Restarted => {
                    self.log.record(LogRecord::Restart);
                    self.publish_highscores().await;
                }
            }
        }
    }

    /// Store the finished game's score. Failures are reported, never raised.
    async fn save_score(&mut self, score: u32) {
        let name = self.player.clone();
        let saved = with_store(&self.store, move |store| store.insert(&name, score)).await;
        match saved {
            Ok(()) => {
                self.log.record(LogRecord::ScoreSaved {
                    name: self.player.clone(),
                    score,
                });
                self.publish_highscores().await;
            }
            Err(e) => {
                let error = e.to_string();
                self.log.record(LogRecord::SaveFailed {
                    error: error.clone(),
                });
                self.notify(DriverNotice::SaveFailed(error));
            }
        }
    }

    async fn publish_highscores(&mut self) {
        match with_store(&self.store, |store| store.top_n(HIGHSCORE_LIMIT)).await {
            Ok(records) => self.notify(DriverNotice::Highscores(records)),
            Err(e) => self.notify(DriverNotice::SaveFailed(e.to_string())),
        }
    }

    fn publish_snapshot(&self) {
        self.snapshots
            .send_modify(|snap| self.game.snapshot_into(snap));
    }

    fn notify(&self, notice: DriverNotice) {
        let _ = self.notices.send(notice);
    }
}

/// Run `op` against the store on the blocking pool. `JsonFileStore` reads
/// and rewrites its file synchronously.
async fn with_store<T, F>(store: &SharedStore, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&mut Box<dyn HighscoreStore>) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || {
        let mut guard = store
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        op(&mut *guard)
    })
    .await
    .map_err(|e| StoreError::Unavailable(e.to_string()))?
}

/// Periodic drop trigger; the first tick is one full period away.
fn drop_timer(interval_ms: u32) -> Interval {
    let period = Duration::from_millis(interval_ms.max(1) as u64);
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
