//! Terminal runner (default binary).
//!
//! The game itself runs on the async driver; this loop only forwards key
//! presses, drains driver notices and renders the latest snapshot with a
//! framebuffer diff renderer.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use blocktris::input::{handle_key_event, should_quit};
use blocktris::runtime::{DriverNotice, GameHost, RuntimeConfig};
use blocktris::term::{EffectsLayer, FrameBuffer, GameView, PanelInfo, ScoreRow, TerminalRenderer, Viewport};
use blocktris::types::{GameAction, FRAME_MS};

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    let mut host = GameHost::start(&config)?;

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|()| run(&mut term, &mut host));

    // Always try to restore terminal state.
    let _ = term.exit();
    let stopped = host.shutdown();

    eprintln!("[Runtime] seed {} (set BLOCKTRIS_SEED to replay)", config.seed);
    result.and(stopped)
}

fn run(term: &mut TerminalRenderer, host: &mut GameHost) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut effects = EffectsLayer::new();
    let mut highscores: Vec<ScoreRow> = Vec::new();
    let mut message: Option<String> = None;
    // Set while `message` reports a dropped key press.
    let mut input_dropped = false;

    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut last_frame = Instant::now();

    loop {
        while let Some(notice) = host.handle_mut().try_notice() {
            match notice {
                DriverNotice::LineClear(clear) => effects.push_line_clear(&clear),
                DriverNotice::Highscores(records) => {
                    highscores = records
                        .into_iter()
                        .map(|r| ScoreRow {
                            name: r.name,
                            score: r.score,
                        })
                        .collect();
                }
                DriverNotice::SaveFailed(err) => {
                    message = Some(format!("highscore not saved: {err}"));
                }
                DriverNotice::LevelUp { .. } | DriverNotice::GameOver { .. } => {}
            }
        }

        let now = Instant::now();
        effects.advance(now.duration_since(last_frame).as_millis() as u32);
        last_frame = now;

        // Render.
        let snap = host.handle().snapshot();
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let panel = PanelInfo {
            highscores: &highscores,
            message: message.as_deref(),
        };
        view.render_into(&snap, panel, Some(&effects), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input until the next frame.
        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    if action == GameAction::Restart {
                        message = None;
                        input_dropped = false;
                        effects.clear();
                    }
                    if host.submit(action) {
                        if input_dropped {
                            message = None;
                            input_dropped = false;
                        }
                    } else {
                        message = Some(format!("input dropped: {}", action.as_str()));
                        input_dropped = true;
                    }
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
