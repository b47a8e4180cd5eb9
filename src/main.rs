//! Terminal game runner (default binary).
//!
//! Keys and ticks are queued into the engine's game loop and processed in
//! order once per frame; the snapshot is rendered through the framebuffer
//! view. Final scores go to the leaderboard when an identity is configured.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use tetris_ladder::core::GameSnapshot;
use tetris_ladder::engine::{EngineConfig, EventLogger, GameLoop};
use tetris_ladder::input::{should_quit, Keymap};
use tetris_ladder::leaderboard::ScoreReporter;
use tetris_ladder::logging;
use tetris_ladder::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetris_ladder::types::TICK_MS;

fn main() -> Result<()> {
    logging::init_game()?;

    let config = EngineConfig::from_env();
    info!(
        "starting: seed {}, generator {}",
        config.seed,
        config.generator.as_str()
    );

    let mut game = GameLoop::new(config.game_config());
    game.add_listener(Box::new(EventLogger));
    match ScoreReporter::start_from_env(&config) {
        Some(reporter) => {
            info!("reporting scores to {}", reporter.address());
            game.set_score_sink(Box::new(reporter));
        }
        None => info!("score reporting off"),
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    game.shutdown(Duration::from_secs(2));
    result
}

fn run(term: &mut TerminalRenderer, game: &mut GameLoop) -> Result<()> {
    game.start();

    let view = GameView::default();
    let keymap = Keymap::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = keymap.action_for(key) {
                        game.push_action(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            game.push_tick(elapsed.as_millis() as u32);
        }

        game.run_pending();
    }
}
