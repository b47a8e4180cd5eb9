//! Serialized game loop
//!
//! Timer ticks and player actions enter one FIFO queue and are applied to the
//! owned [`GameState`] strictly in order. After each event the loop drains
//! core notifications, hands them to listeners, and turns a game over into a
//! single best-effort score submission.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, warn};

use tetris_ladder_core::{GameConfig, GameSnapshot, GameState};
use tetris_ladder_types::{CoreEvent, GameAction};

/// One unit of work for the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// Milliseconds elapsed since the previous tick
    Tick(u32),
    Action(GameAction),
}

/// Final result of one game, handed to the score store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub points: u32,
    pub lines: u32,
    pub level: u32,
    pub episode_id: u32,
}

/// Receiver of final scores.
///
/// Implementations must not block the caller; errors are logged by the loop
/// and never affect the game.
pub trait ScoreSink {
    fn submit_score(&mut self, submission: ScoreSubmission) -> anyhow::Result<()>;

    /// Wait up to `timeout` for submissions still in flight.
    fn flush(&mut self, _timeout: Duration) {}
}

/// Observer of core notifications (sound, effects, statistics)
pub trait EventListener {
    fn on_event(&mut self, event: &CoreEvent);
}

/// Listener that writes every core event to the debug log
#[derive(Debug, Default)]
pub struct EventLogger;

impl EventListener for EventLogger {
    fn on_event(&mut self, event: &CoreEvent) {
        match event {
            CoreEvent::Spawned { kind } => debug!("spawned {}", kind.as_str()),
            CoreEvent::Locked { kind, lock } => debug!("locked {} ({:?})", kind.as_str(), lock),
            CoreEvent::LinesCleared { count, points } => {
                debug!("cleared {} lines for {} points", count, points)
            }
            CoreEvent::PauseChanged { paused } => debug!("paused: {}", paused),
            CoreEvent::GameOver { .. } | CoreEvent::Restarted => {}
        }
    }
}

pub struct GameLoop {
    state: GameState,
    queue: VecDeque<LoopEvent>,
    sink: Option<Box<dyn ScoreSink>>,
    listeners: Vec<Box<dyn EventListener>>,
    submitted: u32,
}

impl GameLoop {
    pub fn new(config: GameConfig) -> Self {
        Self::from_state(GameState::with_config(config))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            queue: VecDeque::new(),
            sink: None,
            listeners: Vec::new(),
            submitted: 0,
        }
    }

    pub fn set_score_sink(&mut self, sink: Box<dyn ScoreSink>) {
        self.sink = Some(sink);
    }

    pub fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Spawn the first piece and publish its events.
    pub fn start(&mut self) {
        self.state.start();
        self.dispatch_events();
    }

    /// Enqueue an event; nothing happens until [`GameLoop::run_pending`].
    pub fn push(&mut self, event: LoopEvent) {
        self.queue.push_back(event);
    }

    pub fn push_action(&mut self, action: GameAction) {
        self.push(LoopEvent::Action(action));
    }

    pub fn push_tick(&mut self, elapsed_ms: u32) {
        self.push(LoopEvent::Tick(elapsed_ms));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process every queued event in order. Returns true if any changed state.
    pub fn run_pending(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.queue.pop_front() {
            changed |= self.process(event);
        }
        changed
    }

    /// Apply one event immediately, bypassing the queue.
    pub fn process(&mut self, event: LoopEvent) -> bool {
        let changed = match event {
            LoopEvent::Tick(elapsed_ms) => self.state.tick(elapsed_ms),
            LoopEvent::Action(action) => {
                let accepted = self.state.apply_action(action);
                if !accepted {
                    debug!("action {} ignored in {}", action.as_str(), self.state.phase().as_str());
                }
                accepted
            }
        };
        self.dispatch_events();
        changed
    }

    fn dispatch_events(&mut self) {
        for event in self.state.take_events() {
            for listener in self.listeners.iter_mut() {
                listener.on_event(&event);
            }
            match event {
                CoreEvent::GameOver {
                    points,
                    lines,
                    level,
                } => {
                    info!("game over: {} points, {} lines, level {}", points, lines, level);
                    self.submit(ScoreSubmission {
                        points,
                        lines,
                        level,
                        episode_id: self.state.episode_id(),
                    });
                }
                CoreEvent::Restarted => {
                    debug!("restarted, episode {}", self.state.episode_id());
                }
                _ => {}
            }
        }
    }

    fn submit(&mut self, submission: ScoreSubmission) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        self.submitted += 1;
        if let Err(e) = sink.submit_score(submission) {
            warn!("score submission failed: {:#}", e);
        }
    }

    /// Give in-flight score submissions up to `timeout` to finish.
    pub fn shutdown(&mut self, timeout: Duration) {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush(timeout);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.snapshot_into(out);
    }

    /// Number of submissions attempted since creation
    pub fn submissions(&self) -> u32 {
        self.submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<ScoreSubmission>>>);

    impl ScoreSink for Recorder {
        fn submit_score(&mut self, submission: ScoreSubmission) -> anyhow::Result<()> {
            self.0.borrow_mut().push(submission);
            Ok(())
        }
    }

    struct Failing;

    impl ScoreSink for Failing {
        fn submit_score(&mut self, _submission: ScoreSubmission) -> anyhow::Result<()> {
            anyhow::bail!("store unreachable")
        }
    }

    fn top_out(game: &mut GameLoop) {
        for _ in 0..100 {
            game.push_action(GameAction::HardDrop);
        }
        game.run_pending();
        assert!(game.state().game_over());
    }

    #[test]
    fn test_events_run_in_order() {
        let mut game = GameLoop::new(GameConfig::default());
        game.start();
        let x = game.state().active().unwrap().x;
        game.push_action(GameAction::MoveLeft);
        game.push_action(GameAction::MoveLeft);
        game.push_action(GameAction::MoveRight);
        assert_eq!(game.pending(), 3);
        assert!(game.run_pending());
        assert_eq!(game.pending(), 0);
        assert_eq!(game.state().active().unwrap().x, x - 1);
    }

    #[test]
    fn test_game_over_submits_exactly_once() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let mut game = GameLoop::new(GameConfig::default());
        game.set_score_sink(Box::new(Recorder(submitted.clone())));
        game.start();

        top_out(&mut game);
        game.push_tick(60_000);
        game.push_action(GameAction::HardDrop);
        game.run_pending();

        let submitted = submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].points, game.state().points());
    }

    #[test]
    fn test_submission_failure_does_not_touch_game() {
        let mut game = GameLoop::new(GameConfig::default());
        game.set_score_sink(Box::new(Failing));
        game.start();
        top_out(&mut game);
        assert_eq!(game.submissions(), 1);

        game.process(LoopEvent::Action(GameAction::Restart));
        assert!(!game.state().game_over());
    }
}
