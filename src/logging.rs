//! Line logger for the binaries.
//!
//! Writes `[LEVEL target] message` lines to a file or stderr. The level comes
//! from `TETRIS_LOG` (default `info`); the destination from `TETRIS_LOG_PATH`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

enum Sink {
    Stderr,
    File(File),
}

pub struct LineLogger {
    level: LevelFilter,
    sink: Mutex<Sink>,
}

impl LineLogger {
    pub fn stderr(level: LevelFilter) -> Self {
        Self {
            level,
            sink: Mutex::new(Sink::Stderr),
        }
    }

    /// Append to `path`, creating it if needed.
    pub fn file(level: LevelFilter, path: &str) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            sink: Mutex::new(Sink::File(file)),
        })
    }
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{} {}] {}\n", record.level(), record.target(), record.args());
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let _ = match &mut *sink {
            Sink::Stderr => io::stderr().write_all(line.as_bytes()),
            Sink::File(file) => file.write_all(line.as_bytes()),
        };
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = match &mut *sink {
                Sink::Stderr => io::stderr().flush(),
                Sink::File(file) => file.flush(),
            };
        }
    }
}

/// `TETRIS_LOG`, default `info`
pub fn level_from_env() -> LevelFilter {
    std::env::var("TETRIS_LOG")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn log_path_from_env() -> Option<String> {
    std::env::var("TETRIS_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn install(logger: LineLogger) -> anyhow::Result<()> {
    let level = logger.level;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

/// Logging for the terminal game: file only, since stderr would corrupt the
/// alternate screen. Without `TETRIS_LOG_PATH` nothing is logged.
pub fn init_game() -> anyhow::Result<()> {
    match log_path_from_env() {
        Some(path) => install(LineLogger::file(level_from_env(), &path)?),
        None => Ok(()),
    }
}

/// Logging for services: `TETRIS_LOG_PATH` if set, stderr otherwise.
pub fn init_service() -> anyhow::Result<()> {
    let level = level_from_env();
    let logger = match log_path_from_env() {
        Some(path) => LineLogger::file(level, &path)?,
        None => LineLogger::stderr(level),
    };
    install(logger)
}
