use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for progress messages. Each call is one line.
pub trait Logger {
    fn log(&mut self, message: &str);
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn log(&mut self, message: &str) {
        (**self).log(message);
    }
}

/// Prefixes a message with the current local time, e.g. `[2025-04-01 18:03:11] message`
pub fn timestamped(message: &str) -> String {
    format!("[{}] {}", Local::now().format(TIMESTAMP_FORMAT), message)
}

/// Appends timestamped lines to a log file
pub struct FileLogger {
    file: File,
    path: PathBuf,
}

impl FileLogger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Logger for FileLogger {
    fn log(&mut self, message: &str) {
        // A failed log write must never take the run down with it
        let _ = writeln!(self.file, "{}", timestamped(message));
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        let _ = self.file.flush();
    }
}

/// Keeps timestamped lines in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    pub lines: Vec<String>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&mut self, message: &str) {
        self.lines.push(timestamped(message));
    }
}
