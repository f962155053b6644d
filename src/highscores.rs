//! Best score persistence
//!
//! The record is a plain text file holding a single integer. A missing or
//! unreadable file counts as a best of zero.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default record file, relative to the working directory
pub const DEFAULT_RECORD_PATH: &str = "record.txt";

/// The all-time best score and where it is stored
#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u64,
}

impl HighScore {
    /// Load the record at `path`
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = read_record(&path);
        log::info!("Best score {} from {}", best, path.display());
        Self { path, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Offer a finished session's score
    ///
    /// Re-reads the file first so a record written by another session is
    /// never overwritten by a lower score. Returns true if the file was
    /// updated.
    pub fn submit(&mut self, score: u64) -> bool {
        let stored = read_record(&self.path);
        self.best = self.best.max(stored);

        if score <= stored {
            return false;
        }

        match write_record(&self.path, score) {
            Ok(()) => {
                log::info!("New best score {} saved to {}", score, self.path.display());
                self.best = score;
                true
            }
            Err(e) => {
                log::error!("Failed to save best score to {}: {}", self.path.display(), e);
                self.best = self.best.max(score);
                false
            }
        }
    }
}

/// Parse the stored record; anything unusable reads as zero
fn read_record(path: &Path) -> u64 {
    match fs::read_to_string(path) {
        Ok(text) => match text.trim().parse() {
            Ok(score) => score,
            Err(_) => {
                log::warn!("Ignoring malformed record file {}", path.display());
                0
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => {
            log::warn!("Could not read record file {}: {}", path.display(), e);
            0
        }
    }
}

fn write_record(path: &Path, score: u64) -> io::Result<()> {
    fs::write(path, score.to_string())
}
