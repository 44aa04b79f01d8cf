//! Outcome of bulk operations that skip bad items instead of aborting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// An item that a bulk operation skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    /// Path of the skipped item.
    pub path: PathBuf,

    /// Why it was skipped.
    pub reason: String,
}

/// Counts and failures collected by a directory scan or import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Items the operation tried to process.
    pub attempted: usize,

    /// Items processed successfully.
    pub succeeded: usize,

    /// Items skipped, in scan order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Count a processed item.
    pub const fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Count a skipped item.
    pub fn record_failure(&mut self, path: impl Into<PathBuf>, reason: impl fmt::Display) {
        self.attempted += 1;
        self.failures.push(ScanFailure {
            path: path.into(),
            reason: reason.to_string(),
        });
    }

    /// Number of skipped items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} succeeded", self.succeeded, self.attempted)?;
        if !self.is_clean() {
            write!(f, ", {} failed", self.failed())?;
        }
        Ok(())
    }
}
