//! Per-file outcomes and the batch report

use std::path::PathBuf;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::OptimizeError;

/// A successfully re-encoded asset
#[derive(Debug, Clone, Serialize)]
pub struct Optimized {
    pub path: PathBuf,
    /// Dimensions before optimization
    pub original: (u32, u32),
    /// Dimensions written back
    pub output: (u32, u32),
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl Optimized {
    pub fn resized(&self) -> bool {
        self.original != self.output
    }
}

/// What happened to one file
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Optimized(Optimized),
    Failed { path: PathBuf, error: OptimizeError },
}

impl Outcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            Outcome::Optimized(o) => &o.path,
            Outcome::Failed { path, .. } => path,
        }
    }
}

impl Serialize for OptimizeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("OptimizeError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

/// Everything a batch run did, in processing order
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
    /// Files seen a second time (curated list and scan overlap) and skipped
    pub duplicates_skipped: usize,
}

impl BatchReport {
    pub fn optimized(&self) -> impl Iterator<Item = &Optimized> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Optimized(opt) => Some(opt),
            Outcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &OptimizeError)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Failed { path, error } => Some((path, error)),
            Outcome::Optimized(_) => None,
        })
    }

    pub fn optimized_count(&self) -> usize {
        self.optimized().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Total bytes saved across optimized files (negative if files grew)
    pub fn bytes_saved(&self) -> i64 {
        self.optimized()
            .map(|o| o.bytes_before as i64 - o.bytes_after as i64)
            .sum()
    }
}
