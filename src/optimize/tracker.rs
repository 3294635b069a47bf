//! "Already processed" bookkeeping for a batch

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of files already handled in this batch, keyed by canonical path so
/// `public/a.png`, `./public/a.png` and an absolute spelling collapse to one
/// entry.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    seen: HashSet<PathBuf>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Record `path`; returns `false` if it was already recorded.
    pub fn insert(&mut self, path: &Path) -> bool {
        self.seen.insert(Self::key(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(&Self::key(path))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn different_spellings_are_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let file = dir.path().join("a.png");
        fs::write(&file, b"x").unwrap();

        let mut set = ProcessedSet::new();
        assert!(set.insert(&file));
        assert!(!set.insert(&dir.path().join("sub").join("..").join("a.png")));
        assert!(set.contains(&file));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn missing_paths_fall_back_to_literal_key() {
        let mut set = ProcessedSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Path::new("/no/such/file.png")));
        assert!(!set.insert(Path::new("/no/such/file.png")));
    }
}
