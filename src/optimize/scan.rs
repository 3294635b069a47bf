//! Directory scanning for optimizable images

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Does `path` carry one of `extensions` (compared case-insensitively)?
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// List the regular files directly inside `dir` whose extension is in
/// `extensions`. Symlinks to regular files count; subdirectories are not
/// descended into. Results are sorted so batches run in a stable order.
pub fn scan_directory(dir: &Path, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        // follows symlinks; dangling links are not files
        if path.is_file() && has_extension(&path, extensions) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
