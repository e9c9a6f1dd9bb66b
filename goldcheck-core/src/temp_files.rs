//! Scratch and debug directory management.
//!
//! The scratch directory holds extracted candidate frames for one run. It is a
//! `tempfile::TempDir`, so it is removed when dropped on every exit path,
//! including early returns and panics that unwind.

use crate::error::CoreResult;
use std::fs;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Creates a scratch directory with prefix. Auto-cleaned when dropped.
///
/// Uses `base` when given, otherwise the system temp directory.
pub fn create_scratch_dir(base: Option<&Path>, prefix: &str) -> CoreResult<TempDir> {
    let mut builder = TempFileBuilder::new();
    builder.prefix(prefix);
    let dir = match base {
        Some(base) => {
            fs::create_dir_all(base)?;
            builder.tempdir_in(base)?
        }
        None => builder.tempdir()?,
    };
    log::debug!("Scratch directory: {}", dir.path().display());
    Ok(dir)
}

/// File name suffix of the difference images written for failing frames.
pub const DIFF_SUFFIX: &str = "_diff.png";

/// Removes diff images left by a previous run, creating the directory if needed.
///
/// Only regular files named `*_diff.png` directly inside `dir` are deleted.
/// Called once at the start of a run, before anything is written to it.
pub fn prepare_debug_dir(dir: &Path) -> CoreResult<()> {
    fs::create_dir_all(dir)?;

    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_diff = entry.file_name().to_string_lossy().ends_with(DIFF_SUFFIX);
        if is_diff && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    if removed > 0 {
        log::debug!("Removed {removed} stale diff image(s) from {}", dir.display());
    }
    Ok(())
}
