// Single-slot key-value store over a shared directory
//
// Each key maps to exactly one file. Writes are last-write-wins; consumers
// remove the slot as they read it. This is the only coordination channel
// between independent sessions sharing a data directory - there are no
// locks and no transactions, by contract of the slot semantics.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Counter to keep claim file names unique within one process
static CLAIM_SEQ: AtomicU64 = AtomicU64::new(0);

/// A directory of single-slot entries, one file per key
#[derive(Debug, Clone)]
pub struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Overwrite the slot for `key`. Last write wins; there is no
    /// acknowledgement that anyone will ever read it.
    pub fn put(&self, key: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create slot directory: {}", self.dir.display()))?;
        atomic_write(&self.slot_path(key), contents)
    }

    /// Last-modified time of the slot, or None when no slot exists.
    /// A missing slot is a normal state, never an error.
    pub fn modified(&self, key: &str) -> Option<SystemTime> {
        fs::metadata(self.slot_path(key))
            .ok()
            .and_then(|m| m.modified().ok())
    }

    /// Remove the slot and return its contents, or None when no slot exists.
    ///
    /// The slot is claimed by renaming it to a process-unique name before
    /// reading, so a concurrent taker observes NotFound rather than the
    /// same payload.
    pub fn take(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        let claim = self.dir.join(format!(
            ".{}.claim.{}.{}",
            key,
            std::process::id(),
            CLAIM_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        match fs::rename(&path, &claim) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to claim slot: {}", path.display()))
            }
        }

        let contents = fs::read_to_string(&claim)
            .with_context(|| format!("Failed to read claimed slot: {}", claim.display()))?;
        let _ = fs::remove_file(&claim);
        Ok(Some(contents))
    }
}

/// Atomically write a file using write-to-temp + rename
/// This ensures no reader ever observes a partially written slot
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("Invalid path: {}", path.display()))?;

    // Create temp file in same directory to ensure same filesystem for rename
    let temp_path = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown"),
        std::process::id()
    ));

    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}
