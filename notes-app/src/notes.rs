// Per-user markdown note storage
// Notes are plain .md files under <data>/notes/<username>/; the listing is
// sorted newest-first by modification time, matching what the sidebar shows.

use crate::session::config::Config;
use crate::session::store::atomic_write;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs;

/// A note as presented to the UI
#[derive(Debug, Clone)]
pub struct Note {
    pub name: String,
    pub content: String,
    pub modified_at: DateTime<Utc>,
}

/// List a user's notes, newest first
pub fn list_notes(config: &Config, username: &str) -> Result<Vec<Note>> {
    let dir = config.user_notes_dir(username);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create notes directory: {}", dir.display()))?;

    let mut notes = Vec::new();
    for entry in
        fs::read_dir(&dir).with_context(|| format!("Failed to read notes directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read note: {}", path.display()))?;
        let modified_at = entry
            .metadata()
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        notes.push(Note {
            name: name.to_string(),
            content,
            modified_at,
        });
    }

    notes.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    Ok(notes)
}

/// Read a single note, or None if it does not exist
pub fn read_note(config: &Config, username: &str, name: &str) -> Result<Option<String>> {
    validate_note_name(name)?;
    let path = config.user_notes_dir(username).join(format!("{}.md", name));
    match fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read note: {}", path.display())),
    }
}

/// Create or overwrite a note
pub fn save_note(config: &Config, username: &str, name: &str, content: &str) -> Result<()> {
    validate_note_name(name)?;
    let dir = config.user_notes_dir(username);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create notes directory: {}", dir.display()))?;
    atomic_write(&dir.join(format!("{}.md", name)), content)
}

/// Delete a note; returns false if no such note existed
pub fn delete_note(config: &Config, username: &str, name: &str) -> Result<bool> {
    validate_note_name(name)?;
    let path = config.user_notes_dir(username).join(format!("{}.md", name));
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to delete note: {}", path.display())),
    }
}

/// Note names become file names, so they must be plain
fn validate_note_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        bail!("Invalid note name: {:?}", name);
    }
    Ok(())
}
