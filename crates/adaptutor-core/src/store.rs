//! JSON-file progress store.
//!
//! One file holds a map from user id to that user's progress record. Every
//! write goes to a temporary file in the same directory which is then
//! renamed over the store, so a crash mid-write leaves the previous
//! contents intact.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, TutorError};
use crate::model::UserProgress;

/// Durable per-user progress records.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Open the store at `path`, creating its directory and an empty store
    /// file if they do not exist yet. Safe to call repeatedly.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            write_atomic(&path, b"{}\n")?;
            tracing::debug!(path = %path.display(), "initialised progress store");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a user's record, or a fresh default record if the user is unknown.
    pub fn load(&self, user_id: &str) -> Result<UserProgress> {
        let mut all = self.read_all()?;
        Ok(all
            .remove(user_id)
            .unwrap_or_else(|| UserProgress::new(user_id)))
    }

    /// Overwrite a user's record, leaving every other user untouched.
    ///
    /// A history holding an invalid quiz record is rejected before anything
    /// is written.
    pub fn save(&self, user_id: &str, progress: &UserProgress) -> Result<()> {
        for (i, record) in progress.quiz_history.iter().enumerate() {
            record.check().map_err(|problem| {
                TutorError::Validation(format!(
                    "user '{user_id}' quiz record {}: {problem}",
                    i + 1
                ))
            })?;
        }

        let mut all = self.read_all()?;
        let mut record = progress.clone();
        record.user_id = user_id.to_string();
        all.insert(user_id.to_string(), record);
        self.write_all(&all)
    }

    /// Replace a user's record with a fresh default one.
    pub fn reset(&self, user_id: &str) -> Result<UserProgress> {
        let fresh = UserProgress::new(user_id);
        self.save(user_id, &fresh)?;
        tracing::info!(user_id, "progress reset");
        Ok(fresh)
    }

    /// Ids of every user with a stored record, sorted.
    pub fn user_ids(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }

    fn read_all(&self) -> Result<BTreeMap<String, UserProgress>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(TutorError::storage(&self.path, e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut all: BTreeMap<String, UserProgress> = serde_json::from_str(&content)
            .map_err(|e| TutorError::storage(&self.path, format!("malformed JSON: {e}")))?;

        for (user_id, progress) in all.iter_mut() {
            for (i, record) in progress.quiz_history.iter().enumerate() {
                record.check().map_err(|problem| {
                    TutorError::storage(
                        &self.path,
                        format!("user '{user_id}' quiz record {}: {problem}", i + 1),
                    )
                })?;
            }
            progress.user_id = user_id.clone();
        }
        Ok(all)
    }

    fn write_all(&self, all: &BTreeMap<String, UserProgress>) -> Result<()> {
        let json = serde_json::to_string_pretty(all)
            .map_err(|e| TutorError::storage(&self.path, format!("failed to serialize: {e}")))?;
        write_atomic(&self.path, json.as_bytes())
    }
}

/// Write `bytes` to `path` via a temporary sibling file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| TutorError::storage(path, format!("failed to create directory: {e}")))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| TutorError::storage(path, format!("failed to create temp file: {e}")))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| TutorError::storage(path, format!("failed to write: {e}")))?;
    tmp.persist(path)
        .map_err(|e| TutorError::storage(path, format!("failed to replace file: {}", e.error)))?;
    Ok(())
}
