//! JSON file storage.
//!
//! Chores and users live in two independent documents, `chores.json` and
//! `users.json`, inside the data directory. Each save rewrites the whole
//! collection through a temporary file and a rename.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{data_dir, Store};
use crate::chore::{Chore, User};
use crate::error::StorageError;

const CHORES_FILE: &str = "chores.json";
const USERS_FILE: &str = "users.json";

pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store in the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Open a store rooted at `dir` (created on first save).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Vec<T> {
        let path = self.dir.join(file);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved collection, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable collection, starting empty");
                return Vec::new();
            }
        };
        if content.trim().is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "malformed collection, starting empty");
            Vec::new()
        })
    }

    fn save<T: Serialize>(&self, file: &str, collection: &'static str, items: &[T]) -> Result<(), StorageError> {
        let path = self.dir.join(file);
        let content = serde_json::to_string_pretty(items)
            .map_err(|source| StorageError::EncodeFailed { collection, source })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&tmp, content))
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|source| StorageError::SaveFailed {
                collection,
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), count = items.len(), "saved {collection}");
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_chores(&self) -> Vec<Chore> {
        self.load(CHORES_FILE)
    }

    fn load_users(&self) -> Vec<User> {
        self.load(USERS_FILE)
    }

    fn save_chores(&mut self, chores: &[Chore]) -> Result<(), StorageError> {
        self.save(CHORES_FILE, "chores", chores)
    }

    fn save_users(&mut self, users: &[User]) -> Result<(), StorageError> {
        self.save(USERS_FILE, "users", users)
    }
}
