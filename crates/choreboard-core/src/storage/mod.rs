mod config;
mod json;
mod memory;

pub use config::{Config, DisplayConfig, InputConfig, ServerConfig, TimersConfig};
pub use json::JsonStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::board::Board;
use crate::chore::{Chore, User};
use crate::commit::Commit;
use crate::error::{Result, StorageError};

/// Load/save contract for the two persisted collections.
///
/// Loading never fails: an absent or malformed collection comes back empty.
pub trait Store {
    fn load_chores(&self) -> Vec<Chore>;
    fn load_users(&self) -> Vec<User>;
    fn save_chores(&mut self, chores: &[Chore]) -> Result<(), StorageError>;
    fn save_users(&mut self, users: &[User]) -> Result<(), StorageError>;

    /// Save whatever `commit` marks as dirty.
    fn commit(&mut self, board: &Board, commit: Commit) -> Result<(), StorageError> {
        if commit.chores {
            self.save_chores(board.chores())?;
        }
        if commit.users {
            self.save_users(board.users())?;
        }
        Ok(())
    }
}

/// Returns `~/.config/choreboard[-dev]/` based on CHOREBOARD_ENV.
///
/// Set CHOREBOARD_ENV=dev to use development data directory, or
/// CHOREBOARD_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("CHOREBOARD_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CHOREBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("choreboard-dev")
            } else {
                base_dir.join("choreboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Open the default JSON store and load the board with the configured
/// points table.
pub fn open_board(config: &Config) -> Result<(Board, JsonStore)> {
    config.validate()?;
    let store = JsonStore::open()?;
    let board = Board::new(store.load_chores(), store.load_users(), config.points.clone());
    Ok((board, store))
}
