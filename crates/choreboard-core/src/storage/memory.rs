use super::Store;
use crate::chore::{Chore, User};
use crate::error::StorageError;

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub chores: Vec<Chore>,
    pub users: Vec<User>,
    /// Number of saves per collection.
    pub chore_saves: usize,
    pub user_saves: usize,
}

impl MemoryStore {
    pub fn new(chores: Vec<Chore>, users: Vec<User>) -> Self {
        Self {
            chores,
            users,
            ..Self::default()
        }
    }
}

impl Store for MemoryStore {
    fn load_chores(&self) -> Vec<Chore> {
        self.chores.clone()
    }

    fn load_users(&self) -> Vec<User> {
        self.users.clone()
    }

    fn save_chores(&mut self, chores: &[Chore]) -> Result<(), StorageError> {
        self.chores = chores.to_vec();
        self.chore_saves += 1;
        Ok(())
    }

    fn save_users(&mut self, users: &[User]) -> Result<(), StorageError> {
        self.users = users.to_vec();
        self.user_saves += 1;
        Ok(())
    }
}
