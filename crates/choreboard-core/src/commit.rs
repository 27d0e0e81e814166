//! Write-through markers.
//!
//! Mutating operations never touch storage themselves. They return a
//! [`Commit`] naming the collections that changed and the caller saves them
//! before doing anything else.

use std::ops::{BitOr, BitOrAssign};

/// Collections dirtied by a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Commit {
    pub chores: bool,
    pub users: bool,
}

impl Commit {
    pub const NONE: Commit = Commit {
        chores: false,
        users: false,
    };
    pub const CHORES: Commit = Commit {
        chores: true,
        users: false,
    };
    pub const USERS: Commit = Commit {
        chores: false,
        users: true,
    };
    pub const ALL: Commit = Commit {
        chores: true,
        users: true,
    };

    pub fn is_empty(self) -> bool {
        !self.chores && !self.users
    }
}

impl BitOr for Commit {
    type Output = Commit;

    fn bitor(self, rhs: Commit) -> Commit {
        Commit {
            chores: self.chores || rhs.chores,
            users: self.users || rhs.users,
        }
    }
}

impl BitOrAssign for Commit {
    fn bitor_assign(&mut self, rhs: Commit) {
        *self = *self | rhs;
    }
}
