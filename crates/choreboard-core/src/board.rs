//! Application state.
//!
//! [`Board`] owns the chore and user collections plus the display cursor.
//! Every mutating method returns a [`Commit`] for the caller to persist and
//! queues [`Event`]s that the control loop drains.

use chrono::{DateTime, Utc};

use crate::chore::{Chore, Frequency, User};
use crate::commit::Commit;
use crate::error::ValidationError;
use crate::events::Event;
use crate::ledger::{self, LedgerOutcome, PointsTable};
use crate::recurrence;

#[derive(Debug, Clone, Default)]
pub struct Board {
    chores: Vec<Chore>,
    users: Vec<User>,
    /// Index of the chore on the physical display. Not persisted.
    cursor: usize,
    points: PointsTable,
    events: Vec<Event>,
    /// Bumped when a chore is edited or removed. Not persisted.
    revision: u64,
}

impl Board {
    pub fn new(chores: Vec<Chore>, users: Vec<User>, points: PointsTable) -> Self {
        Self {
            chores,
            users,
            cursor: 0,
            points,
            events: Vec::new(),
            revision: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn chores(&self) -> &[Chore] {
        &self.chores
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Changes whenever an index or name captured earlier may no longer
    /// refer to the same chore. Appending a chore does not count.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn points_table(&self) -> &PointsTable {
        &self.points
    }

    pub fn selected(&self) -> Option<&Chore> {
        self.chores.get(self.cursor)
    }

    pub fn chore(&self, index: usize) -> Result<&Chore, ValidationError> {
        self.chores.get(index).ok_or(ValidationError::OutOfBounds {
            collection: "chores",
            index,
            len: self.chores.len(),
        })
    }

    pub fn user(&self, index: usize) -> Result<&User, ValidationError> {
        self.users.get(index).ok_or(ValidationError::OutOfBounds {
            collection: "users",
            index,
            len: self.users.len(),
        })
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Cursor ───────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        if !self.chores.is_empty() {
            self.cursor = (self.cursor + 1) % self.chores.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.chores.is_empty() {
            self.cursor = (self.cursor + self.chores.len() - 1) % self.chores.len();
        }
    }

    // ── Chores ───────────────────────────────────────────────────────

    pub fn add_chore(
        &mut self,
        name: &str,
        assignee: &str,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> Result<Commit, ValidationError> {
        let name = non_empty("name", name)?;
        let chore = Chore::new(name, assignee.trim(), frequency, now);
        self.events.push(Event::ChoreAdded {
            index: self.chores.len(),
            name: chore.name.clone(),
            at: now,
        });
        self.chores.push(chore);
        Ok(Commit::CHORES)
    }

    /// Edit a chore's fields. Awarded points are left untouched.
    pub fn update_chore(
        &mut self,
        index: usize,
        name: &str,
        assignee: &str,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> Result<Commit, ValidationError> {
        let name = non_empty("name", name)?;
        self.chore(index)?;
        let chore = &mut self.chores[index];
        chore.name = name.to_string();
        chore.assignee = assignee.trim().to_string();
        chore.frequency = frequency;
        if chore.completed {
            chore.refresh_due(now);
        }
        self.revision += 1;
        self.events.push(Event::ChoreUpdated {
            index,
            name: chore.name.clone(),
            at: now,
        });
        Ok(Commit::CHORES)
    }

    pub fn delete_chore(&mut self, index: usize, now: DateTime<Utc>) -> Result<Commit, ValidationError> {
        self.chore(index)?;
        let removed = self.chores.remove(index);
        self.revision += 1;
        self.clamp_cursor();
        self.events.push(Event::ChoreDeleted {
            index,
            name: removed.name,
            at: now,
        });
        Ok(Commit::CHORES)
    }

    pub fn set_completion(
        &mut self,
        index: usize,
        complete: bool,
        now: DateTime<Utc>,
    ) -> Result<Commit, ValidationError> {
        self.chore(index)?;
        let chore = &mut self.chores[index];
        let outcome = ledger::set_completion(chore, &mut self.users, &self.points, now, complete);
        self.record_ledger(index, &outcome, now);
        Ok(outcome.commit())
    }

    /// Flip the completion state of the chore at `index`.
    pub fn toggle_chore(&mut self, index: usize, now: DateTime<Utc>) -> Result<Commit, ValidationError> {
        let complete = !self.chore(index)?.completed;
        self.set_completion(index, complete, now)
    }

    /// Reset expired completions.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Commit {
        let expired = self
            .chores
            .iter()
            .filter(|c| c.completed && now >= c.next_due_at)
            .count();
        if !recurrence::sweep(&mut self.chores, now) {
            return Commit::NONE;
        }
        self.events.push(Event::CompletionsExpired {
            count: expired,
            at: now,
        });
        Commit::CHORES
    }

    // ── Users ────────────────────────────────────────────────────────

    pub fn add_user(&mut self, username: &str, now: DateTime<Utc>) -> Result<Commit, ValidationError> {
        let username = self.unique_username(username, None)?;
        self.users.push(User::new(username.clone()));
        self.events.push(Event::UserAdded { username, at: now });
        Ok(Commit::USERS)
    }

    /// Rename a user. Chores assigned to the old name keep it.
    pub fn rename_user(
        &mut self,
        index: usize,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Commit, ValidationError> {
        self.user(index)?;
        let username = self.unique_username(username, Some(index))?;
        let from = std::mem::replace(&mut self.users[index].username, username.clone());
        self.events.push(Event::UserRenamed {
            from,
            to: username,
            at: now,
        });
        Ok(Commit::USERS)
    }

    /// Remove a user. Chores assigned to them are left as they are.
    pub fn delete_user(&mut self, index: usize, now: DateTime<Utc>) -> Result<Commit, ValidationError> {
        self.user(index)?;
        let removed = self.users.remove(index);
        self.events.push(Event::UserDeleted {
            username: removed.username,
            at: now,
        });
        Ok(Commit::USERS)
    }

    pub fn reset_points(&mut self, now: DateTime<Utc>) -> Commit {
        for user in &mut self.users {
            user.points = 0;
        }
        self.events.push(Event::PointsReset { at: now });
        Commit::USERS
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.chores.len() {
            self.cursor = self.chores.len().saturating_sub(1);
        }
    }

    fn unique_username(&self, username: &str, skip: Option<usize>) -> Result<String, ValidationError> {
        let username = non_empty("username", username)?;
        let taken = self
            .users
            .iter()
            .enumerate()
            .any(|(i, u)| Some(i) != skip && u.username == username);
        if taken {
            return Err(ValidationError::InvalidValue {
                field: "username".to_string(),
                message: format!("'{username}' already exists"),
            });
        }
        Ok(username.to_string())
    }

    fn record_ledger(&mut self, index: usize, outcome: &LedgerOutcome, now: DateTime<Utc>) {
        if !outcome.changed {
            return;
        }
        let chore = &self.chores[index];
        self.events.push(if chore.completed {
            Event::ChoreCompleted {
                index,
                name: chore.name.clone(),
                next_due_at: chore.next_due_at,
                at: now,
            }
        } else {
            Event::ChoreReopened {
                index,
                name: chore.name.clone(),
                at: now,
            }
        });
        if let Some(award) = &outcome.award {
            self.events.push(if award.delta >= 0 {
                Event::PointsAwarded {
                    username: award.username.clone(),
                    points: award.delta,
                    balance: award.balance,
                    at: now,
                }
            } else {
                Event::PointsRevoked {
                    username: award.username.clone(),
                    points: -award.delta,
                    balance: award.balance,
                    at: now,
                }
            });
        }
    }
}

fn non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed)
}
