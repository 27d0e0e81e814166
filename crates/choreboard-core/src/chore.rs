//! Chore and user records.
//!
//! A chore names its assignee by username string. There is no foreign key:
//! deleting or renaming a user leaves chores pointing at the old name, and
//! the ledger simply finds no match for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::recurrence;

/// Recurrence class of a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(ValidationError::InvalidValue {
                field: "frequency".to_string(),
                message: format!("expected daily, weekly or monthly, got '{other}'"),
            }),
        }
    }
}

/// A recurring household chore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub name: String,
    /// Username of the person responsible. Matched by exact string equality.
    pub assignee: String,
    pub frequency: Frequency,
    pub completed: bool,
    /// `None` means the chore has never been completed.
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
    pub next_due_at: DateTime<Utc>,
    /// Points were credited for the current completion cycle.
    #[serde(default)]
    pub points_awarded: bool,
    /// Recipient and amount of that credit. Edits to the chore do not move it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded: Option<Credit>,
}

/// Points credited to a user for one completion cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub username: String,
    pub points: u32,
}

impl Chore {
    /// Create a chore that has never been completed and is due immediately.
    pub fn new(
        name: impl Into<String>,
        assignee: impl Into<String>,
        frequency: Frequency,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            assignee: assignee.into(),
            frequency,
            completed: false,
            last_completed_at: None,
            next_due_at: recurrence::next_due(None, frequency, now),
            points_awarded: false,
            awarded: None,
        }
    }

    /// Recompute `next_due_at` from the completion timestamp and frequency.
    pub fn refresh_due(&mut self, now: DateTime<Utc>) {
        self.next_due_at = recurrence::next_due(self.last_completed_at, self.frequency, now);
    }
}

/// A household member collecting points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub points: u32,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            points: 0,
        }
    }
}
