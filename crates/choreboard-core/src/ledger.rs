//! Completion and points ledger.
//!
//! Flipping a chore's completion state and crediting/debiting the assignee
//! happen together. `points_awarded` gates the award so a chore earns at most
//! once per completion cycle, no matter how many times it is marked done.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chore::{Chore, Credit, Frequency, User};
use crate::commit::Commit;
use crate::error::ValidationError;

/// Points credited per completion, indexed by frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTable {
    #[serde(default = "default_daily")]
    pub daily: u32,
    #[serde(default = "default_weekly")]
    pub weekly: u32,
    #[serde(default = "default_monthly")]
    pub monthly: u32,
}

fn default_daily() -> u32 {
    1
}
fn default_weekly() -> u32 {
    5
}
fn default_monthly() -> u32 {
    20
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            daily: default_daily(),
            weekly: default_weekly(),
            monthly: default_monthly(),
        }
    }
}

impl PointsTable {
    pub fn points_for(&self, frequency: Frequency) -> u32 {
        match frequency {
            Frequency::Daily => self.daily,
            Frequency::Weekly => self.weekly,
            Frequency::Monthly => self.monthly,
        }
    }

    /// Rarer chores must be worth strictly more.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.daily < self.weekly && self.weekly < self.monthly {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: "points".to_string(),
                message: format!(
                    "must be strictly increasing daily < weekly < monthly, got {} / {} / {}",
                    self.daily, self.weekly, self.monthly
                ),
            })
        }
    }
}

/// Points movement caused by a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub username: String,
    /// Positive for a credit, negative for a debit (after clamping at zero).
    pub delta: i64,
    pub balance: u32,
}

/// Result of [`set_completion`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerOutcome {
    /// The chore record changed.
    pub changed: bool,
    pub award: Option<Award>,
}

impl LedgerOutcome {
    pub fn commit(&self) -> Commit {
        let mut commit = Commit::NONE;
        if self.changed {
            commit |= Commit::CHORES;
        }
        if self.award.is_some() {
            commit |= Commit::USERS;
        }
        commit
    }
}

/// Mark a chore complete or incomplete, moving the assignee's points.
///
/// A missing assignee is not an error: the completion still applies and no
/// points move. Reopening debits the user and amount recorded at completion,
/// even if the chore was reassigned or its frequency changed since.
pub fn set_completion(
    chore: &mut Chore,
    users: &mut [User],
    points: &PointsTable,
    now: DateTime<Utc>,
    complete: bool,
) -> LedgerOutcome {
    if complete {
        let amount = points.points_for(chore.frequency);
        chore.completed = true;
        chore.last_completed_at = Some(now);
        chore.refresh_due(now);

        let mut outcome = LedgerOutcome {
            changed: true,
            award: None,
        };
        if chore.points_awarded {
            return outcome;
        }
        match find_user(users, &chore.assignee) {
            Some(user) => {
                user.points = user.points.saturating_add(amount);
                chore.points_awarded = true;
                chore.awarded = Some(Credit {
                    username: user.username.clone(),
                    points: amount,
                });
                outcome.award = Some(Award {
                    username: user.username.clone(),
                    delta: i64::from(amount),
                    balance: user.points,
                });
            }
            None => {
                tracing::debug!(chore = %chore.name, assignee = %chore.assignee, "no user to credit");
            }
        }
        return outcome;
    }

    if !chore.completed {
        return LedgerOutcome::default();
    }

    chore.completed = false;
    let mut outcome = LedgerOutcome {
        changed: true,
        award: None,
    };
    if chore.points_awarded {
        chore.points_awarded = false;
        // Records saved before the credit was tracked fall back to the chore's own fields.
        let credit = chore.awarded.take().unwrap_or_else(|| Credit {
            username: chore.assignee.clone(),
            points: points.points_for(chore.frequency),
        });
        match find_user(users, &credit.username) {
            Some(user) => {
                let before = user.points;
                user.points = user.points.saturating_sub(credit.points);
                outcome.award = Some(Award {
                    username: user.username.clone(),
                    delta: i64::from(user.points) - i64::from(before),
                    balance: user.points,
                });
            }
            None => {
                tracing::debug!(chore = %chore.name, username = %credit.username, "no user to debit");
            }
        }
    }
    outcome
}

fn find_user<'a>(users: &'a mut [User], username: &str) -> Option<&'a mut User> {
    users.iter_mut().find(|user| user.username == username)
}
