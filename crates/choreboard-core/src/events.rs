use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the board produces an Event.
/// The control loop drains and logs them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ChoreAdded {
        index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    ChoreUpdated {
        index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    ChoreDeleted {
        index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    ChoreCompleted {
        index: usize,
        name: String,
        next_due_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    ChoreReopened {
        index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    PointsAwarded {
        username: String,
        points: i64,
        balance: u32,
        at: DateTime<Utc>,
    },
    PointsRevoked {
        username: String,
        points: i64,
        balance: u32,
        at: DateTime<Utc>,
    },
    /// The periodic sweep reset expired completions.
    CompletionsExpired {
        count: usize,
        at: DateTime<Utc>,
    },
    UserAdded {
        username: String,
        at: DateTime<Utc>,
    },
    UserRenamed {
        from: String,
        to: String,
        at: DateTime<Utc>,
    },
    UserDeleted {
        username: String,
        at: DateTime<Utc>,
    },
    PointsReset {
        at: DateTime<Utc>,
    },
}
