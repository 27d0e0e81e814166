//! Status signal aggregation.
//!
//! Collapses the chore collection and the network state into one indicator.
//! Priority, first match wins:
//!
//! ```text
//! offline -> overdue -> all-clear -> pending
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chore::Chore;
use crate::recurrence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    Offline,
    Overdue,
    AllClear,
    Pending,
}

/// One lamp of the three-way signal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lamp {
    Red,
    Yellow,
    Green,
}

impl Indicator {
    /// Lamp to light. Offline leaves every lamp dark.
    pub fn lamp(self) -> Option<Lamp> {
        match self {
            Indicator::Offline => None,
            Indicator::Overdue => Some(Lamp::Red),
            Indicator::Pending => Some(Lamp::Yellow),
            Indicator::AllClear => Some(Lamp::Green),
        }
    }
}

pub fn indicator(chores: &[Chore], connectivity_up: bool, now: DateTime<Utc>) -> Indicator {
    if !connectivity_up {
        return Indicator::Offline;
    }
    if chores.iter().any(|c| recurrence::is_overdue(c, now)) {
        return Indicator::Overdue;
    }
    if chores.iter().all(|c| c.completed) {
        return Indicator::AllClear;
    }
    Indicator::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chore::Frequency;
    use chrono::{Duration, TimeZone};

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 9, 14, 0, 0).unwrap()
    }

    #[test]
    fn empty_board_is_all_clear_when_online() {
        assert_eq!(indicator(&[], true, created()), Indicator::AllClear);
        assert_eq!(indicator(&[], false, created()), Indicator::Offline);
    }

    #[test]
    fn offline_wins_over_everything() {
        let chores = vec![Chore::new("Dust", "alice", Frequency::Daily, created())];
        let later = created() + Duration::hours(2);
        assert_eq!(indicator(&chores, true, later), Indicator::Overdue);
        assert_eq!(indicator(&chores, false, later), Indicator::Offline);
    }

    #[test]
    fn pending_until_past_due() {
        let mut chores = vec![
            Chore::new("Dust", "alice", Frequency::Daily, created()),
            Chore::new("Sweep", "bob", Frequency::Weekly, created()),
        ];
        chores[1].completed = true;
        assert_eq!(indicator(&chores, true, created()), Indicator::Pending);
        chores[0].completed = true;
        assert_eq!(indicator(&chores, true, created()), Indicator::AllClear);
    }

    #[test]
    fn lamps_are_exclusive() {
        assert_eq!(Indicator::Overdue.lamp(), Some(Lamp::Red));
        assert_eq!(Indicator::Pending.lamp(), Some(Lamp::Yellow));
        assert_eq!(Indicator::AllClear.lamp(), Some(Lamp::Green));
        assert_eq!(Indicator::Offline.lamp(), None);
    }
}
