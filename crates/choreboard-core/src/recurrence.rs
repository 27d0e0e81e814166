//! Recurrence rules.
//!
//! Pure functions deciding when a chore becomes due again, how many days are
//! left, and whether it is overdue. Everything runs in one UTC clock domain.
//!
//! ## Rules
//!
//! ```text
//! never completed  -> due now
//! Daily            -> 00:00 of the next calendar day
//! Weekly           -> Monday of the week containing (last + 7 days), same time
//! Monthly          -> 1st of the next month, same time
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::chore::{Chore, Frequency};

/// Next due timestamp for a chore last completed at `last_completed_at`.
///
/// `now` is only consulted for chores that were never completed.
pub fn next_due(
    last_completed_at: Option<DateTime<Utc>>,
    frequency: Frequency,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let Some(last) = last_completed_at else {
        return now;
    };

    match frequency {
        Frequency::Daily => last
            .date_naive()
            .succ_opt()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
            .unwrap_or(last + Duration::days(1)),
        Frequency::Weekly => {
            let shifted = last + Duration::days(7);
            let back = shifted.weekday().num_days_from_monday();
            shifted - Duration::days(i64::from(back))
        }
        Frequency::Monthly => {
            let (year, month) = next_month(last.year(), last.month());
            NaiveDate::from_ymd_opt(year, month, 1)
                .map(|first| first.and_time(last.time()).and_utc())
                .unwrap_or(last + Duration::days(31))
        }
    }
}

/// Whole days until the chore resets. Incomplete chores report 0.
pub fn days_until_due(chore: &Chore, now: DateTime<Utc>) -> i64 {
    if !chore.completed {
        return 0;
    }
    (chore.next_due_at - now).num_days().max(0)
}

/// Days until the frequency's next calendar boundary.
pub fn days_until_reset(chore: &Chore, now: DateTime<Utc>) -> i64 {
    match chore.frequency {
        Frequency::Daily => 1,
        Frequency::Weekly => 7 - i64::from(now.weekday().num_days_from_monday()),
        Frequency::Monthly => {
            let remaining = days_in_month(now.year(), now.month()) - now.day();
            i64::from(remaining) + 1
        }
    }
}

pub fn is_overdue(chore: &Chore, now: DateTime<Utc>) -> bool {
    !chore.completed && now > chore.next_due_at
}

/// Reset every completed chore whose due time has arrived.
///
/// Returns `true` if any chore changed. Incomplete chores are never touched.
pub fn sweep(chores: &mut [Chore], now: DateTime<Utc>) -> bool {
    let mut changed = false;
    for chore in chores.iter_mut() {
        if chore.completed && now >= chore.next_due_at {
            chore.completed = false;
            chore.points_awarded = false;
            chore.awarded = None;
            changed = true;
            tracing::debug!(chore = %chore.name, "completion expired");
        }
    }
    changed
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next) = next_month(year, month);
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next, 1),
    ) {
        (Some(first), Some(following)) => (following - first).num_days() as u32,
        _ => 30,
    }
}
