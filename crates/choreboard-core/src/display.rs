//! Two-line frame composition for the character display.

use chrono::{DateTime, Utc};

use crate::board::Board;
use crate::input::{Choice, JoystickEngine, Mode};
use crate::recurrence;
use crate::status::{self, Indicator};

/// Contents of the display. Both lines are exactly `width` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub line1: String,
    pub line2: String,
}

impl Frame {
    fn new(line1: &str, line2: &str, width: usize) -> Self {
        Self {
            line1: pad(line1, width),
            line2: pad(line2, width),
        }
    }
}

/// Compose the frame for the current interaction mode.
pub fn compose(engine: &JoystickEngine, board: &Board, connectivity_up: bool, now: DateTime<Utc>) -> Frame {
    let width = engine.display_config().width;
    match engine.mode() {
        Mode::Browsing { .. } => browsing(board, engine.scroll_offset(), width, now),
        Mode::ConfirmingCompletion { choice, .. } => {
            let answer = match choice {
                Choice::Confirm => "> Yes    No",
                Choice::Cancel => "  Yes  > No",
            };
            Frame::new("Complete chore?", answer, width)
        }
        Mode::ViewingStatusPanel { .. } => status_panel(board, connectivity_up, width, now),
    }
}

fn browsing(board: &Board, offset: usize, width: usize, now: DateTime<Utc>) -> Frame {
    let Some(chore) = board.selected() else {
        return Frame::new("No chores", "", width);
    };

    let name: String = chore.name.chars().skip(offset).take(width).collect();
    let state = if chore.completed {
        format!("Done {}d", recurrence::days_until_due(chore, now))
    } else if recurrence::is_overdue(chore, now) {
        "OVERDUE".to_string()
    } else {
        "Due now".to_string()
    };
    Frame::new(&name, &split(&chore.assignee, &state, width), width)
}

fn status_panel(board: &Board, connectivity_up: bool, width: usize, now: DateTime<Utc>) -> Frame {
    let net = if connectivity_up { "Net: online" } else { "Net: offline" };
    let label = match status::indicator(board.chores(), connectivity_up, now) {
        Indicator::Offline => "offline",
        Indicator::Overdue => "overdue",
        Indicator::AllClear => "all clear",
        Indicator::Pending => "pending",
    };
    let clock = now.format("%H:%M").to_string();
    Frame::new(net, &split(&clock, label, width), width)
}

/// Left text, then right text flush against the right edge. The left side
/// gives way when both don't fit.
fn split(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    if right_len >= width {
        return right.chars().take(width).collect();
    }
    let room = width - right_len - 1;
    let left: String = left.chars().take(room).collect();
    format!("{left:<room$} {right}")
}

fn pad(text: &str, width: usize) -> String {
    let text: String = text.chars().take(width).collect();
    format!("{text:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chore::Frequency;
    use crate::input::InputSample;
    use crate::storage::{DisplayConfig, InputConfig};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 9, 14, 5, 0).unwrap()
    }

    fn engine() -> JoystickEngine {
        JoystickEngine::new(InputConfig::default(), DisplayConfig::default())
    }

    #[test]
    fn empty_board_says_so() {
        let frame = compose(&engine(), &Board::default(), true, now());
        assert_eq!(frame.line1, "No chores       ");
        assert_eq!(frame.line2, " ".repeat(16));
    }

    #[test]
    fn browsing_shows_name_assignee_and_state() {
        let mut board = Board::default();
        board.add_chore("Dishes", "alice", Frequency::Weekly, now()).unwrap();
        let engine = engine();

        let frame = compose(&engine, &board, true, now());
        assert_eq!(frame.line1, "Dishes          ");
        assert_eq!(frame.line2, "alice    Due now");

        let later = now() + chrono::Duration::hours(1);
        assert_eq!(compose(&engine, &board, true, later).line2, "alice    OVERDUE");

        board.toggle_chore(0, now()).unwrap();
        // Completed Tuesday afternoon, resets Monday 2024-01-15 14:05.
        assert_eq!(compose(&engine, &board, true, now()).line2, "alice    Done 6d");
    }

    #[test]
    fn long_assignee_gives_way_to_state() {
        let mut board = Board::default();
        board
            .add_chore("Dishes", "bartholomew-the-third", Frequency::Daily, now())
            .unwrap();
        let frame = compose(&engine(), &board, true, now());
        assert_eq!(frame.line2, "bartholo Due now");
        assert_eq!(frame.line2.chars().count(), 16);
    }

    #[test]
    fn dialog_marks_current_choice() {
        let mut board = Board::default();
        board.add_chore("Dishes", "alice", Frequency::Daily, now()).unwrap();
        let mut engine = engine();
        engine.tick(0, InputSample { nav: 2048, confirm: 2048, button: true }, &mut board, now());
        engine.tick(100, InputSample::idle(2048), &mut board, now());

        let frame = compose(&engine, &board, true, now());
        assert_eq!(frame.line1, "Complete chore? ");
        assert_eq!(frame.line2, "> Yes    No     ");

        engine.tick(300, InputSample { nav: 2048, confirm: 100, button: false }, &mut board, now());
        assert_eq!(compose(&engine, &board, true, now()).line2, "  Yes  > No     ");
    }

    #[test]
    fn status_panel_shows_network_and_clock() {
        let mut board = Board::default();
        board.add_chore("Dishes", "alice", Frequency::Daily, now()).unwrap();
        let mut engine = engine();
        let held = InputSample { nav: 2048, confirm: 2048, button: true };
        engine.tick(0, held, &mut board, now());
        engine.tick(1000, held, &mut board, now());

        let frame = compose(&engine, &board, false, now());
        assert_eq!(frame.line1, "Net: offline    ");
        assert_eq!(frame.line2, "14:05    offline");

        let frame = compose(&engine, &board, true, now());
        assert_eq!(frame.line2, "14:05    pending");
    }
}
