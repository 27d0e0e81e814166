//! Request/response surface.
//!
//! Every request is a flat set of query parameters with an `action` selecting
//! the operation. [`dispatch`] runs it against the board and returns the JSON
//! reply plus the [`Commit`] the caller must persist. Errors never touch the
//! board.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::board::Board;
use crate::chore::{Chore, Frequency};
use crate::commit::Commit;
use crate::error::ValidationError;
use crate::recurrence;
use crate::status;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing parameter '{0}'")]
    MissingParam(&'static str),

    #[error("invalid parameter '{name}': {message}")]
    InvalidParam { name: &'static str, message: String },

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(ValidationError::OutOfBounds { .. }) => 404,
            _ => 400,
        }
    }
}

/// Parsed query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    params: Vec<(String, String)>,
}

impl Request {
    /// Parse a raw query string such as `action=add&name=Dishes`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            params: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            params: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// First value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, name: &'static str) -> Result<&str, ApiError> {
        self.get(name).ok_or(ApiError::MissingParam(name))
    }

    fn index(&self) -> Result<usize, ApiError> {
        let raw = self.require("index")?;
        raw.trim().parse().map_err(|_| ApiError::InvalidParam {
            name: "index",
            message: format!("'{raw}' is not a non-negative integer"),
        })
    }

    fn frequency(&self) -> Result<Frequency, ApiError> {
        Ok(self.require("frequency")?.parse()?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            body: json!({ "error": err.to_string() }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A chore as reported by `list`, with derived timing fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChoreView<'a> {
    index: usize,
    #[serde(flatten)]
    chore: &'a Chore,
    days_until_due: i64,
    days_until_reset: i64,
    overdue: bool,
}

impl<'a> ChoreView<'a> {
    fn new(index: usize, chore: &'a Chore, now: DateTime<Utc>) -> Self {
        Self {
            index,
            chore,
            days_until_due: recurrence::days_until_due(chore, now),
            days_until_reset: recurrence::days_until_reset(chore, now),
            overdue: recurrence::is_overdue(chore, now),
        }
    }
}

/// Run one request against the board.
pub fn dispatch(board: &mut Board, request: &Request, connectivity_up: bool, now: DateTime<Utc>) -> (Response, Commit) {
    match handle(board, request, connectivity_up, now) {
        Ok((body, commit)) => (Response::ok(body), commit),
        Err(e) => {
            tracing::warn!(action = request.get("action").unwrap_or(""), error = %e, "request rejected");
            (Response::error(&e), Commit::NONE)
        }
    }
}

fn handle(
    board: &mut Board,
    request: &Request,
    connectivity_up: bool,
    now: DateTime<Utc>,
) -> Result<(Value, Commit), ApiError> {
    let action = request.require("action")?;
    tracing::debug!(action, "request");

    match action {
        "list" => {
            let chores: Vec<_> = board
                .chores()
                .iter()
                .enumerate()
                .map(|(i, c)| ChoreView::new(i, c, now))
                .collect();
            Ok((json!(chores), Commit::NONE))
        }
        "toggle" => {
            let index = request.index()?;
            let commit = board.toggle_chore(index, now)?;
            let chore = board.chore(index)?;
            Ok((json!(ChoreView::new(index, chore, now)), commit))
        }
        "add" => {
            let name = request.require("name")?;
            let assignee = request.require("assignee")?;
            let frequency = request.frequency()?;
            let commit = board.add_chore(name, assignee, frequency, now)?;
            Ok((json!({ "index": board.chores().len() - 1 }), commit))
        }
        "delete" => {
            let index = request.index()?;
            let name = board.chore(index)?.name.clone();
            let commit = board.delete_chore(index, now)?;
            Ok((json!({ "deleted": name }), commit))
        }
        "get" => {
            let chore = board.chore(request.index()?)?;
            Ok((
                json!({
                    "name": chore.name,
                    "assignee": chore.assignee,
                    "frequency": chore.frequency,
                }),
                Commit::NONE,
            ))
        }
        "update" => {
            let index = request.index()?;
            let name = request.require("name")?;
            let assignee = request.require("assignee")?;
            let frequency = request.frequency()?;
            let commit = board.update_chore(index, name, assignee, frequency, now)?;
            let chore = board.chore(index)?;
            Ok((json!(ChoreView::new(index, chore, now)), commit))
        }
        "users" => Ok((json!(board.users()), Commit::NONE)),
        "add_user" => {
            let commit = board.add_user(request.require("username")?, now)?;
            Ok((json!({ "index": board.users().len() - 1 }), commit))
        }
        "delete_user" => {
            let index = request.index()?;
            let username = board.user(index)?.username.clone();
            let commit = board.delete_user(index, now)?;
            Ok((json!({ "deleted": username }), commit))
        }
        "get_user" => Ok((json!(board.user(request.index()?)?), Commit::NONE)),
        "update_user" => {
            let index = request.index()?;
            let commit = board.rename_user(index, request.require("username")?, now)?;
            Ok((json!(board.user(index)?), commit))
        }
        "reset_points" => {
            let commit = board.reset_points(now);
            Ok((json!(board.users()), commit))
        }
        "status" => {
            let indicator = status::indicator(board.chores(), connectivity_up, now);
            let chores = board.chores();
            Ok((
                json!({
                    "indicator": indicator,
                    "lamp": indicator.lamp(),
                    "connectivity": connectivity_up,
                    "chores": chores.len(),
                    "completed": chores.iter().filter(|c| c.completed).count(),
                    "overdue": chores.iter().filter(|c| recurrence::is_overdue(c, now)).count(),
                }),
                Commit::NONE,
            ))
        }
        other => Err(ApiError::UnknownAction(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap()
    }

    fn run(board: &mut Board, query: &str) -> (Response, Commit) {
        dispatch(board, &Request::parse(query), true, now())
    }

    fn seeded() -> Board {
        let mut board = Board::default();
        run(&mut board, "action=add_user&username=alice");
        run(&mut board, "action=add&name=Take+out+trash&assignee=alice&frequency=weekly");
        board
    }

    #[test]
    fn parse_decodes_percent_and_plus() {
        let req = Request::parse("?action=add&name=Clean%20oven+now&assignee=bob");
        assert_eq!(req.get("action"), Some("add"));
        assert_eq!(req.get("name"), Some("Clean oven now"));
        assert_eq!(req.get("frequency"), None);
    }

    #[test]
    fn add_and_list() {
        let board = &mut seeded();
        let (resp, commit) = run(board, "action=list");
        assert!(resp.is_ok());
        assert_eq!(commit, Commit::NONE);

        let row = &resp.body[0];
        assert_eq!(row["index"], 0);
        assert_eq!(row["name"], "Take out trash");
        assert_eq!(row["frequency"], "Weekly");
        assert_eq!(row["completed"], false);
        assert_eq!(row["lastCompletedAt"], Value::Null);
        assert_eq!(row["daysUntilDue"], 0);
        // Wednesday: five days until Monday.
        assert_eq!(row["daysUntilReset"], 5);
        assert_eq!(row["overdue"], false);
    }

    #[test]
    fn toggle_awards_points_and_commits_both() {
        let board = &mut seeded();
        let (resp, commit) = run(board, "action=toggle&index=0");
        assert!(resp.is_ok());
        assert_eq!(commit, Commit::ALL);
        assert_eq!(resp.body["completed"], true);
        assert_eq!(resp.body["nextDueAt"], "2024-01-15T09:30:00Z");

        let (resp, _) = run(board, "action=users");
        assert_eq!(resp.body, json!([{ "username": "alice", "points": 5 }]));
    }

    #[test]
    fn frequency_is_case_insensitive() {
        let board = &mut seeded();
        let (resp, _) = run(board, "action=add&name=Oven&assignee=bob&frequency=MONTHLY");
        assert!(resp.is_ok());
        let (resp, _) = run(board, "action=get&index=1");
        assert_eq!(resp.body["frequency"], "Monthly");
    }

    #[test]
    fn bad_requests_leave_board_alone() {
        let board = &mut seeded();
        let before = board.chores().to_vec();

        for (query, status) in [
            ("action=toggle&index=7", 404),
            ("action=toggle", 400),
            ("action=toggle&index=-1", 400),
            ("action=add&name=X&assignee=a&frequency=hourly", 400),
            ("action=add&assignee=a&frequency=daily", 400),
            ("action=explode", 400),
            ("index=0", 400),
            ("action=delete_user&index=3", 404),
        ] {
            let (resp, commit) = run(board, query);
            assert_eq!(resp.status, status, "{query}");
            assert!(resp.body["error"].is_string(), "{query}");
            assert_eq!(commit, Commit::NONE);
        }
        assert_eq!(board.chores(), before.as_slice());
    }

    #[test]
    fn user_round_trip() {
        let board = &mut seeded();
        let (resp, commit) = run(board, "action=update_user&index=0&username=alicia");
        assert_eq!(commit, Commit::USERS);
        assert_eq!(resp.body["username"], "alicia");

        let (resp, _) = run(board, "action=get_user&index=0");
        assert_eq!(resp.body["points"], 0);

        let (resp, _) = run(board, "action=delete_user&index=0");
        assert_eq!(resp.body["deleted"], "alicia");
        assert!(board.users().is_empty());
        assert_eq!(board.chores()[0].assignee, "alice");
    }

    #[test]
    fn reset_points_zeroes_balances() {
        let board = &mut seeded();
        run(board, "action=toggle&index=0");
        let (resp, commit) = run(board, "action=reset_points");
        assert_eq!(commit, Commit::USERS);
        assert_eq!(resp.body[0]["points"], 0);
    }

    #[test]
    fn status_reports_indicator() {
        let board = &mut seeded();
        let (resp, _) = run(board, "action=status");
        assert_eq!(resp.body["indicator"], "pending");
        assert_eq!(resp.body["lamp"], "yellow");

        let (resp, _) = dispatch(board, &Request::parse("action=status"), false, now());
        assert_eq!(resp.body["indicator"], "offline");
        assert_eq!(resp.body["lamp"], Value::Null);
    }
}
