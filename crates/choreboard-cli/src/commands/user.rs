use clap::Subcommand;
use choreboard_core::Request;

use super::execute;

#[derive(Subcommand)]
pub enum UserAction {
    /// List users and their points
    List,
    /// Add a user with zero points
    Add {
        username: String,
    },
    /// Show a user
    Get {
        index: usize,
    },
    /// Rename a user. Chores keep the old name.
    Rename {
        index: usize,
        username: String,
    },
    /// Delete a user
    Delete {
        index: usize,
    },
    /// Zero every user's points
    ResetPoints,
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let request = match action {
        UserAction::List => Request::from_pairs([("action", "users".to_string())]),
        UserAction::Add { username } => {
            Request::from_pairs([("action", "add_user".to_string()), ("username", username)])
        }
        UserAction::Get { index } => Request::from_pairs([
            ("action", "get_user".to_string()),
            ("index", index.to_string()),
        ]),
        UserAction::Rename { index, username } => Request::from_pairs([
            ("action", "update_user".to_string()),
            ("index", index.to_string()),
            ("username", username),
        ]),
        UserAction::Delete { index } => Request::from_pairs([
            ("action", "delete_user".to_string()),
            ("index", index.to_string()),
        ]),
        UserAction::ResetPoints => Request::from_pairs([("action", "reset_points".to_string())]),
    };
    execute(&request, true)?;
    Ok(())
}
