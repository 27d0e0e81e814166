//! Chore management commands for CLI.

use clap::Subcommand;
use choreboard_core::Request;

use super::execute;

#[derive(Subcommand)]
pub enum ChoreAction {
    /// List chores with their due information
    List,
    /// Add a new chore
    Add {
        /// Chore name
        name: String,
        /// Username of the person responsible
        #[arg(long)]
        assignee: String,
        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        frequency: String,
    },
    /// Show a chore
    Get {
        index: usize,
    },
    /// Replace a chore's fields
    Update {
        index: usize,
        /// New name
        #[arg(long)]
        name: String,
        /// New assignee
        #[arg(long)]
        assignee: String,
        /// New frequency
        #[arg(long)]
        frequency: String,
    },
    /// Flip a chore between done and open
    Toggle {
        index: usize,
    },
    /// Delete a chore
    Delete {
        index: usize,
    },
}

pub fn run(action: ChoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let request = match action {
        ChoreAction::List => Request::from_pairs([("action", "list".to_string())]),
        ChoreAction::Add {
            name,
            assignee,
            frequency,
        } => Request::from_pairs([
            ("action", "add".to_string()),
            ("name", name),
            ("assignee", assignee),
            ("frequency", frequency),
        ]),
        ChoreAction::Get { index } => Request::from_pairs([
            ("action", "get".to_string()),
            ("index", index.to_string()),
        ]),
        ChoreAction::Update {
            index,
            name,
            assignee,
            frequency,
        } => Request::from_pairs([
            ("action", "update".to_string()),
            ("index", index.to_string()),
            ("name", name),
            ("assignee", assignee),
            ("frequency", frequency),
        ]),
        ChoreAction::Toggle { index } => Request::from_pairs([
            ("action", "toggle".to_string()),
            ("index", index.to_string()),
        ]),
        ChoreAction::Delete { index } => Request::from_pairs([
            ("action", "delete".to_string()),
            ("index", index.to_string()),
        ]),
    };
    execute(&request, true)?;
    Ok(())
}
