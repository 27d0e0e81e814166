//! One-shot request, status and sweep commands.

use chrono::Utc;
use choreboard_core::{Event, Request, Store};

use super::{execute, open_board};

pub fn run(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    execute(&Request::parse(query), true)?;
    Ok(())
}

pub fn status(connectivity_up: bool) -> Result<(), Box<dyn std::error::Error>> {
    execute(&Request::from_pairs([("action", "status")]), connectivity_up)?;
    Ok(())
}

pub fn sweep() -> Result<(), Box<dyn std::error::Error>> {
    let (mut board, mut store) = open_board()?;
    let commit = board.sweep(Utc::now());
    store.commit(&board, commit)?;

    if commit.is_empty() {
        println!("nothing to reset");
    }
    for event in board.drain_events() {
        if let Event::CompletionsExpired { count, .. } = event {
            tracing::info!(count, "sweep saved");
            println!("{count} completion(s) reset");
        }
    }
    Ok(())
}
