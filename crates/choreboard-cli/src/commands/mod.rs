pub mod chore;
pub mod config;
pub mod request;
pub mod serve;
pub mod simulate;
pub mod user;

use chrono::Utc;
use choreboard_core::{dispatch, storage, Board, Config, JsonStore, Request, Response, Store};

/// Load the saved board with the configured points table.
pub(crate) fn open_board() -> Result<(Board, JsonStore), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Ok(storage::open_board(&config)?)
}

/// Run one request against the saved board, persist the result and print
/// the reply. Error replies become command errors.
pub(crate) fn execute(request: &Request, connectivity_up: bool) -> Result<Response, Box<dyn std::error::Error>> {
    let (mut board, mut store) = open_board()?;
    let (response, commit) = dispatch(&mut board, request, connectivity_up, Utc::now());
    store.commit(&board, commit)?;
    if !response.is_ok() {
        let message = response.body["error"].as_str().unwrap_or("request failed");
        return Err(message.into());
    }
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(response)
}
