//! # Choreboard Core Library
//!
//! Core logic for a household chore board: recurring chores, a points ledger
//! per household member, a joystick-driven two-line display and a three-lamp
//! status signal. The CLI binary and the HTTP transport are thin layers over
//! this crate.
//!
//! ## Architecture
//!
//! - **Recurrence**: pure due-date arithmetic and the completion sweep
//! - **Ledger**: completion toggling with idempotent point awards
//! - **Input**: a tick-driven joystick state machine; the caller feeds samples
//! - **Runtime**: a single-threaded control loop over trait-object peripherals
//! - **Storage**: JSON collections and TOML configuration
//!
//! ## Key Components
//!
//! - [`Board`]: owned application state
//! - [`JoystickEngine`]: physical interaction state machine
//! - [`ControlLoop`]: one-iteration-at-a-time scheduler
//! - [`Config`]: application configuration

pub mod api;
pub mod board;
pub mod chore;
pub mod commit;
pub mod display;
pub mod error;
pub mod events;
pub mod input;
pub mod ledger;
pub mod recurrence;
pub mod runtime;
pub mod status;
pub mod storage;

pub use api::{dispatch, ApiError, Request, Response};
pub use board::Board;
pub use chore::{Chore, Credit, Frequency, User};
pub use commit::Commit;
pub use display::Frame;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use input::{InputSample, JoystickEngine};
pub use ledger::PointsTable;
pub use runtime::{ControlLoop, Peripherals};
pub use status::{Indicator, Lamp};
pub use storage::{Config, JsonStore, MemoryStore, Store};
