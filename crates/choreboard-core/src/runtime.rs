//! Single-threaded control loop and the collaborator traits it drives.
//!
//! Each [`ControlLoop::step`] runs one iteration in a fixed order:
//!
//! ```text
//! requests -> input sample -> timers (sweep, resync) -> save -> events -> redraw
//! ```
//!
//! All state access happens inside `step`, so transports only need to hand
//! over queries and wait for replies.

use chrono::{DateTime, Utc};

use crate::api::{self, Request, Response};
use crate::board::Board;
use crate::commit::Commit;
use crate::display::{self, Frame};
use crate::input::{InputSample, JoystickEngine};
use crate::status::{self, Lamp};
use crate::storage::{Config, Store, TimersConfig};

/// Upper bound on requests serviced per iteration.
pub const MAX_REQUESTS_PER_STEP: usize = 32;

/// Two-line character display.
pub trait DisplaySink {
    fn show(&mut self, frame: &Frame);
}

/// Three-lamp status signal. `None` turns every lamp off.
pub trait SignalOutput {
    fn set(&mut self, lamp: Option<Lamp>);
}

pub trait InputSource {
    fn sample(&mut self) -> InputSample;
}

pub trait TimeSource {
    /// Wall clock.
    fn now(&self) -> DateTime<Utc>;
    /// Monotonic milliseconds, used for all input timing.
    fn monotonic_ms(&self) -> u64;
    /// Re-synchronize the wall clock. Must return within a bounded time;
    /// `false` means the attempt failed and the old clock is kept.
    fn resync(&mut self) -> bool;
}

pub trait Connectivity {
    fn is_up(&self) -> bool;
}

/// One pending request with the callback that delivers its reply.
pub struct Inbound {
    pub query: String,
    pub reply: Box<dyn FnOnce(Response) + Send>,
}

impl std::fmt::Debug for Inbound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inbound").field("query", &self.query).finish_non_exhaustive()
    }
}

pub trait RequestSource {
    /// Next pending request, without blocking.
    fn poll(&mut self) -> Option<Inbound>;
}

/// Everything the loop talks to during one iteration.
pub struct Peripherals<'a> {
    pub display: &'a mut dyn DisplaySink,
    pub signal: &'a mut dyn SignalOutput,
    pub input: &'a mut dyn InputSource,
    pub clock: &'a mut dyn TimeSource,
    pub network: &'a dyn Connectivity,
    pub requests: &'a mut dyn RequestSource,
}

/// Summary of one iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub requests: usize,
    pub commit: Commit,
    pub redrawn: bool,
}

pub struct ControlLoop<S: Store> {
    board: Board,
    store: S,
    engine: JoystickEngine,
    timers: TimersConfig,
    last_sweep_ms: Option<u64>,
    last_resync_ms: Option<u64>,
    last_frame: Option<Frame>,
    last_lamp: Option<Option<Lamp>>,
}

impl<S: Store> ControlLoop<S> {
    /// Load both collections from `store` and build the initial state.
    pub fn new(config: &Config, store: S) -> Self {
        let chores = store.load_chores();
        let users = store.load_users();
        tracing::info!(chores = chores.len(), users = users.len(), "board loaded");
        Self {
            board: Board::new(chores, users, config.points.clone()),
            store,
            engine: JoystickEngine::new(config.input.clone(), config.display.clone()),
            timers: config.timers.clone(),
            last_sweep_ms: None,
            last_resync_ms: None,
            last_frame: None,
            last_lamp: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &JoystickEngine {
        &self.engine
    }

    /// Run one iteration.
    pub fn step(&mut self, io: &mut Peripherals<'_>) -> StepReport {
        let mut report = StepReport::default();
        let connectivity_up = io.network.is_up();

        // Requests
        while report.requests < MAX_REQUESTS_PER_STEP {
            let Some(inbound) = io.requests.poll() else {
                break;
            };
            let request = Request::parse(&inbound.query);
            let (response, commit) = api::dispatch(&mut self.board, &request, connectivity_up, io.clock.now());
            self.persist(commit);
            report.commit |= commit;
            report.requests += 1;
            (inbound.reply)(response);
        }

        // Input
        let now_ms = io.clock.monotonic_ms();
        let sample = io.input.sample();
        let outcome = self.engine.tick(now_ms, sample, &mut self.board, io.clock.now());
        self.persist(outcome.commit);
        report.commit |= outcome.commit;

        // Timers
        if due(self.last_sweep_ms, now_ms, self.timers.sweep_interval_secs.saturating_mul(1000)) {
            self.last_sweep_ms = Some(now_ms);
            let commit = self.board.sweep(io.clock.now());
            self.persist(commit);
            report.commit |= commit;
        }
        if due(self.last_resync_ms, now_ms, self.timers.resync_interval_secs.saturating_mul(1000)) {
            self.last_resync_ms = Some(now_ms);
            if io.clock.resync() {
                tracing::debug!("clock resynchronized");
            } else {
                tracing::warn!("clock resync failed, keeping current time");
            }
        }

        for event in self.board.drain_events() {
            tracing::info!(?event, "board event");
        }

        report.redrawn = self.redraw(io, connectivity_up, outcome.redraw);
        report
    }

    fn persist(&mut self, commit: Commit) {
        if commit.is_empty() {
            return;
        }
        if let Err(e) = self.store.commit(&self.board, commit) {
            tracing::error!(error = %e, "save failed");
        }
    }

    fn redraw(&mut self, io: &mut Peripherals<'_>, connectivity_up: bool, force: bool) -> bool {
        let now = io.clock.now();

        let lamp = status::indicator(self.board.chores(), connectivity_up, now).lamp();
        if self.last_lamp != Some(lamp) {
            io.signal.set(lamp);
            self.last_lamp = Some(lamp);
        }

        let frame = display::compose(&self.engine, &self.board, connectivity_up, now);
        if !force && self.last_frame.as_ref() == Some(&frame) {
            return false;
        }
        io.display.show(&frame);
        self.last_frame = Some(frame);
        true
    }
}

fn due(last_ms: Option<u64>, now_ms: u64, interval_ms: u64) -> bool {
    match last_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= interval_ms,
    }
}
