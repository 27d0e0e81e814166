//! Joystick interaction state machine.
//!
//! One navigation axis, one confirmation axis and a push button drive the
//! whole physical interface. The caller feeds one sample per loop iteration
//! through [`JoystickEngine::tick`]; there are no internal timers or threads.
//!
//! ## State Transitions
//!
//! ```text
//! Browsing --short press, chore open--> ConfirmingCompletion --short press--> Browsing
//! Browsing --long press--> ViewingStatusPanel --release + dwell--> Browsing
//! ```
//!
//! A short press on a completed chore reopens it without leaving Browsing.

use chrono::{DateTime, Utc};

use super::axis::{AxisGate, Deflection};
use super::scroll::NameScroll;
use crate::board::Board;
use crate::commit::Commit;
use crate::storage::{DisplayConfig, InputConfig};

/// One reading of the physical controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSample {
    /// Navigation axis, raw ADC units.
    pub nav: u16,
    /// Confirmation axis, raw ADC units.
    pub confirm: u16,
    pub button: bool,
}

impl InputSample {
    /// Both axes centered, button up.
    pub fn idle(center: u16) -> Self {
        Self {
            nav: center,
            confirm: center,
            button: false,
        }
    }
}

/// Pending answer in the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Confirm,
    Cancel,
}

impl Choice {
    fn toggled(self) -> Self {
        match self {
            Choice::Confirm => Choice::Cancel,
            Choice::Cancel => Choice::Confirm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browsing {
        press_started_ms: Option<u64>,
        scroll: NameScroll,
    },
    ConfirmingCompletion {
        /// Chore the dialog was opened for. Re-checked on commit because
        /// requests may edit the board while the dialog is up.
        index: usize,
        name: String,
        /// [`Board::revision`] when the dialog opened.
        revision: u64,
        choice: Choice,
        press_started_ms: Option<u64>,
    },
    ViewingStatusPanel {
        released_at_ms: Option<u64>,
    },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Browsing {
            press_started_ms: None,
            scroll: NameScroll::new(0),
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub commit: Commit,
    pub redraw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    None,
    Pressed,
    Released,
}

#[derive(Debug, Clone)]
pub struct JoystickEngine {
    mode: Mode,
    nav: AxisGate,
    confirm: AxisGate,
    button_down: bool,
    /// When the last short press was accepted, for rate limiting.
    last_press_ms: Option<u64>,
    input: InputConfig,
    display: DisplayConfig,
}

impl JoystickEngine {
    pub fn new(input: InputConfig, display: DisplayConfig) -> Self {
        Self {
            mode: Mode::default(),
            nav: AxisGate::new(),
            confirm: AxisGate::new(),
            button_down: false,
            last_press_ms: None,
            input,
            display,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn display_config(&self) -> &DisplayConfig {
        &self.display
    }

    /// Current horizontal offset of the selected name.
    pub fn scroll_offset(&self) -> usize {
        match &self.mode {
            Mode::Browsing { scroll, .. } => scroll.offset(),
            _ => 0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Feed one sample. `now_ms` is a monotonic clock used for all input
    /// timing; `now` is the wall clock handed to the ledger.
    pub fn tick(
        &mut self,
        now_ms: u64,
        sample: InputSample,
        board: &mut Board,
        now: DateTime<Utc>,
    ) -> InputOutcome {
        let edge = self.button_edge(sample.button);
        let mut outcome = InputOutcome::default();

        let mode = std::mem::take(&mut self.mode);
        self.mode = match mode {
            Mode::Browsing {
                press_started_ms,
                scroll,
            } => self.browse(press_started_ms, scroll, edge, sample, now_ms, board, now, &mut outcome),
            Mode::ConfirmingCompletion {
                index,
                name,
                revision,
                choice,
                press_started_ms,
            } => self.confirming(
                index,
                name,
                revision,
                choice,
                press_started_ms,
                edge,
                sample,
                now_ms,
                board,
                now,
                &mut outcome,
            ),
            Mode::ViewingStatusPanel { released_at_ms } => {
                self.status_panel(released_at_ms, edge, sample, now_ms, &mut outcome)
            }
        };
        outcome
    }

    // ── Internal ─────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn browse(
        &mut self,
        mut press_started_ms: Option<u64>,
        mut scroll: NameScroll,
        edge: Edge,
        sample: InputSample,
        now_ms: u64,
        board: &mut Board,
        now: DateTime<Utc>,
        outcome: &mut InputOutcome,
    ) -> Mode {
        self.confirm.suppress(sample.confirm, &self.input);

        match edge {
            Edge::Pressed => press_started_ms = Some(now_ms),
            Edge::Released => {
                if let Some(started) = press_started_ms.take() {
                    let held = now_ms.saturating_sub(started);
                    if held < self.input.long_press_ms && self.accept_press(now_ms) {
                        if let Some(next) = self.short_press(&mut scroll, now_ms, board, now, outcome) {
                            return next;
                        }
                    }
                }
            }
            Edge::None => {}
        }

        if let Some(started) = press_started_ms {
            if sample.button && now_ms.saturating_sub(started) >= self.input.long_press_ms {
                tracing::debug!("status panel opened");
                outcome.redraw = true;
                return Mode::ViewingStatusPanel {
                    released_at_ms: None,
                };
            }
        }

        if let Some(deflection) = self.nav.update(sample.nav, now_ms, &self.input) {
            match deflection {
                Deflection::Low => board.select_next(),
                Deflection::High => board.select_previous(),
            }
            scroll.reset(now_ms);
            outcome.redraw = true;
        }

        if let Some(chore) = board.selected() {
            if scroll.tick(chore.name.chars().count(), now_ms, &self.display) {
                outcome.redraw = true;
            }
        }

        Mode::Browsing {
            press_started_ms,
            scroll,
        }
    }

    /// Short press while browsing. Returns the next mode when leaving
    /// Browsing.
    fn short_press(
        &mut self,
        scroll: &mut NameScroll,
        now_ms: u64,
        board: &mut Board,
        now: DateTime<Utc>,
        outcome: &mut InputOutcome,
    ) -> Option<Mode> {
        let index = board.cursor();
        let chore = board.selected()?;

        if !chore.completed {
            tracing::debug!(chore = %chore.name, "confirmation opened");
            outcome.redraw = true;
            return Some(Mode::ConfirmingCompletion {
                index,
                name: chore.name.clone(),
                revision: board.revision(),
                choice: Choice::Confirm,
                press_started_ms: None,
            });
        }

        match board.set_completion(index, false, now) {
            Ok(commit) => outcome.commit |= commit,
            Err(e) => tracing::warn!(error = %e, "reopen from joystick failed"),
        }
        scroll.reset(now_ms);
        outcome.redraw = true;
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn confirming(
        &mut self,
        index: usize,
        name: String,
        revision: u64,
        mut choice: Choice,
        mut press_started_ms: Option<u64>,
        edge: Edge,
        sample: InputSample,
        now_ms: u64,
        board: &mut Board,
        now: DateTime<Utc>,
        outcome: &mut InputOutcome,
    ) -> Mode {
        self.nav.suppress(sample.nav, &self.input);

        match edge {
            Edge::Pressed => press_started_ms = Some(now_ms),
            Edge::Released => {
                if let Some(started) = press_started_ms.take() {
                    let held = now_ms.saturating_sub(started);
                    if held < self.input.long_press_ms && self.accept_press(now_ms) {
                        if choice == Choice::Confirm {
                            self.commit_completion(index, &name, revision, board, now, outcome);
                        } else {
                            tracing::debug!(chore = %name, "confirmation cancelled");
                        }
                        outcome.redraw = true;
                        return Mode::Browsing {
                            press_started_ms: None,
                            scroll: NameScroll::new(now_ms),
                        };
                    }
                }
            }
            Edge::None => {}
        }

        if self.confirm.update(sample.confirm, now_ms, &self.input).is_some() {
            choice = choice.toggled();
            outcome.redraw = true;
        }

        Mode::ConfirmingCompletion {
            index,
            name,
            revision,
            choice,
            press_started_ms,
        }
    }

    fn commit_completion(
        &mut self,
        index: usize,
        name: &str,
        revision: u64,
        board: &mut Board,
        now: DateTime<Utc>,
        outcome: &mut InputOutcome,
    ) {
        if board.revision() != revision || board.chore(index).is_err() {
            tracing::warn!(chore = %name, index, "chore changed while confirming, nothing done");
            return;
        }
        match board.set_completion(index, true, now) {
            Ok(commit) => outcome.commit |= commit,
            Err(e) => tracing::warn!(error = %e, "completion from joystick failed"),
        }
    }

    fn status_panel(
        &mut self,
        mut released_at_ms: Option<u64>,
        edge: Edge,
        sample: InputSample,
        now_ms: u64,
        outcome: &mut InputOutcome,
    ) -> Mode {
        self.nav.suppress(sample.nav, &self.input);
        self.confirm.suppress(sample.confirm, &self.input);

        match edge {
            Edge::Released => released_at_ms = Some(now_ms),
            Edge::Pressed => released_at_ms = None,
            Edge::None => {}
        }

        if let Some(released) = released_at_ms {
            if now_ms.saturating_sub(released) >= self.input.status_dwell_ms {
                tracing::debug!("status panel closed");
                outcome.redraw = true;
                return Mode::Browsing {
                    press_started_ms: None,
                    scroll: NameScroll::new(now_ms),
                };
            }
        }

        Mode::ViewingStatusPanel { released_at_ms }
    }

    fn button_edge(&mut self, pressed: bool) -> Edge {
        let edge = match (self.button_down, pressed) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            _ => Edge::None,
        };
        self.button_down = pressed;
        edge
    }

    /// Rate-limit short presses to one per debounce interval.
    fn accept_press(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_press_ms {
            if now_ms.saturating_sub(last) < self.input.debounce_ms {
                return false;
            }
        }
        self.last_press_ms = Some(now_ms);
        true
    }
}
