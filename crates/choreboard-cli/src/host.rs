//! Peripherals for running the control loop on an ordinary host, where
//! there is no joystick, lamp or character display attached.

use chrono::{DateTime, Utc};
use choreboard_core::input::InputSample;
use choreboard_core::runtime::{Connectivity, DisplaySink, InputSource, SignalOutput, TimeSource};
use choreboard_core::storage::InputConfig;
use choreboard_core::{Frame, Lamp};
use std::time::Instant;

/// Logs frames instead of drawing them.
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn show(&mut self, frame: &Frame) {
        tracing::debug!(line1 = %frame.line1, line2 = %frame.line2, "display");
    }
}

pub struct LogSignal;

impl SignalOutput for LogSignal {
    fn set(&mut self, lamp: Option<Lamp>) {
        match lamp {
            Some(lamp) => tracing::info!(?lamp, "status lamp"),
            None => tracing::info!("status lamps off"),
        }
    }
}

/// A stick that never moves.
pub struct IdleInput(pub InputSample);

impl IdleInput {
    pub fn centered(cfg: &InputConfig) -> Self {
        let center = cfg.dead_zone_low + (cfg.dead_zone_high - cfg.dead_zone_low) / 2;
        Self(InputSample::idle(center))
    }
}

impl InputSource for IdleInput {
    fn sample(&mut self) -> InputSample {
        self.0
    }
}

/// The host clock. The operating system keeps it in sync.
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn resync(&mut self) -> bool {
        true
    }
}

/// A host that can answer requests is online.
pub struct Online;

impl Connectivity for Online {
    fn is_up(&self) -> bool {
        true
    }
}
