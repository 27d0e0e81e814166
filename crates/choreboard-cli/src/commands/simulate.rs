//! Replay a scripted joystick session and print every frame.
//!
//! Script format, one sample per line, `#` starts a comment:
//!
//! ```text
//! # ms   nav   confirm button
//! 0      2048  2048    0
//! 100    100   2048    0
//! ```

use chrono::{DateTime, Duration, Utc};
use choreboard_core::input::InputSample;
use choreboard_core::runtime::{DisplaySink, InputSource, Inbound, Peripherals, RequestSource, TimeSource};
use choreboard_core::{Config, ControlLoop, Frame, JsonStore, MemoryStore, Store};
use std::path::Path;

use crate::host::{LogSignal, Online};

/// One scripted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub at_ms: u64,
    pub sample: InputSample,
}

pub fn parse_script(text: &str) -> Result<Vec<Step>, String> {
    let mut steps = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[at_ms, nav, confirm, button] = fields.as_slice() else {
            return Err(format!("line {}: expected 4 fields, got {}", n + 1, fields.len()));
        };
        let bad = |what: &str, value: &str| format!("line {}: invalid {what} '{value}'", n + 1);
        let step = Step {
            at_ms: at_ms.parse().map_err(|_| bad("time", at_ms))?,
            sample: InputSample {
                nav: nav.parse().map_err(|_| bad("nav axis", nav))?,
                confirm: confirm.parse().map_err(|_| bad("confirm axis", confirm))?,
                button: match button {
                    "1" | "down" => true,
                    "0" | "up" => false,
                    other => return Err(bad("button", other)),
                },
            },
        };
        if steps.last().is_some_and(|prev: &Step| prev.at_ms > step.at_ms) {
            return Err(format!("line {}: time goes backwards", n + 1));
        }
        steps.push(step);
    }
    Ok(steps)
}

struct Terminal {
    at_ms: u64,
}

impl DisplaySink for Terminal {
    fn show(&mut self, frame: &Frame) {
        println!("{:>7} |{}|", self.at_ms, frame.line1);
        println!("{:>7} |{}|", "", frame.line2);
    }
}

struct Scripted(InputSample);

impl InputSource for Scripted {
    fn sample(&mut self) -> InputSample {
        self.0
    }
}

/// Simulated time: wall clock advances with the script.
struct ScriptClock {
    start: DateTime<Utc>,
    ms: u64,
}

impl TimeSource for ScriptClock {
    fn now(&self) -> DateTime<Utc> {
        self.start + Duration::milliseconds(i64::try_from(self.ms).unwrap_or(i64::MAX))
    }

    fn monotonic_ms(&self) -> u64 {
        self.ms
    }

    fn resync(&mut self) -> bool {
        true
    }
}

struct NoRequests;

impl RequestSource for NoRequests {
    fn poll(&mut self) -> Option<Inbound> {
        None
    }
}

pub fn run(script: &Path, commit: bool) -> Result<(), Box<dyn std::error::Error>> {
    let steps = parse_script(&std::fs::read_to_string(script)?)?;
    let config = Config::load()?;
    let store = JsonStore::open()?;

    if commit {
        replay(&mut ControlLoop::new(&config, store), &steps);
    } else {
        let scratch = MemoryStore::new(store.load_chores(), store.load_users());
        replay(&mut ControlLoop::new(&config, scratch), &steps);
    }
    Ok(())
}

fn replay<S: Store>(control: &mut ControlLoop<S>, steps: &[Step]) {
    let mut clock = ScriptClock {
        start: Utc::now(),
        ms: 0,
    };
    let mut display = Terminal { at_ms: 0 };
    let mut signal = LogSignal;
    let network = Online;
    let mut requests = NoRequests;

    for step in steps {
        clock.ms = step.at_ms;
        display.at_ms = step.at_ms;
        let mut input = Scripted(step.sample);
        let mut io = Peripherals {
            display: &mut display,
            signal: &mut signal,
            input: &mut input,
            clock: &mut clock,
            network: &network,
            requests: &mut requests,
        };
        let report = control.step(&mut io);
        if !report.commit.is_empty() {
            tracing::info!(at_ms = step.at_ms, "board changed");
        }
    }
}
