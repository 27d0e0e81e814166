//! Integration tests for the control loop: requests, joystick input and
//! timers interleaved against a real JSON store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use choreboard_core::api::Response;
use choreboard_core::input::{InputSample, Mode};
use choreboard_core::runtime::{
    Connectivity, DisplaySink, Inbound, InputSource, Peripherals, RequestSource, SignalOutput, TimeSource,
};
use choreboard_core::{Config, ControlLoop, Frame, JsonStore, Lamp, Store};
use std::collections::VecDeque;
use std::sync::mpsc;

const CENTER: u16 = 2048;

struct Host {
    frames: Vec<Frame>,
    lamp: Option<Lamp>,
    sample: InputSample,
    start: DateTime<Utc>,
    ms: u64,
    online: bool,
    queue: VecDeque<Inbound>,
}

struct Screen<'a>(&'a mut Vec<Frame>);
impl DisplaySink for Screen<'_> {
    fn show(&mut self, frame: &Frame) {
        self.0.push(frame.clone());
    }
}

struct Lamps<'a>(&'a mut Option<Lamp>);
impl SignalOutput for Lamps<'_> {
    fn set(&mut self, lamp: Option<Lamp>) {
        *self.0 = lamp;
    }
}

struct Stick(InputSample);
impl InputSource for Stick {
    fn sample(&mut self) -> InputSample {
        self.0
    }
}

struct Clock {
    start: DateTime<Utc>,
    ms: u64,
}
impl TimeSource for Clock {
    fn now(&self) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.ms as i64)
    }
    fn monotonic_ms(&self) -> u64 {
        self.ms
    }
    fn resync(&mut self) -> bool {
        false
    }
}

struct Net(bool);
impl Connectivity for Net {
    fn is_up(&self) -> bool {
        self.0
    }
}

struct Queue<'a>(&'a mut VecDeque<Inbound>);
impl RequestSource for Queue<'_> {
    fn poll(&mut self) -> Option<Inbound> {
        self.0.pop_front()
    }
}

impl Host {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            lamp: None,
            sample: InputSample::idle(CENTER),
            start: Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            ms: 0,
            online: true,
            queue: VecDeque::new(),
        }
    }

    fn request(&mut self, query: &str) -> mpsc::Receiver<Response> {
        let (tx, rx) = mpsc::channel();
        self.queue.push_back(Inbound {
            query: query.to_string(),
            reply: Box::new(move |response: Response| {
                let _ = tx.send(response);
            }),
        });
        rx
    }

    fn step<S: Store>(&mut self, control: &mut ControlLoop<S>, ms: u64, sample: InputSample) {
        self.ms = ms;
        self.sample = sample;
        let mut display = Screen(&mut self.frames);
        let mut signal = Lamps(&mut self.lamp);
        let mut input = Stick(self.sample);
        let mut clock = Clock {
            start: self.start,
            ms: self.ms,
        };
        let network = Net(self.online);
        let mut requests = Queue(&mut self.queue);
        control.step(&mut Peripherals {
            display: &mut display,
            signal: &mut signal,
            input: &mut input,
            clock: &mut clock,
            network: &network,
            requests: &mut requests,
        });
    }
}

fn idle() -> InputSample {
    InputSample::idle(CENTER)
}

fn pressed() -> InputSample {
    InputSample {
        nav: CENTER,
        confirm: CENTER,
        button: true,
    }
}

fn nav(value: u16) -> InputSample {
    InputSample {
        nav: value,
        confirm: CENTER,
        button: false,
    }
}

#[test]
fn test_requests_then_joystick_completion() {
    let dir = tempfile::tempdir().unwrap();
    let mut control = ControlLoop::new(&Config::default(), JsonStore::with_dir(dir.path()));
    let mut host = Host::new();

    let replies = [
        host.request("action=add_user&username=ana"),
        host.request("action=add&name=Dishes&assignee=ana&frequency=daily"),
        host.request("action=add&name=Laundry&assignee=ana&frequency=weekly"),
    ];
    host.step(&mut control, 0, idle());
    for rx in &replies {
        assert!(rx.recv().unwrap().is_ok());
    }
    assert_eq!(host.lamp, Some(Lamp::Yellow));
    assert_eq!(host.frames.last().unwrap().line1.trim_end(), "Dishes");

    // Move to Laundry, then press twice to confirm.
    host.step(&mut control, 100, nav(100));
    host.step(&mut control, 200, idle());
    assert_eq!(host.frames.last().unwrap().line1.trim_end(), "Laundry");

    host.step(&mut control, 300, pressed());
    host.step(&mut control, 400, idle());
    assert!(matches!(control.engine().mode(), Mode::ConfirmingCompletion { index: 1, .. }));
    host.step(&mut control, 500, pressed());
    host.step(&mut control, 600, idle());

    let store = JsonStore::with_dir(dir.path());
    let chores = store.load_chores();
    assert!(chores[1].completed);
    assert!(!chores[0].completed);
    assert_eq!(store.load_users()[0].points, 5);
}

#[test]
fn test_request_during_dialog_does_not_redirect_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut control = ControlLoop::new(&Config::default(), JsonStore::with_dir(dir.path()));
    let mut host = Host::new();

    host.request("action=add&name=Dishes&assignee=ana&frequency=daily");
    host.request("action=add&name=Laundry&assignee=ana&frequency=weekly");
    host.step(&mut control, 0, idle());

    host.step(&mut control, 100, pressed());
    host.step(&mut control, 200, idle());
    assert!(matches!(control.engine().mode(), Mode::ConfirmingCompletion { index: 0, .. }));

    // The chore under the dialog is deleted remotely; Laundry slides into
    // index 0 but must not be completed by the pending confirmation.
    let deleted = host.request("action=delete&index=0");
    host.step(&mut control, 300, pressed());
    assert!(deleted.recv().unwrap().is_ok());
    host.step(&mut control, 400, idle());

    assert!(control.board().chores().iter().all(|c| !c.completed));
    assert!(matches!(control.engine().mode(), Mode::Browsing { .. }));
}

#[test]
fn test_overdue_and_offline_signals() {
    let dir = tempfile::tempdir().unwrap();
    let mut control = ControlLoop::new(&Config::default(), JsonStore::with_dir(dir.path()));
    let mut host = Host::new();

    host.step(&mut control, 0, idle());
    assert_eq!(host.lamp, Some(Lamp::Green));

    host.request("action=add&name=Dishes&assignee=ana&frequency=daily");
    host.step(&mut control, 20, idle());
    assert_eq!(host.lamp, Some(Lamp::Yellow));

    // An hour later the never-completed chore is past due.
    host.step(&mut control, 3_600_000, idle());
    assert_eq!(host.lamp, Some(Lamp::Red));

    host.online = false;
    host.step(&mut control, 3_600_020, idle());
    assert_eq!(host.lamp, None);
}

#[test]
fn test_sweep_reopens_after_midnight() {
    let dir = tempfile::tempdir().unwrap();
    let mut control = ControlLoop::new(&Config::default(), JsonStore::with_dir(dir.path()));
    let mut host = Host::new();

    host.request("action=add_user&username=ana");
    host.request("action=add&name=Dishes&assignee=ana&frequency=daily");
    host.request("action=toggle&index=0");
    host.step(&mut control, 0, idle());
    assert_eq!(host.lamp, Some(Lamp::Green));

    // 16 hours later is midnight.
    let midnight_ms = 16 * 3_600_000;
    host.step(&mut control, midnight_ms, idle());
    assert!(!control.board().chores()[0].completed);
    assert_eq!(host.lamp, Some(Lamp::Yellow));

    let store = JsonStore::with_dir(dir.path());
    assert!(!store.load_chores()[0].points_awarded);
    assert_eq!(store.load_users()[0].points, 1);
}
