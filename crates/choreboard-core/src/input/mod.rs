//! Physical input handling: analog axes, push button and name scrolling.

mod axis;
mod joystick;
mod scroll;

pub use axis::{AxisGate, Deflection};
pub use joystick::{Choice, InputOutcome, InputSample, JoystickEngine, Mode};
pub use scroll::NameScroll;
