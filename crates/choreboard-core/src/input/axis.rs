//! Edge-triggered analog axis.

use crate::storage::InputConfig;

/// Direction of a counted deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deflection {
    /// Reading below the low threshold.
    Low,
    /// Reading above the high threshold.
    High,
}

/// Turns a continuously sampled axis into discrete moves.
///
/// A move counts only when the stick has been back in the dead-zone since
/// the previous counted move and the inter-move delay has passed, so holding
/// the stick over produces exactly one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisGate {
    armed: bool,
    last_move_ms: Option<u64>,
}

impl Default for AxisGate {
    fn default() -> Self {
        Self {
            armed: true,
            last_move_ms: None,
        }
    }
}

impl AxisGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feed one reading. Returns the deflection if it counts as a move.
    pub fn update(&mut self, value: u16, now_ms: u64, cfg: &InputConfig) -> Option<Deflection> {
        if in_dead_zone(value, cfg) {
            self.armed = true;
            return None;
        }
        let deflection = classify(value, cfg)?;
        if !self.armed {
            return None;
        }
        if let Some(last) = self.last_move_ms {
            if now_ms.saturating_sub(last) < cfg.move_delay_ms {
                return None;
            }
        }
        self.armed = false;
        self.last_move_ms = Some(now_ms);
        Some(deflection)
    }

    /// Track a reading while the axis is ignored: re-arm at center, disarm on
    /// deflection, never count a move.
    pub fn suppress(&mut self, value: u16, cfg: &InputConfig) {
        if in_dead_zone(value, cfg) {
            self.armed = true;
        } else if classify(value, cfg).is_some() {
            self.armed = false;
        }
    }
}

fn in_dead_zone(value: u16, cfg: &InputConfig) -> bool {
    (cfg.dead_zone_low..=cfg.dead_zone_high).contains(&value)
}

fn classify(value: u16, cfg: &InputConfig) -> Option<Deflection> {
    if value < cfg.low_threshold {
        Some(Deflection::Low)
    } else if value > cfg.high_threshold {
        Some(Deflection::High)
    } else {
        None
    }
}
