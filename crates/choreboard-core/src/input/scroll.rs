//! Horizontal auto-scroll for names wider than the display.

use crate::storage::DisplayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameScroll {
    offset: usize,
    last_step_ms: u64,
    /// Holding at offset 0 after a wrap.
    paused_until_ms: Option<u64>,
}

impl NameScroll {
    pub fn new(now_ms: u64) -> Self {
        Self {
            offset: 0,
            last_step_ms: now_ms,
            paused_until_ms: None,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_paused(&self) -> bool {
        self.paused_until_ms.is_some()
    }

    pub fn reset(&mut self, now_ms: u64) {
        *self = Self::new(now_ms);
    }

    /// Advance on the scroll timer. Returns `true` when the offset changed.
    pub fn tick(&mut self, name_len: usize, now_ms: u64, cfg: &DisplayConfig) -> bool {
        if name_len <= cfg.width {
            let moved = self.offset != 0;
            self.reset(now_ms);
            return moved;
        }

        if let Some(until) = self.paused_until_ms {
            if now_ms < until {
                return false;
            }
            self.paused_until_ms = None;
            self.last_step_ms = now_ms;
            return false;
        }

        if now_ms.saturating_sub(self.last_step_ms) < cfg.scroll_step_ms {
            return false;
        }
        self.last_step_ms = now_ms;

        if self.offset + cfg.width >= name_len {
            self.offset = 0;
            self.paused_until_ms = Some(now_ms + cfg.scroll_pause_ms);
        } else {
            self.offset += 1;
        }
        true
    }
}
