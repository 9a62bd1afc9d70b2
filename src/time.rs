//! Fixed-timestep clock and the autosave schedule built on it.
//!
//! `draw_web()` fires at the display refresh rate with an uneven delta.
//! [`GameTime`] turns wall-clock milliseconds into whole ticks so the
//! schedule below can count ticks instead of timestamps.

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet turned into ticks.
    carry: f64,
    last_ms: Option<f64>,
}

/// Longest frame gap honoured, so a backgrounded tab does not replay
/// minutes of ticks on return.
const MAX_FRAME_MS: f64 = 500.0;

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            carry: 0.0,
            last_ms: None,
        }
    }

    /// Feed the current timestamp; returns how many ticks elapsed since the
    /// previous call. The first call only records the timestamp.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = self
            .last_ms
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_MS));
        self.last_ms = Some(now_ms);

        self.carry += delta;
        let ticks = (self.carry / self.ms_per_tick).floor() as u32;
        self.carry -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

/// Counts ticks and says when the next autosave is due.
pub struct AutosaveTimer {
    interval: u32,
    elapsed: u32,
}

impl AutosaveTimer {
    pub fn new(interval_ticks: u32) -> Self {
        Self {
            interval: interval_ticks.max(1),
            elapsed: 0,
        }
    }

    /// Advance by `ticks`; true when at least one save point was crossed.
    /// Several missed save points collapse into one save.
    pub fn advance(&mut self, ticks: u32) -> bool {
        self.elapsed = self.elapsed.saturating_add(ticks);
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed %= self.interval;
        true
    }

    /// Start a fresh interval, e.g. after a manual save.
    pub fn restart(&mut self) {
        self.elapsed = 0;
    }
}
