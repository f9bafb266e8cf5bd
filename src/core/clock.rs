use std::time::Instant;

/// Longest delta a single tick reports, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Host-side frame clock.
/// The renderer never reads wall time itself; the host ticks this and passes the delta.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    max_delta: f32,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    /// Clock whose deltas are capped, so a stalled window does not make objects jump
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_tick: Instant::now(),
            max_delta,
        }
    }

    /// Seconds since the previous tick, capped at `max_delta`
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta.min(self.max_delta)
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
