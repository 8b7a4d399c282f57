use std::{
    thread,
    time::{Duration, Instant},
};

/// Fixed-rate tick pacing. Late frames are not made up.
pub struct FrameClock {
    started: Instant,
    period: Duration,
    next_tick: Instant,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            period,
            next_tick: now,
        }
    }

    /// Milliseconds since the clock started.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Sleeps until the next tick boundary.
    pub fn wait_next(&mut self) {
        self.next_tick += self.period;
        let now = Instant::now();
        if self.next_tick > now {
            thread::sleep(self.next_tick - now);
        } else {
            self.next_tick = now;
        }
    }
}
