use std::time::Instant;

use crate::constants::TIMER_INTERVAL;

/// # Timers
/// The delay and sound countdown pair.
///
/// Both counters decay toward zero at 60 Hz of wall-clock time no matter how
/// fast the CPU is cycled: `tick` decrements each nonzero counter at most
/// once per elapsed [`TIMER_INTERVAL`], and a burst of cycles inside one
/// window produces a single decrement. An elapsed window restarts the clock;
/// missed windows are not made up.
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    last_tick: Instant,
}

impl Timers {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Timers {
            delay: 0,
            sound: 0,
            last_tick: now,
        }
    }

    /// Decrements both nonzero counters if a full window has elapsed since
    /// the previous decrement.
    pub fn tick(&mut self, now: Instant) {
        if now.duration_since(self.last_tick) >= TIMER_INTERVAL {
            self.delay = self.delay.saturating_sub(1);
            self.sound = self.sound.saturating_sub(1);
            self.last_tick = now;
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}
