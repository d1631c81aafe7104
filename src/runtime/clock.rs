use std::cell::Cell;
use std::time::{Duration, Instant};

/// Millisecond time source for the event loop.
pub trait Clock {
    fn now_ms(&self) -> u64;

    /// Block (or jump) until `deadline_ms`. No-op if already past.
    fn sleep_until(&self, deadline_ms: u64);

    /// How long to wait for a network completion before the timer at
    /// `deadline_ms` is due. `None` means wait for the completion first.
    fn wait_budget(&self, deadline_ms: u64) -> Option<Duration>;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_until(&self, deadline_ms: u64) {
        let now = self.now_ms();
        if deadline_ms > now {
            std::thread::sleep(Duration::from_millis(deadline_ms - now));
        }
    }

    fn wait_budget(&self, deadline_ms: u64) -> Option<Duration> {
        Some(Duration::from_millis(deadline_ms.saturating_sub(self.now_ms())))
    }
}

/// Virtual time that only moves when the loop sleeps.
///
/// Network round-trips take zero virtual time, so a test's timers fire
/// exactly when the test advances the clock past them.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: u64) -> Self {
        ManualClock { now: Cell::new(ms) }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep_until(&self, deadline_ms: u64) {
        if deadline_ms > self.now.get() {
            self.now.set(deadline_ms);
        }
    }

    fn wait_budget(&self, _deadline_ms: u64) -> Option<Duration> {
        None
    }
}
