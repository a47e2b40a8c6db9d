use std::thread;
use std::time::{Duration, Instant};
use log::debug;

pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(12);

pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Moment of the last generation request, shared by every batch of a session.
#[derive(Debug, Clone)]
pub struct RequestClock {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl Default for RequestClock {
    fn default() -> Self {
        RequestClock::new(MIN_REQUEST_INTERVAL)
    }
}

impl RequestClock {
    pub fn new(min_interval: Duration) -> RequestClock {
        RequestClock {
            last_request: None,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Time still to wait before the next request may be issued.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => self.min_interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn wait_for_slot(&self, clock: &impl Clock) {
        let remaining = self.remaining(clock.now());

        if !remaining.is_zero() {
            debug!("waiting {:?} before next request", remaining);
            clock.sleep(remaining);
        }
    }

    pub fn backoff(&self, clock: &impl Clock) {
        debug!("backing off for {:?}", self.min_interval);
        clock.sleep(self.min_interval);
    }

    pub fn mark(&mut self, at: Instant) {
        self.last_request = Some(at);
    }
}
