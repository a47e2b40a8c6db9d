use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, Instant};
use log::LevelFilter;
use simplelog::{Config, TestLogger};
use crate::request_clock::Clock;

mod icon_store;
mod openai_service;
mod screenshot;

static START: Once = Once::new();

fn init_logger_for_test() {
    START.call_once(|| TestLogger::init(LevelFilter::Trace, Config::default()).unwrap());
}

pub fn init() {
    init_logger_for_test();
}

struct ManualClockState {
    now: Instant,
    sleeps: Vec<Duration>,
}

/// Clock that only moves when slept on or advanced explicitly.
#[derive(Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualClockState>>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock {
            state: Arc::new(Mutex::new(ManualClockState { now: Instant::now(), sleeps: Vec::new() })),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.state.lock().unwrap().now += duration;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().unwrap().sleeps.clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().unwrap().now
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.now += duration;
        state.sleeps.push(duration);
    }
}
