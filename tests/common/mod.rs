#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cascade_clock::{Console, Reading, Timebase};
use embassy_futures::yield_now;
use tokio::time::{Instant, sleep, sleep_until};

pub type Raw = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Time as seen by tokio. Under a paused runtime the tests run in virtual
/// time and finish instantly.
pub struct TokioTimebase {
    origin: Instant,
}

impl TokioTimebase {
    pub fn new() -> Self {
        TokioTimebase {
            origin: Instant::now(),
        }
    }
}

impl Timebase for TokioTimebase {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    async fn delay_ms(&self, millis: u64) {
        sleep(Duration::from_millis(millis)).await
    }

    async fn delay_until_ms(&self, deadline_ms: u64) {
        sleep_until(self.origin + Duration::from_millis(deadline_ms)).await
    }
}

/// Keeps every line it is given.
#[derive(Default)]
pub struct Transcript {
    pub lines: Vec<String>,
}

impl Console for Transcript {
    async fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Writes one character at a time and yields in between, so that anything
/// not holding the output lock would get the chance to cut in.
#[derive(Clone, Default)]
pub struct SlowWire {
    pub wire: Rc<RefCell<String>>,
}

impl Console for SlowWire {
    async fn write_line(&mut self, line: &str) {
        for c in line.chars().chain(['\n']) {
            self.wire.borrow_mut().push(c);
            yield_now().await;
        }
    }
}

impl SlowWire {
    pub fn lines(&self) -> Vec<String> {
        self.wire.borrow().lines().map(str::to_string).collect()
    }
}

pub fn parse(line: &str) -> Option<Reading> {
    let mut parts = line.split(':').map(|part| part.parse::<u8>().ok());
    let reading = Reading {
        hours: parts.next()??,
        minutes: parts.next()??,
        seconds: parts.next()??,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(reading)
}

/// Which unit moved between two consecutive readings, if exactly one moved by
/// exactly one step.
pub fn step(from: &Reading, to: &Reading) -> Option<&'static str> {
    let next = |a: u8, b: u8, modulus: u8| (a + 1) % modulus == b;
    match (
        from.hours == to.hours,
        from.minutes == to.minutes,
        from.seconds == to.seconds,
    ) {
        (true, true, false) if next(from.seconds, to.seconds, 60) => Some("seconds"),
        (true, false, true) if next(from.minutes, to.minutes, 60) => Some("minutes"),
        (false, true, true) if next(from.hours, to.hours, 24) => Some("hours"),
        _ => None,
    }
}
