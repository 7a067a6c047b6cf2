/*
 * The display task.
 *
 * This is the only place where hours, minutes and seconds exist as one value.
 * The ticking tasks just announce that their unit moved; the display task
 * takes those announcements off the mailbox one at a time, so the clock has a
 * single writer and needs no lock of its own. The only lock here is the one
 * around the console, so that a line is never mixed with somebody else's
 * output.
 */

use core::convert::Infallible;
use core::fmt::{self, Write};

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use enum_ordinalize::Ordinalize;
use heapless::String;

use crate::context::ClockContext;
use crate::error::{ClockError, Wait};
use crate::event::{TimeEvent, TimeUnit};
use crate::time::{Timebase, bounded};

/// What gets printed for an event whose source makes no sense.
pub const ERROR_LINE: &str = "Error";

// Fits any `Reading`, even "255:255:255".
const LINE_CAPACITY: usize = 16;

/// A line-oriented output device.
#[allow(async_fn_in_trait)]
pub trait Console {
    /// Writes `line` followed by a line break.
    async fn write_line(&mut self, line: &str);
}

/// Guards the console. Whoever holds it writes whole lines.
pub type OutputLock<M, C> = Mutex<M, C>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

/// The displayed clock, starting at 0:0:0.
#[derive(Debug, Default)]
pub struct Display {
    counters: [u8; TimeUnit::VARIANT_COUNT],
}

impl Display {
    pub const fn new() -> Self {
        Display {
            counters: [0; TimeUnit::VARIANT_COUNT],
        }
    }

    pub fn reading(&self) -> Reading {
        Reading {
            hours: self.counter(TimeUnit::Hour),
            minutes: self.counter(TimeUnit::Minute),
            seconds: self.counter(TimeUnit::Second),
        }
    }

    fn counter(&self, unit: TimeUnit) -> u8 {
        self.counters[unit.ordinal() as usize]
    }

    /// Moves the unit named by `event` on by one. Returns `None` and leaves
    /// the clock alone if the event names no unit.
    pub fn apply(&mut self, event: &TimeEvent) -> Option<Reading> {
        let unit = event.unit()?;
        let counter = &mut self.counters[unit.ordinal() as usize];
        *counter = (*counter + 1) % unit.modulus();
        Some(self.reading())
    }

    /// Applies `event` and writes the outcome to `console` as one line.
    pub async fn show<C: Console>(&mut self, event: &TimeEvent, console: &mut C) -> Option<Reading> {
        let reading = self.apply(event);
        if reading.is_none() {
            warn!("display: event with unknown source {}", event.code());
        }
        console.write_line(&render(reading.as_ref())).await;

        reading
    }
}

/// The line shown for `reading`, or the error line without one. A line that
/// does not fit in `LINE_CAPACITY` goes out cut short.
fn render(reading: Option<&Reading>) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    let rendered = match reading {
        Some(reading) => write!(line, "{reading}"),
        None => line.push_str(ERROR_LINE).map_err(|()| fmt::Error),
    };
    if rendered.is_err() {
        warn!("display: line cut short at {} bytes", LINE_CAPACITY);
    }
    line
}

/// The display task: takes events off the mailbox and shows each one under
/// the output lock. Only returns if a bounded wait runs out.
pub async fn run_display<M, C, T>(
    ctx: &ClockContext<'_, M, C>,
    time: &T,
) -> Result<Infallible, ClockError>
where
    M: RawMutex,
    C: Console,
    T: Timebase,
{
    let limit = ctx.config.wait_limit_ms;
    let mut display = Display::new();
    info!("display: started");

    loop {
        let event = bounded(time, limit, Wait::MailboxCollect, ctx.mailbox.receive()).await?;
        let mut console = bounded(time, limit, Wait::OutputLock, ctx.output.lock()).await?;
        display.show(&event, &mut *console).await;
    }
}
