/*
 * A wall clock kept by three ticking tasks and one display task.
 *
 * The seconds task hands the minute gate over after every five ticks, the
 * minutes task hands the hour gate over after every two advances, and all of
 * them post time events into one bounded mailbox. The display task is the only
 * reader of that mailbox and the only owner of the displayed time, so nothing
 * here shares a counter behind a lock.
 *
 * The library does not know about any board. Time comes in through the
 * `Timebase` trait and text goes out through the `Console` trait, which keeps
 * all of it testable on the host.
 */

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in the other modules.
#[macro_use]
mod fmt;

pub mod cascade;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod event;
pub mod time;

pub use cascade::gate::{Batch, BatchPhase, GATE_PARTIES, Gate, Pass, Permit};
pub use cascade::{run_hours, run_minutes, run_seconds};
pub use config::{ClockConfig, HOUR_BATCH, MAILBOX_CAPACITY, MINUTE_BATCH, Pacing};
pub use context::{ClockContext, Mailbox};
pub use display::{Console, Display, ERROR_LINE, OutputLock, Reading, run_display};
pub use error::{ClockError, Wait};
pub use event::{TimeEvent, TimeUnit};
pub use time::{Timebase, bounded};
