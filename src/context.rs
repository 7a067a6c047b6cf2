use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

use crate::cascade::gate::Gate;
use crate::config::{ClockConfig, MAILBOX_CAPACITY};
use crate::display::OutputLock;
use crate::event::TimeEvent;

/// Every time event goes through here, in the order it was posted.
pub type Mailbox<M> = Channel<M, TimeEvent, MAILBOX_CAPACITY>;

/*
 * Everything the clock tasks share. It only holds handles and settings, never
 * the time itself, so each task gets the same `&ClockContext` and none of them
 * needs to lock it.
 */
pub struct ClockContext<'a, M: RawMutex, C> {
    pub mailbox: &'a Mailbox<M>,
    /// Held by the seconds task, passed by the minutes task.
    pub minute_gate: &'a Gate<M>,
    /// Held by the minutes task, passed by the hours task.
    pub hour_gate: &'a Gate<M>,
    pub output: &'a OutputLock<M, C>,
    pub config: ClockConfig,
}

impl<'a, M: RawMutex, C> ClockContext<'a, M, C> {
    pub const fn new(
        mailbox: &'a Mailbox<M>,
        minute_gate: &'a Gate<M>,
        hour_gate: &'a Gate<M>,
        output: &'a OutputLock<M, C>,
        config: ClockConfig,
    ) -> Self {
        ClockContext {
            mailbox,
            minute_gate,
            hour_gate,
            output,
            config,
        }
    }

    pub fn second_period_ms(&self) -> u64 {
        self.config.second_period_ms()
    }

    pub fn minute_period_ms(&self) -> u64 {
        self.config.minute_period_ms(self.minute_gate.batch())
    }

    pub fn hour_period_ms(&self) -> u64 {
        self.config
            .hour_period_ms(self.minute_gate.batch(), self.hour_gate.batch())
    }
}
