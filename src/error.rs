use core::fmt;

/// A point at which a clock task can block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// Acquiring or passing the named gate.
    Gate(&'static str),
    /// Posting into a full mailbox.
    MailboxPost,
    /// Collecting from an empty mailbox.
    MailboxCollect,
    OutputLock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// A bounded wait ran out before its partner showed up.
    TimedOut(Wait),
    /// More parties queued on the named gate than it has room for.
    GateCrowded(&'static str),
}

impl fmt::Display for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wait::Gate(name) => write!(f, "the {name} gate"),
            Wait::MailboxPost => f.write_str("a free mailbox slot"),
            Wait::MailboxCollect => f.write_str("a mailbox event"),
            Wait::OutputLock => f.write_str("the output lock"),
        }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::TimedOut(wait) => write!(f, "timed out waiting for {wait}"),
            ClockError::GateCrowded(name) => write!(f, "too many parties waiting on the {name} gate"),
        }
    }
}

impl core::error::Error for ClockError {}
