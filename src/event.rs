use enum_ordinalize::Ordinalize;

/// The three units the clock counts. The ordinal doubles as the code a time
/// event carries through the mailbox.
#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    /// The value at which a counter of this unit wraps back to zero.
    pub const fn modulus(self) -> u8 {
        match self {
            TimeUnit::Second | TimeUnit::Minute => 60,
            TimeUnit::Hour => 24,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TimeUnit::Second => "seconds",
            TimeUnit::Minute => "minutes",
            TimeUnit::Hour => "hours",
        }
    }
}

/*
 * What a ticking task posts after each tick. It is a small `Copy` value so it
 * moves through the mailbox by value and nothing outlives the consumer.
 *
 * The source travels as its raw code rather than as a `TimeUnit`. The display
 * task is the one that decides whether a code makes sense.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeEvent {
    code: u8,
    label: &'static str,
}

impl TimeEvent {
    pub const fn new(unit: TimeUnit) -> Self {
        TimeEvent {
            code: unit as u8,
            label: unit.label(),
        }
    }

    /// An event with an arbitrary source code, for feeding the display
    /// directly.
    pub const fn from_code(code: u8, label: &'static str) -> Self {
        TimeEvent { code, label }
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// The unit this event advances, if its code names one.
    pub fn unit(&self) -> Option<TimeUnit> {
        TimeUnit::from_ordinal(self.code)
    }
}

impl From<TimeUnit> for TimeEvent {
    fn from(unit: TimeUnit) -> Self {
        TimeEvent::new(unit)
    }
}
