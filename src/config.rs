/*
 * Sizes that end up in types are consts. Everything a deployment may want to
 * tune at run time lives in `ClockConfig`.
 */

/// Number of time events the mailbox holds before producers have to wait.
pub const MAILBOX_CAPACITY: usize = 5;

/// Second ticks per release of the minute gate.
pub const MINUTE_BATCH: u8 = 5;

/// Minute advances per release of the hour gate.
pub const HOUR_BATCH: u8 = 2;

/// How the minutes and hours tasks space out their own work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pacing {
    /// Self-delays follow from the second period and the gate batch sizes.
    Derived,
    /// Self-delays are configured on their own and may disagree with the
    /// gate cadence.
    Fixed {
        minute_period_ms: u64,
        hour_period_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    second_period_ms: u64,
    pacing: Pacing,
    /// Upper bound for every blocking wait except the periodic delays. `None`
    /// waits forever, so a stalled partner stalls the whole chain.
    pub wait_limit_ms: Option<u64>,
}

impl ClockConfig {
    pub const DEFAULT: Self = ClockConfig::new(1000, Pacing::Derived);

    /// Reference timing: a 5 s minute task and a 10 s hour
    /// task, unbounded waits.
    pub const REFERENCE: Self = ClockConfig::new(
        1000,
        Pacing::Fixed {
            minute_period_ms: 5000,
            hour_period_ms: 10000,
        },
    );

    /// Unbounded waits. Every period has to be at least a millisecond, or the
    /// task with the empty period never lets go of its executor.
    pub const fn new(second_period_ms: u64, pacing: Pacing) -> Self {
        assert!(second_period_ms > 0, "the second period must not be zero");
        if let Pacing::Fixed {
            minute_period_ms,
            hour_period_ms,
        } = pacing
        {
            assert!(minute_period_ms > 0, "the minute period must not be zero");
            assert!(hour_period_ms > 0, "the hour period must not be zero");
        }
        ClockConfig {
            second_period_ms,
            pacing,
            wait_limit_ms: None,
        }
    }

    pub const fn with_wait_limit_ms(self, limit_ms: u64) -> Self {
        ClockConfig {
            wait_limit_ms: Some(limit_ms),
            ..self
        }
    }

    pub const fn second_period_ms(&self) -> u64 {
        self.second_period_ms
    }

    pub const fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub const fn minute_period_ms(&self, minute_batch: u8) -> u64 {
        match self.pacing {
            Pacing::Derived => self.second_period_ms.saturating_mul(minute_batch as u64),
            Pacing::Fixed {
                minute_period_ms, ..
            } => minute_period_ms,
        }
    }

    pub const fn hour_period_ms(&self, minute_batch: u8, hour_batch: u8) -> u64 {
        match self.pacing {
            Pacing::Derived => self
                .minute_period_ms(minute_batch)
                .saturating_mul(hour_batch as u64),
            Pacing::Fixed { hour_period_ms, .. } => hour_period_ms,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_periods_follow_the_batches() {
        let config = ClockConfig::DEFAULT;

        assert_eq!(config.minute_period_ms(MINUTE_BATCH), 5000);
        assert_eq!(config.hour_period_ms(MINUTE_BATCH, HOUR_BATCH), 10000);

        let fast = ClockConfig::new(10, Pacing::Derived);
        assert_eq!(fast.minute_period_ms(3), 30);
        assert_eq!(fast.hour_period_ms(3, 4), 120);
    }

    #[test]
    fn fixed_periods_ignore_the_batches() {
        let config = ClockConfig::REFERENCE;

        assert_eq!(config.minute_period_ms(7), 5000);
        assert_eq!(config.hour_period_ms(7, 9), 10000);
    }

    #[test]
    fn waits_are_unbounded_unless_limited() {
        assert_eq!(ClockConfig::default().wait_limit_ms, None);
        assert_eq!(
            ClockConfig::DEFAULT.with_wait_limit_ms(250).wait_limit_ms,
            Some(250)
        );
    }

    #[test]
    #[should_panic]
    fn a_zero_second_period_is_rejected() {
        let _ = ClockConfig::new(0, Pacing::Derived);
    }

    #[test]
    #[should_panic]
    fn a_zero_fixed_period_is_rejected() {
        let _ = ClockConfig::new(
            1000,
            Pacing::Fixed {
                minute_period_ms: 0,
                hour_period_ms: 10000,
            },
        );
    }

    #[test]
    fn huge_periods_saturate() {
        let config = ClockConfig::new(u64::MAX / 2, Pacing::Derived);

        assert_eq!(config.minute_period_ms(MINUTE_BATCH), u64::MAX);
        assert_eq!(config.hour_period_ms(MINUTE_BATCH, HOUR_BATCH), u64::MAX);
    }
}
