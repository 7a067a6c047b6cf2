/*
 * In order to keep the clock tasks testable we keep all time and delay
 * functions outside of them. The firmware hands in a timebase backed by the
 * hardware timer, the tests hand in one backed by a paused clock.
 */

use embassy_futures::select::{Either, select};

use crate::error::{ClockError, Wait};

/// Monotonic milliseconds and the two delay flavours the tasks need.
#[allow(async_fn_in_trait)]
pub trait Timebase {
    /// Milliseconds since some fixed point in the past.
    fn now_ms(&self) -> u64;

    /// Suspends for at least `millis`, counted from now.
    async fn delay_ms(&self, millis: u64);

    /// Suspends until `now_ms()` reaches `deadline_ms`. Periodic callers add
    /// their period to the previous deadline, so lateness does not pile up.
    async fn delay_until_ms(&self, deadline_ms: u64);
}

/// Runs `future` to completion, or gives up after `limit_ms` and reports which
/// wait ran out. Without a limit this is just `future.await`.
pub async fn bounded<T, F>(
    time: &T,
    limit_ms: Option<u64>,
    wait: Wait,
    future: F,
) -> Result<F::Output, ClockError>
where
    T: Timebase,
    F: Future,
{
    let Some(limit_ms) = limit_ms else {
        return Ok(future.await);
    };

    match select(future, time.delay_ms(limit_ms)).await {
        Either::First(output) => Ok(output),
        Either::Second(()) => {
            warn!("gave up waiting for {} after {} ms", wait, limit_ms);
            Err(ClockError::TimedOut(wait))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::{pending, ready};

    // Delays never finish, so only the future under test can complete.
    struct Frozen;

    impl Timebase for Frozen {
        fn now_ms(&self) -> u64 {
            0
        }

        async fn delay_ms(&self, _millis: u64) {
            pending::<()>().await
        }

        async fn delay_until_ms(&self, _deadline_ms: u64) {
            pending::<()>().await
        }
    }

    // Delays finish on the first poll.
    struct Instant;

    impl Timebase for Instant {
        fn now_ms(&self) -> u64 {
            0
        }

        async fn delay_ms(&self, _millis: u64) {}

        async fn delay_until_ms(&self, _deadline_ms: u64) {}
    }

    #[tokio::test]
    async fn unbounded_waits_return_the_output() {
        let out = bounded(&Instant, None, Wait::OutputLock, ready(7)).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn bounded_waits_prefer_a_ready_future() {
        let out = bounded(&Instant, Some(10), Wait::MailboxPost, ready(3)).await;
        assert_eq!(out, Ok(3));
    }

    #[tokio::test]
    async fn bounded_waits_report_the_wait_that_ran_out() {
        let out = bounded(&Instant, Some(10), Wait::Gate("hour"), pending::<()>()).await;
        assert_eq!(out, Err(ClockError::TimedOut(Wait::Gate("hour"))));
    }

    #[tokio::test]
    async fn a_delay_that_never_ends_never_times_out() {
        let out = bounded(&Frozen, Some(10), Wait::MailboxCollect, ready(())).await;
        assert_eq!(out, Ok(()));
    }
}
