/*
 * The three ticking tasks.
 *
 * Seconds hold the minute gate for a batch of ticks, minutes pass through it
 * once per batch while holding the hour gate for a batch of their own, hours
 * pass through the hour gate. Every tick also goes into the mailbox, where the
 * display task picks it up. Each task keeps only its own position in the
 * chain; the time that gets shown is the display task's business.
 *
 * A task posts its event before it counts the tick towards its batch, so the
 * unit above can never show up in the mailbox ahead of the tick that let it
 * advance.
 */

pub mod gate;

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::context::ClockContext;
use crate::error::{ClockError, Wait};
use crate::event::{TimeEvent, TimeUnit};
use crate::time::{Timebase, bounded};
use gate::{Batch, BatchPhase, Pass};

/// The seconds task: one tick per second period, on a fixed grid measured
/// from the first tick. Only returns if a bounded wait runs out.
pub async fn run_seconds<M, C, T>(
    ctx: &ClockContext<'_, M, C>,
    time: &T,
) -> Result<Infallible, ClockError>
where
    M: RawMutex,
    T: Timebase,
{
    let limit = ctx.config.wait_limit_ms;
    let period = ctx.second_period_ms();
    let gate = ctx.minute_gate;
    let tick: TimeEvent = TimeUnit::Second.into();
    let mut batch = Batch::new(gate);
    let mut next_tick = time.now_ms();
    info!("seconds: started, one tick per {} ms", period);

    loop {
        bounded(time, limit, Wait::Gate(gate.name()), batch.open()).await??;
        bounded(time, limit, Wait::MailboxPost, ctx.mailbox.send(tick)).await?;
        if batch.tick() == BatchPhase::Released {
            debug!("seconds: {} gate released", gate.name());
        }

        next_tick = next_tick.saturating_add(period);
        time.delay_until_ms(next_tick).await;
    }
}

/// The minutes task: one advance per batch of seconds, handing the hour gate
/// on after every batch of its own. Only returns if a bounded wait runs out.
pub async fn run_minutes<M, C, T>(
    ctx: &ClockContext<'_, M, C>,
    time: &T,
) -> Result<Infallible, ClockError>
where
    M: RawMutex,
    T: Timebase,
{
    let limit = ctx.config.wait_limit_ms;
    let period = ctx.minute_period_ms();
    let advance: TimeEvent = TimeUnit::Minute.into();
    let mut from_seconds = Pass::new(ctx.minute_gate);
    let mut to_hours = Batch::new(ctx.hour_gate);
    info!("minutes: started, resting {} ms between advances", period);

    loop {
        bounded(time, limit, Wait::Gate(ctx.hour_gate.name()), to_hours.open()).await??;
        let permit = bounded(
            time,
            limit,
            Wait::Gate(ctx.minute_gate.name()),
            from_seconds.enter(),
        )
        .await??;

        bounded(time, limit, Wait::MailboxPost, ctx.mailbox.send(advance)).await?;
        if to_hours.tick() == BatchPhase::Released {
            debug!("minutes: {} gate released", ctx.hour_gate.name());
        }
        drop(permit);

        time.delay_ms(period).await;
    }
}

/// The hours task: one advance per batch of minutes. Only returns if a bounded
/// wait runs out.
pub async fn run_hours<M, C, T>(
    ctx: &ClockContext<'_, M, C>,
    time: &T,
) -> Result<Infallible, ClockError>
where
    M: RawMutex,
    T: Timebase,
{
    let limit = ctx.config.wait_limit_ms;
    let period = ctx.hour_period_ms();
    let advance: TimeEvent = TimeUnit::Hour.into();
    let mut from_minutes = Pass::new(ctx.hour_gate);
    let mut hours: u8 = 0;
    info!("hours: started, resting {} ms between advances", period);

    loop {
        let permit = bounded(
            time,
            limit,
            Wait::Gate(ctx.hour_gate.name()),
            from_minutes.enter(),
        )
        .await??;

        hours = (hours + 1) % TimeUnit::Hour.modulus();
        trace!("hours: advancing to {}", hours);
        bounded(time, limit, Wait::MailboxPost, ctx.mailbox.send(advance)).await?;
        drop(permit);

        time.delay_ms(period).await;
    }
}
