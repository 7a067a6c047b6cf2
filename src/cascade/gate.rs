/*
 * The gates that chain the clock tasks together.
 *
 * A gate is a single permit shared by two tasks. The holder takes it at the
 * start of a batch, keeps it for a fixed number of ticks and then hands it off.
 * The other task passes through the gate once per handed-off batch: it takes
 * the permit, does its work while holding it and lets go again. That is all it
 * takes to get "N ticks below for every tick above" without a shared counter.
 *
 * Holder side is `Batch`, passing side is `Pass`. Both only ever wait on the
 * permit or the hand-off signal, and both can be dropped in the middle of a
 * wait without leaking the permit.
 */

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    semaphore::{FairSemaphore, Semaphore, SemaphoreReleaser},
    signal::Signal,
};

use crate::error::ClockError;

/// Tasks that may queue on one gate: its holder and the task passing through.
pub const GATE_PARTIES: usize = 2;

type GatePermits<M> = FairSemaphore<M, GATE_PARTIES>;

/// Held while passing through a gate. Dropping it lets go of the gate.
pub type Permit<'a, M> = SemaphoreReleaser<'a, GatePermits<M>>;

/// A one-permit gate with a fixed batch size. It also counts hand-offs and
/// passes, which firmware and tests can read as statistics.
pub struct Gate<M: RawMutex> {
    name: &'static str,
    batch: u8,
    permits: GatePermits<M>,
    handed_off: Signal<M, ()>,
    batches: AtomicU32,
    passes: AtomicU32,
}

impl<M: RawMutex> Gate<M> {
    pub const fn new(name: &'static str, batch: u8) -> Self {
        assert!(batch > 0, "a gate batch needs at least one tick");
        Gate {
            name,
            batch,
            permits: GatePermits::new(1),
            handed_off: Signal::new(),
            batches: AtomicU32::new(0),
            passes: AtomicU32::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ticks the holder completes before each hand-off.
    pub fn batch(&self) -> u8 {
        self.batch
    }

    /// Completed batches, i.e. hand-offs, so far.
    pub fn batches_released(&self) -> u32 {
        self.batches.load(Ordering::Relaxed)
    }

    /// Times the passing task got through so far. Never more than
    /// `batches_released`; less once batches were missed and collapsed into
    /// a single pass.
    pub fn passes(&self) -> u32 {
        self.passes.load(Ordering::Relaxed)
    }

    async fn acquire(&self) -> Result<Permit<'_, M>, ClockError> {
        self.permits
            .acquire(1)
            .await
            .map_err(|_| ClockError::GateCrowded(self.name))
    }

    // The batch count goes up before the permit comes back, so whoever gets
    // the permit next also sees the new batch.
    fn hand_off(&self) {
        let batches = self.batches.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("{} gate: batch {} handed off", self.name, batches);
        self.handed_off.signal(());
        self.permits.release(1);
    }
}

/// Where the holder stands in its current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatchPhase {
    /// Never opened.
    Idle,
    /// Opened, no ticks yet.
    Acquired,
    /// This many ticks of the batch are done, fewer than the batch size.
    Ticking(u8),
    /// The last batch was handed off and the gate is not held.
    Released,
}

/// The holder's side of a gate.
pub struct Batch<'a, M: RawMutex> {
    gate: &'a Gate<M>,
    phase: BatchPhase,
}

impl<'a, M: RawMutex> Batch<'a, M> {
    pub fn new(gate: &'a Gate<M>) -> Self {
        Batch {
            gate,
            phase: BatchPhase::Idle,
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn is_held(&self) -> bool {
        matches!(self.phase, BatchPhase::Acquired | BatchPhase::Ticking(_))
    }

    /// Takes the gate unless a batch is already under way.
    pub async fn open(&mut self) -> Result<(), ClockError> {
        if self.is_held() {
            return Ok(());
        }

        self.gate.acquire().await?.disarm();
        self.phase = BatchPhase::Acquired;
        Ok(())
    }

    /// Counts one tick. The tick that completes the batch hands the gate off
    /// and reports `Released`. Ticking a batch that is not open is a bug: it
    /// panics in debug builds and is ignored otherwise.
    pub fn tick(&mut self) -> BatchPhase {
        debug_assert!(self.is_held(), "{} gate: tick outside a batch", self.gate.name);
        let done = match self.phase {
            BatchPhase::Acquired => 1,
            BatchPhase::Ticking(done) => done + 1,
            BatchPhase::Idle | BatchPhase::Released => return self.phase,
        };

        self.phase = if done >= self.gate.batch {
            self.gate.hand_off();
            BatchPhase::Released
        } else {
            BatchPhase::Ticking(done)
        };
        self.phase
    }
}

impl<M: RawMutex> Drop for Batch<'_, M> {
    // An abandoned batch gives the permit back but does not count as handed
    // off, so the passing side keeps waiting for a complete one.
    fn drop(&mut self) {
        if self.is_held() {
            self.gate.permits.release(1);
        }
    }
}

/// The passing side of a gate.
pub struct Pass<'a, M: RawMutex> {
    gate: &'a Gate<M>,
    seen: u32,
}

impl<'a, M: RawMutex> Pass<'a, M> {
    pub fn new(gate: &'a Gate<M>) -> Self {
        Pass { gate, seen: 0 }
    }

    /// Waits for a batch that has not been passed yet and takes the gate.
    /// Several hand-offs since the last pass still count as one.
    pub async fn enter(&mut self) -> Result<Permit<'a, M>, ClockError> {
        let gate = self.gate;
        loop {
            let permit = gate.acquire().await?;
            let batches = gate.batches_released();
            if batches != self.seen {
                self.seen = batches;
                gate.passes.fetch_add(1, Ordering::Relaxed);
                return Ok(permit);
            }

            drop(permit);
            gate.handed_off.wait().await;
        }
    }
}
