//! フェーズ転流
//!
//! デッドタイム待機のあとに3巻線分の出力を1回の更新で書き込みます。
//! 割り込み内でのビジーウェイト（[`PhaseCommutator::apply`]）と、
//! 「アーム → デッドタイム待機 → コミット」の2段階（[`PhaseCommutator::arm`] /
//! [`PhaseCommutator::commit`]）の両方を提供します。

use embedded_hal::delay::DelayNs;

use crate::delay::CommutationDelay;
use crate::phase::{self, ElectricalPhase, OutputPattern};

/// Output stage for the three winding pairs
///
/// Implementations must apply the whole pattern as one unit: no other
/// context may observe or interleave a partially written pattern.
pub trait PhaseDriver {
    fn write(&mut self, pattern: &OutputPattern);
}

impl<D: PhaseDriver + ?Sized> PhaseDriver for &mut D {
    fn write(&mut self, pattern: &OutputPattern) {
        (**self).write(pattern)
    }
}

/// A commutation waiting for its dead-time to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use = "an armed commutation does nothing until it is committed"]
pub struct PendingCommutation {
    phase: ElectricalPhase,
    dead_time: CommutationDelay,
}

impl PendingCommutation {
    pub fn phase(&self) -> ElectricalPhase {
        self.phase
    }

    pub fn dead_time(&self) -> CommutationDelay {
        self.dead_time
    }
}

pub struct PhaseCommutator<D> {
    driver: D,
    applied: ElectricalPhase,
    commutations: u32,
}

impl<D: PhaseDriver> PhaseCommutator<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            applied: ElectricalPhase::default(),
            commutations: 0,
        }
    }

    /// Capture the phase together with the dead-time in force right now
    pub fn arm(&self, phase: ElectricalPhase, dead_time: CommutationDelay) -> PendingCommutation {
        PendingCommutation { phase, dead_time }
    }

    /// Write the table entry for an armed commutation
    pub fn commit(&mut self, pending: PendingCommutation) -> OutputPattern {
        let pattern = phase::pattern(pending.phase);
        self.driver.write(&pattern);
        self.applied = pending.phase;
        self.commutations = self.commutations.wrapping_add(1);
        trace!(
            "Commutated to phase {} after {}us",
            pending.phase.index(),
            pending.dead_time.as_micros()
        );
        pattern
    }

    /// Busy-wait the dead-time, then commit
    pub fn apply<T: DelayNs>(
        &mut self,
        phase: ElectricalPhase,
        dead_time: CommutationDelay,
        delay: &mut T,
    ) -> OutputPattern {
        let pending = self.arm(phase, dead_time);
        delay.delay_us(dead_time.as_micros());
        self.commit(pending)
    }

    /// Phase most recently written to the outputs
    pub fn applied(&self) -> ElectricalPhase {
        self.applied
    }

    pub fn commutations(&self) -> u32 {
        self.commutations
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }
}
