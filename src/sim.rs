//! Simulated HAL for running the controller without hardware
//!
//! `RecordingDriver` stands in for the six winding output lines and
//! `RecordingDelay` for the dead-time busy-wait.

use embedded_hal::delay::DelayNs;

use crate::commutator::PhaseDriver;
use crate::phase::OutputPattern;

/// Phase driver that remembers what was written
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    last: Option<OutputPattern>,
    previous: Option<OutputPattern>,
    writes: u32,
}

impl RecordingDriver {
    pub const fn new() -> Self {
        Self {
            last: None,
            previous: None,
            writes: 0,
        }
    }

    /// Most recent pattern
    pub fn last(&self) -> Option<OutputPattern> {
        self.last
    }

    /// Pattern written before the most recent one
    pub fn previous(&self) -> Option<OutputPattern> {
        self.previous
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl PhaseDriver for RecordingDriver {
    fn write(&mut self, pattern: &OutputPattern) {
        self.previous = self.last;
        self.last = Some(*pattern);
        self.writes += 1;
    }
}

/// Delay that accumulates requested time instead of waiting
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    total_ns: u64,
    calls: u32,
}

impl RecordingDelay {
    pub const fn new() -> Self {
        Self {
            total_ns: 0,
            calls: 0,
        }
    }

    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
        self.calls += 1;
    }
}
