use tracing::{debug, info};

use crate::clock::{format_clock, ClockTime};
use crate::error::{Error, ParseError};
use crate::offsets::parse_offsets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EngineState {
    Idle,
    Armed,
    Running,
    Expired,
}

/// What a successful `start` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Already running: rewound to the armed value and kept going.
    Restarted,
}

/// The countdown shown on the clock label.
///
/// Owns the time remaining and the value it was last armed with. Ticking is
/// driven from outside: the caller delivers `tick` once per period while
/// `is_running` holds.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    state: EngineState,
    remaining: ClockTime,
    armed: ClockTime,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            remaining: ClockTime::ZERO,
            armed: ClockTime::ZERO,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn remaining(&self) -> ClockTime {
        self.remaining
    }

    pub fn armed(&self) -> ClockTime {
        self.armed
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Current label text.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }

    /// Set the countdown from an offsets field. Leaves everything untouched on
    /// a parse failure.
    pub fn arm(&mut self, offsets: &str) -> Result<ClockTime, ParseError> {
        let t = parse_offsets(offsets)?;
        debug!(offsets, remaining = %t, "armed countdown");

        self.remaining = t;
        self.armed = t;
        self.state = EngineState::Armed;
        Ok(t)
    }

    pub fn start(&mut self) -> Result<StartOutcome, Error> {
        if self.is_running() {
            self.remaining = self.armed;
            info!(remaining = %self.remaining, "restarting countdown");
            return Ok(StartOutcome::Restarted);
        }

        if self.remaining.is_zero() {
            return Err(Error::InvalidState("no time left to count down"));
        }

        info!(remaining = %self.remaining, "starting countdown");
        self.state = EngineState::Running;
        Ok(StartOutcome::Started)
    }

    /// Halt and rewind to the armed value. Safe to call in any state.
    pub fn stop(&mut self) {
        if self.is_running() {
            info!(remaining = %self.remaining, "stopping countdown");
        }

        self.remaining = self.armed;
        if self.state != EngineState::Idle {
            self.state = EngineState::Armed;
        }
    }

    /// Take one millisecond off. Returns false when not running.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.remaining.decrement();
        if self.remaining.is_zero() {
            info!("countdown expired");
            self.state = EngineState::Expired;
        }
        true
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}
