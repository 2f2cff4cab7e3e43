//! Poll cycle state tracking
//!
//! One poll walks through a fixed sequence of states:
//!
//! ```text
//! Idle -> Connected -> Sent -> Waiting -> Completed -> Closed
//!   \________\__________\________\-----> Failed ----> Closed
//! ```
//!
//! `Closed` is terminal and reachable from every state, so a cycle can
//! always release its connection.

use tracing::trace;

use crate::error::{Error, Result};

/// Poll cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Nothing done yet
    Idle,

    /// TCP connection established
    Connected,

    /// Query command written
    Sent,

    /// Dwelling before the read
    Waiting,

    /// Reply read and decoded
    Completed,

    /// A step failed; the result is the sentinel
    Failed,

    /// Connection released
    Closed,
}

impl PollState {
    /// Check whether `next` may follow this state
    pub fn can_advance_to(self, next: PollState) -> bool {
        use PollState::*;

        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Completed | Failed, _) => false,
            (_, Failed) => true,
            (Idle, Connected) | (Connected, Sent) | (Sent, Waiting) | (Waiting, Completed) => true,
            _ => false,
        }
    }
}

/// State of one poll cycle
#[derive(Debug, Clone)]
pub struct PollCycle {
    state: PollState,
}

impl PollCycle {
    pub fn new() -> Self {
        Self {
            state: PollState::Idle,
        }
    }

    /// Get current state
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Move to `next`
    ///
    /// # Errors
    ///
    /// `InvalidState` if the transition skips or reverses a step.
    pub fn advance(&mut self, next: PollState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(Error::InvalidState {
                from: self.state,
                to: next,
            });
        }

        trace!(from = ?self.state, to = ?next, "Poll state");
        self.state = next;
        Ok(())
    }

    /// Record a failure unless the cycle already finished
    pub fn fail(&mut self) {
        if self.state.can_advance_to(PollState::Failed) {
            trace!(from = ?self.state, "Poll failed");
            self.state = PollState::Failed;
        }
    }

    /// Mark the connection released
    pub fn close(&mut self) {
        self.state = PollState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == PollState::Closed
    }
}

impl Default for PollCycle {
    fn default() -> Self {
        Self::new()
    }
}
