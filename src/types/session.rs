//! Dial session state and the tickets that refer back to it

use crate::types::{DialPhase, Symbol};

/// Mutable state of one dialing attempt
#[derive(Debug, Clone, Default)]
pub struct DialSession {
    /// Accepted symbols, in dial order
    entries: Vec<&'static Symbol>,
    /// Evaluation in flight
    locked: bool,
    /// Answer produced
    finalized: bool,
    response: Option<String>,
    /// "Dial your mood..." prompt still showing
    idle: bool,
}

impl DialSession {
    pub fn new() -> Self {
        Self {
            idle: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[&'static Symbol] {
        &self.entries
    }

    pub fn glyphs(&self) -> Vec<&'static str> {
        self.entries.iter().map(|s| s.glyph).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn phase(&self) -> DialPhase {
        if self.finalized {
            DialPhase::Answered
        } else if self.locked {
            DialPhase::Connecting
        } else if self.entries.is_empty() {
            DialPhase::Idle
        } else {
            DialPhase::Dialing
        }
    }

    pub(crate) fn push(&mut self, symbol: &'static Symbol) {
        self.entries.push(symbol);
        self.idle = false;
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    pub(crate) fn finalize(&mut self, response: String) {
        self.response = Some(response);
        self.finalized = true;
        self.locked = false;
    }
}

/// Claim on the single stroke slot of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeTicket {
    pub id: u64,
    pub epoch: u64,
    pub symbol: &'static Symbol,
}

/// Evaluation owed once the settle delay has elapsed.
///
/// Not `Clone`: each ticket settles at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingEvaluation {
    pub epoch: u64,
    /// Entries at the moment the session locked
    pub entry_count: usize,
}
