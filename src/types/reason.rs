//! Reason codes for dial decisions and state changes

use serde::{Deserialize, Serialize};

/// Reason codes for every controller decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // D001: Input gate
    // =========================================================================
    /// Evaluation in flight
    D001_REJECTED_LOCKED,
    /// Answer already given, hang up first
    D001_REJECTED_FINALIZED,
    /// Session holds the maximum number of symbols
    D001_REJECTED_FULL,
    /// Another stroke is still moving
    D001_REJECTED_STROKE_BUSY,

    // =========================================================================
    // D002: Termination
    // =========================================================================
    /// Cap reached, finalizing
    D002_FINALIZE_AT_CAP,
    /// Early hang-up roll succeeded
    D002_FINALIZE_EARLY,
    /// Line stays open
    D002_CONTINUE_DIALING,

    // =========================================================================
    // D003: Strokes
    // =========================================================================
    /// Stroke granted, input locked until release
    D003_STROKE_STARTED,
    /// Stroke returned to rest
    D003_STROKE_RELEASED,
    /// Stroke belongs to a reset session or was already released
    D003_STROKE_STALE,

    // =========================================================================
    // D004: Evaluation
    // =========================================================================
    /// Answer stored
    D004_RESULT_APPLIED,
    /// Session was reset while connecting, answer dropped
    D004_RESULT_STALE,

    // =========================================================================
    // D005: Lifecycle
    // =========================================================================
    /// Session discarded, dial re-armed
    D005_RESET,
    /// Status query, nothing changed
    D005_STATE_MAINTAINED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::D001_REJECTED_LOCKED => "D001_REJECTED_LOCKED",
            Self::D001_REJECTED_FINALIZED => "D001_REJECTED_FINALIZED",
            Self::D001_REJECTED_FULL => "D001_REJECTED_FULL",
            Self::D001_REJECTED_STROKE_BUSY => "D001_REJECTED_STROKE_BUSY",
            Self::D002_FINALIZE_AT_CAP => "D002_FINALIZE_AT_CAP",
            Self::D002_FINALIZE_EARLY => "D002_FINALIZE_EARLY",
            Self::D002_CONTINUE_DIALING => "D002_CONTINUE_DIALING",
            Self::D003_STROKE_STARTED => "D003_STROKE_STARTED",
            Self::D003_STROKE_RELEASED => "D003_STROKE_RELEASED",
            Self::D003_STROKE_STALE => "D003_STROKE_STALE",
            Self::D004_RESULT_APPLIED => "D004_RESULT_APPLIED",
            Self::D004_RESULT_STALE => "D004_RESULT_STALE",
            Self::D005_RESET => "D005_RESET",
            Self::D005_STATE_MAINTAINED => "D005_STATE_MAINTAINED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::D001_REJECTED_LOCKED => "Line busy - connecting",
            Self::D001_REJECTED_FINALIZED => "Answer given - hang up to dial again",
            Self::D001_REJECTED_FULL => "Dial full",
            Self::D001_REJECTED_STROKE_BUSY => "Dial still turning",
            Self::D002_FINALIZE_AT_CAP => "Dial full - connecting",
            Self::D002_FINALIZE_EARLY => "The line picked up early",
            Self::D002_CONTINUE_DIALING => "Keep dialing",
            Self::D003_STROKE_STARTED => "Dial turning",
            Self::D003_STROKE_RELEASED => "Dial back at rest",
            Self::D003_STROKE_STALE => "Stroke from a discarded session",
            Self::D004_RESULT_APPLIED => "Answer received",
            Self::D004_RESULT_STALE => "Answer dropped after hang-up",
            Self::D005_RESET => "Hung up",
            Self::D005_STATE_MAINTAINED => "State unchanged",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
