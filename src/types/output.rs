//! Output structures for terminal display and live updates

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{DialPhase, ReasonCode};

/// Snapshot of a dial session after a transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialOutput {
    pub timestamp: DateTime<Utc>,
    /// Bumped by every hang-up
    pub epoch: u64,
    pub phase: DialPhase,
    /// Dialed glyphs, in order
    pub glyphs: Vec<String>,
    /// New strokes refused right now
    pub input_locked: bool,
    /// "Dial your mood..." prompt showing
    pub idle: bool,
    pub response: Option<String>,
    /// Why this snapshot was taken
    pub reason: ReasonCode,
}

impl DialOutput {
    pub fn new(
        epoch: u64,
        phase: DialPhase,
        glyphs: Vec<String>,
        input_locked: bool,
        idle: bool,
        response: Option<String>,
        reason: ReasonCode,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            epoch,
            phase,
            glyphs,
            input_locked,
            idle,
            response,
            reason,
        }
    }

    fn dialed(&self) -> String {
        if self.glyphs.is_empty() {
            "Dial your mood...".to_string()
        } else {
            self.glyphs.join(" · ")
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "{} [{}] {} | {}",
            self.phase.emoji(),
            self.phase,
            self.dialed(),
            self.reason.description()
        );
        line.color(self.phase.color()).to_string()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "phase={} | dialed={} | locked={} | reason={}",
            self.phase,
            self.glyphs.join(" "),
            self.input_locked,
            self.reason.code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parseable_string() {
        let output = DialOutput::new(
            0,
            DialPhase::Dialing,
            vec!["🙂".to_string(), "🔥".to_string()],
            false,
            false,
            None,
            ReasonCode::D002_CONTINUE_DIALING,
        );
        assert_eq!(
            output.to_parseable_string(),
            "phase=DIALING | dialed=🙂 🔥 | locked=false | reason=D002_CONTINUE_DIALING"
        );
    }

    #[test]
    fn test_idle_prompt_when_empty() {
        colored::control::set_override(false);
        let output = DialOutput::new(
            1,
            DialPhase::Idle,
            Vec::new(),
            false,
            true,
            None,
            ReasonCode::D005_RESET,
        );
        assert!(output.to_terminal_string().contains("Dial your mood..."));
    }
}
