//! Dial session phase (derived, for display)

use colored::Color;
use serde::{Deserialize, Serialize};

/// Where a dial session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialPhase {
    /// Nothing dialed yet
    Idle,
    /// Symbols dialed, line still open
    Dialing,
    /// Settle delay running, input locked
    Connecting,
    /// Answer available, waiting for hang-up
    Answered,
}

impl DialPhase {
    /// Terminal color
    pub fn color(&self) -> Color {
        match self {
            DialPhase::Idle => Color::BrightBlack,
            DialPhase::Dialing => Color::Yellow,
            DialPhase::Connecting => Color::Cyan,
            DialPhase::Answered => Color::Green,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            DialPhase::Idle => "☎️",
            DialPhase::Dialing => "🔄",
            DialPhase::Connecting => "📡",
            DialPhase::Answered => "💬",
        }
    }
}

impl std::fmt::Display for DialPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialPhase::Idle => "IDLE",
            DialPhase::Dialing => "DIALING",
            DialPhase::Connecting => "CONNECTING",
            DialPhase::Answered => "ANSWERED",
        };
        write!(f, "{}", name)
    }
}
