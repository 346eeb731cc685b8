//! Evaluator results

use serde::{Deserialize, Serialize};

use crate::types::MoodCategory;

/// Per-line counts over catalog symbols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Positives minus negatives
    pub score: i32,
    pub chaotic_count: u32,
    /// Glyphs found in the catalog (neutrals included)
    pub classified: u32,
}

impl Tally {
    /// Category, in priority order: chaotic, positive, negative, neutral
    pub fn category(&self) -> MoodCategory {
        if self.chaotic_count >= 2 {
            MoodCategory::Chaotic
        } else if self.score > 1 {
            MoodCategory::Positive
        } else if self.score < -1 {
            MoodCategory::Negative
        } else {
            MoodCategory::Neutral
        }
    }
}

/// Full answer for one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub tally: Tally,
    /// None for a silent line
    pub category: Option<MoodCategory>,
    pub message: String,
}

impl Evaluation {
    pub fn is_silent(&self) -> bool {
        self.category.is_none()
    }
}
