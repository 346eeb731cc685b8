//! Mood categories and their canned answers

use colored::Color;
use serde::{Deserialize, Serialize};

const POSITIVE: [&str; 6] = [
    "That spark in your eye? The whole room can feel it.",
    "Some nights just hit different. This is one of the good ones.",
    "You're glowing brighter than the neon outside.",
    "Keep that fire burning. It looks good on you.",
    "The universe is winking back at you tonight.",
    "Savor this feeling like the last sip of good coffee.",
];

const NEGATIVE: [&str; 6] = [
    "The best conversations happen after midnight. Your feelings are valid.",
    "Every storm runs out of rain. Sit with it a while longer.",
    "The diner stays open all night. You don't have to figure it out right now.",
    "It's okay to not be okay. The stars shine brightest in the dark.",
    "Let it rain. Flowers need water to grow tomorrow.",
    "Heavy hearts make for deep roots. You're stronger than you know.",
];

const NEUTRAL: [&str; 5] = [
    "Life's a late-night playlist \u{2014} some tracks hit hard, some make you dance.",
    "The best stories have a little rain and a little fire.",
    "Drifting is just another way of moving forward.",
    "Sometimes the best answer is just a comfortable silence.",
    "You're right where you need to be. Just breathe.",
];

const CHAOTIC: [&str; 4] = [
    "The jukebox is playing your song, even if you can't quite hear it yet.",
    "Chaos is just order waiting to be understood.",
    "Spin the wheel again. The night is still young.",
    "Everything is spinning, but your feet are on the ground.",
];

/// Mood of a symbol, and of the answer picked for a whole line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Positive,
    Negative,
    Neutral,
    Chaotic,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 4] = [
        MoodCategory::Positive,
        MoodCategory::Negative,
        MoodCategory::Neutral,
        MoodCategory::Chaotic,
    ];

    /// Candidate answers, never empty
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            MoodCategory::Positive => &POSITIVE,
            MoodCategory::Negative => &NEGATIVE,
            MoodCategory::Neutral => &NEUTRAL,
            MoodCategory::Chaotic => &CHAOTIC,
        }
    }

    /// Terminal color for answers of this mood
    pub fn color(&self) -> Color {
        match self {
            MoodCategory::Positive => Color::Yellow,
            MoodCategory::Negative => Color::Blue,
            MoodCategory::Neutral => Color::White,
            MoodCategory::Chaotic => Color::Magenta,
        }
    }
}

impl std::fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoodCategory::Positive => "positive",
            MoodCategory::Negative => "negative",
            MoodCategory::Neutral => "neutral",
            MoodCategory::Chaotic => "chaotic",
        };
        write!(f, "{}", name)
    }
}
