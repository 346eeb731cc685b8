//! Response Evaluator: tallies a dialed line and picks an answer
//!
//! score = positives − negatives, chaotic = count of chaotic symbols.
//! Category priority: chaotic ≥ 2, score > 1, score < −1, otherwise neutral.

use rand::Rng;

use crate::types::{Evaluation, MoodCategory, Symbol, Tally};
use crate::SILENT_LINE;

/// Stateless evaluator; the randomness source is passed per call
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEvaluator;

impl ResponseEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Count catalog symbols in a line. Unknown glyphs are ignored.
    pub fn tally<S: AsRef<str>>(&self, glyphs: &[S]) -> Tally {
        let mut tally = Tally::default();

        for symbol in glyphs.iter().filter_map(|g| Symbol::lookup(g.as_ref())) {
            tally.classified += 1;
            match symbol.category {
                MoodCategory::Positive => tally.score += 1,
                MoodCategory::Negative => tally.score -= 1,
                MoodCategory::Chaotic => tally.chaotic_count += 1,
                MoodCategory::Neutral => {}
            }
        }

        tally
    }

    /// Deterministic part: the category a non-empty line maps to
    pub fn categorize<S: AsRef<str>>(&self, glyphs: &[S]) -> Option<MoodCategory> {
        if glyphs.is_empty() {
            None
        } else {
            Some(self.tally(glyphs).category())
        }
    }

    /// Tally, categorize and pick one answer uniformly at random
    pub fn evaluate<S, R>(&self, glyphs: &[S], rng: &mut R) -> Evaluation
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let tally = self.tally(glyphs);

        if glyphs.is_empty() {
            return Evaluation {
                tally,
                category: None,
                message: SILENT_LINE.to_string(),
            };
        }

        let category = tally.category();
        let candidates = category.candidates();
        let message = candidates[rng.gen_range(0..candidates.len())].to_string();

        Evaluation {
            tally,
            category: Some(category),
            message,
        }
    }

    /// Just the answer text
    pub fn respond<S, R>(&self, glyphs: &[S], rng: &mut R) -> String
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        self.evaluate(glyphs, rng).message
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_empty_line_is_silent() {
        let evaluator = ResponseEvaluator::new();
        let empty: [&str; 0] = [];
        let evaluation = evaluator.evaluate(&empty, &mut rng());
        assert!(evaluation.is_silent());
        assert_eq!(evaluation.message, SILENT_LINE);
    }

    #[test]
    fn test_unknown_glyphs_are_neutral() {
        let evaluator = ResponseEvaluator::new();
        let evaluation = evaluator.evaluate(&["🍕", "x"], &mut rng());
        assert_eq!(evaluation.tally, Tally::default());
        assert_eq!(evaluation.category, Some(MoodCategory::Neutral));
        assert!(MoodCategory::Neutral
            .candidates()
            .contains(&evaluation.message.as_str()));
    }

    #[test]
    fn test_chaotic_wins_over_score() {
        let evaluator = ResponseEvaluator::new();
        let dizzy = "😵\u{200D}💫";
        let tally = evaluator.tally(&[dizzy, dizzy, "🙂", "✨", "🔥"]);
        assert_eq!(tally.score, 3);
        assert_eq!(tally.chaotic_count, 2);
        assert_eq!(tally.category(), MoodCategory::Chaotic);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let evaluator = ResponseEvaluator::new();
        // score 1 stays neutral, 2 tips over
        assert_eq!(evaluator.categorize(&["🙂"]), Some(MoodCategory::Neutral));
        assert_eq!(evaluator.categorize(&["🙂", "🔥"]), Some(MoodCategory::Positive));
        assert_eq!(evaluator.categorize(&["😔"]), Some(MoodCategory::Neutral));
        assert_eq!(evaluator.categorize(&["😔", "😤"]), Some(MoodCategory::Negative));
    }

    #[test]
    fn test_neutrals_only_take_slots() {
        let evaluator = ResponseEvaluator::new();
        let tally = evaluator.tally(&["😴", "💭", "🙂"]);
        assert_eq!(tally.score, 1);
        assert_eq!(tally.chaotic_count, 0);
        assert_eq!(tally.classified, 3);
    }

    #[test]
    fn test_single_chaotic_does_not_override() {
        let evaluator = ResponseEvaluator::new();
        let category = evaluator.categorize(&["😵\u{200D}💫", "😔", "😤", "🌧\u{FE0F}"]);
        assert_eq!(category, Some(MoodCategory::Negative));
    }

    #[test]
    fn test_near_miss_glyphs_are_ignored() {
        let evaluator = ResponseEvaluator::new();

        let tally = evaluator.tally(&["🌧", "🌧", " 🙂 "]);
        assert_eq!(tally.classified, 0);
        assert_eq!(tally.score, 0);
        assert_eq!(evaluator.categorize(&["🌧", "🌧"]), Some(MoodCategory::Neutral));

        let rain = "🌧\u{FE0F}";
        assert_eq!(evaluator.categorize(&[rain, rain]), Some(MoodCategory::Negative));
    }
}
