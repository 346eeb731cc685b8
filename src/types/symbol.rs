//! Symbol catalog: the nine glyphs on the dial

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::types::MoodCategory;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// One dialable glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Position on the dial, 1-based, clockwise from the top right
    pub slot: usize,
    pub glyph: &'static str,
    pub category: MoodCategory,
    pub label: &'static str,
}

/// The dial, in slot order
pub static CATALOG: [Symbol; 9] = [
    Symbol { slot: 1, glyph: "🙂", category: MoodCategory::Positive, label: "Smile" },
    Symbol { slot: 2, glyph: "😔", category: MoodCategory::Negative, label: "Pensive" },
    Symbol { slot: 3, glyph: "😤", category: MoodCategory::Negative, label: "Frustrated" },
    Symbol { slot: 4, glyph: "😵\u{200D}💫", category: MoodCategory::Chaotic, label: "Dizzy" },
    Symbol { slot: 5, glyph: "😴", category: MoodCategory::Neutral, label: "Sleepy" },
    Symbol { slot: 6, glyph: "✨", category: MoodCategory::Positive, label: "Sparkles" },
    Symbol { slot: 7, glyph: "🌧\u{FE0F}", category: MoodCategory::Negative, label: "Rain" },
    Symbol { slot: 8, glyph: "🔥", category: MoodCategory::Positive, label: "Fire" },
    Symbol { slot: 9, glyph: "💭", category: MoodCategory::Neutral, label: "Thought" },
];

lazy_static! {
    static ref BY_GLYPH: HashMap<&'static str, &'static Symbol> =
        CATALOG.iter().map(|s| (s.glyph, s)).collect();

    // Typed input often drops emoji presentation selectors
    static ref BY_BARE_GLYPH: HashMap<String, &'static Symbol> = CATALOG
        .iter()
        .map(|s| (normalize(s.glyph), s))
        .collect();

    // Longest first so "😵‍💫" wins over a bare "😵" prefix
    static ref BY_LENGTH: Vec<&'static Symbol> = {
        let mut v: Vec<&'static Symbol> = CATALOG.iter().collect();
        v.sort_by(|a, b| b.glyph.len().cmp(&a.glyph.len()));
        v
    };
}

fn normalize(glyph: &str) -> String {
    glyph.chars().filter(|c| *c != VARIATION_SELECTOR_16).collect()
}

impl Symbol {
    /// Exact catalog glyph; anything else yields None
    pub fn lookup(glyph: &str) -> Option<&'static Symbol> {
        BY_GLYPH.get(glyph).copied()
    }

    /// Look up by 1-based slot number
    pub fn by_slot(slot: usize) -> Option<&'static Symbol> {
        slot.checked_sub(1).and_then(|i| CATALOG.get(i))
    }

    /// Look up by label, case-insensitive
    pub fn by_label(label: &str) -> Option<&'static Symbol> {
        let label = label.trim();
        CATALOG.iter().find(|s| s.label.eq_ignore_ascii_case(label))
    }

    /// Resolve user input: glyph, slot number or label
    pub fn resolve(input: &str) -> Option<&'static Symbol> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(symbol) = BY_BARE_GLYPH.get(&normalize(input)) {
            return Some(*symbol);
        }
        if let Ok(slot) = input.parse::<usize>() {
            return Self::by_slot(slot);
        }
        Self::by_label(input)
    }

    /// 0-based index on the dial
    pub fn index(&self) -> usize {
        self.slot - 1
    }
}

/// Split a run of glyphs typed without separators ("🙂✨🔥").
///
/// Returns None if any part of the run is not a catalog glyph.
pub fn split_glyph_run(run: &str) -> Option<Vec<&'static Symbol>> {
    let mut rest = run;
    let mut found = Vec::new();

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix(VARIATION_SELECTOR_16) {
            rest = stripped;
            continue;
        }
        let symbol = BY_LENGTH.iter().find(|s| {
            let bare = normalize(s.glyph);
            rest.starts_with(s.glyph) || rest.starts_with(bare.as_str())
        })?;
        let consumed = if rest.starts_with(symbol.glyph) {
            symbol.glyph.len()
        } else {
            normalize(symbol.glyph).len()
        };
        rest = &rest[consumed..];
        found.push(*symbol);
    }

    Some(found)
}

/// Resolve one typed token: a single symbol or a run of glyphs
pub fn resolve_token(token: &str) -> Option<Vec<&'static Symbol>> {
    match Symbol::resolve(token) {
        Some(symbol) => Some(vec![symbol]),
        None => split_glyph_run(token.trim()),
    }
}

/// Parse a dialed line into glyph strings.
///
/// Tokens are split on whitespace and commas. Each token may be a glyph, a
/// slot number, a label or a run of glyphs; anything else is kept verbatim
/// so the evaluator can ignore it.
pub fn parse_sequence(input: &str) -> Vec<String> {
    let mut glyphs = Vec::new();

    for token in input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match resolve_token(token) {
            Some(symbols) => glyphs.extend(symbols.iter().map(|s| s.glyph.to_string())),
            None => glyphs.push(token.to_string()),
        }
    }

    glyphs
}
