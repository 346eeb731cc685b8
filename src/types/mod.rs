//! Core types for Midnight Dial

mod category;
mod evaluation;
mod output;
mod phase;
mod reason;
mod session;
mod symbol;

pub use category::MoodCategory;
pub use evaluation::{Evaluation, Tally};
pub use output::DialOutput;
pub use phase::DialPhase;
pub use reason::ReasonCode;
pub use session::{DialSession, PendingEvaluation, StrokeTicket};
pub use symbol::{parse_sequence, resolve_token, split_glyph_run, Symbol, CATALOG};
