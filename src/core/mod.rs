//! Core modules for Midnight Dial

pub mod api;
pub mod dialer;
pub mod driver;
pub mod evaluator;
pub mod stroke;

pub use api::{create_router, run_server};
pub use dialer::{DialController, SettleOutcome, SubmitOutcome};
pub use driver::{DialDriver, StartedStroke};
pub use evaluator::ResponseEvaluator;
pub use stroke::{cubic_bezier_ease, rotation_to_stop, slot_angle, Spring, StrokePlan};
