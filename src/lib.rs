//! Midnight Dial: a rotary mood dial
//!
//! Stroke → DialController → ResponseEvaluator → terminal / HTTP output

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;

// =============================================================================
// SESSION LIMITS [C]
// =============================================================================

/// Hard cap on dialed symbols per session
pub const MAX_ENTRIES: usize = 5;

/// Length from which the line may hang up early
pub const MIN_EARLY_FINALIZE: usize = 3;

/// Chance of an early hang-up, rolled once per accepted symbol
pub const EARLY_FINALIZE_PROBABILITY: f64 = 0.3;

/// "Connecting" wait before the answer is computed (milliseconds)
pub const SETTLE_DELAY_MS: u64 = 2000;

// =============================================================================
// DIAL GEOMETRY [C]
// =============================================================================

/// Angle of the finger stop (degrees, 0 = three o'clock)
pub const STOP_ANGLE_DEG: f64 = 60.0;

/// Angle of slot 1
pub const SLOT_START_ANGLE_DEG: f64 = -45.0;

/// Angular distance between neighbouring slots
pub const SLOT_ANGLE_STEP_DEG: f64 = 30.0;

// =============================================================================
// STROKE TIMING [C]
// =============================================================================

/// Forward rotation to the stop (milliseconds)
pub const STROKE_FORWARD_MS: u64 = 800;

/// Pause at the stop before the spring return (milliseconds)
pub const STOP_HOLD_MS: u64 = 100;

/// Cubic Bézier control points (x1, y1, x2, y2) of the forward motion
pub const STROKE_EASE: [f64; 4] = [0.2, 0.8, 0.2, 1.0];

/// Return spring
pub const SPRING_MASS: f64 = 2.5;
pub const SPRING_STIFFNESS: f64 = 80.0;
pub const SPRING_DAMPING: f64 = 25.0;

/// Displacement (degrees) below which the dial counts as at rest
pub const SPRING_REST_DELTA: f64 = 0.001;

// =============================================================================
// TEXT
// =============================================================================

/// Answer for an empty line
pub const SILENT_LINE: &str = "The line is silent...";

pub const VERSION: &str = "0.1.0";
