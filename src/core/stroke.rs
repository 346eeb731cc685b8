//! Stroke geometry: how far the dial turns for a slot, and where it is at time t.
//!
//! A stroke is forward (eased) → hold at the stop → spring return. Only the
//! timings matter to the controller; `angle_at` exists for renderers.

use std::time::Duration;

use crate::config::StrokeTiming;
use crate::types::Symbol;
use crate::{
    SLOT_ANGLE_STEP_DEG, SLOT_START_ANGLE_DEG, SPRING_DAMPING, SPRING_MASS, SPRING_REST_DELTA,
    SPRING_STIFFNESS, STOP_ANGLE_DEG, STROKE_EASE,
};

/// Resting angle of a slot (0-based index)
pub fn slot_angle(index: usize) -> f64 {
    SLOT_START_ANGLE_DEG - index as f64 * SLOT_ANGLE_STEP_DEG
}

/// Rotation that carries a slot onto the finger stop
pub fn rotation_to_stop(index: usize) -> f64 {
    STOP_ANGLE_DEG - slot_angle(index)
}

/// Cubic Bézier easing through (0,0), (x1,y1), (x2,y2), (1,1), sampled at progress x
pub fn cubic_bezier_ease(x: f64, [x1, y1, x2, y2]: [f64; 4]) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let bezier = |t: f64, p1: f64, p2: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    };

    // x(t) is monotonic for control x in [0, 1]
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..48 {
        let mid = (lo + hi) / 2.0;
        if bezier(mid, x1, x2) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    bezier((lo + hi) / 2.0, y1, y2)
}

/// Damped return spring starting at rest velocity
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            mass: SPRING_MASS,
            stiffness: SPRING_STIFFNESS,
            damping: SPRING_DAMPING,
        }
    }
}

impl Spring {
    fn decay(&self) -> f64 {
        self.damping / (2.0 * self.mass)
    }

    fn natural(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Displacement at time t for initial displacement x0
    pub fn displacement(&self, x0: f64, t: f64) -> f64 {
        let decay = self.decay();
        let omega = self.natural();

        if decay < omega {
            let damped = (omega * omega - decay * decay).sqrt();
            x0 * (-decay * t).exp() * ((damped * t).cos() + decay / damped * (damped * t).sin())
        } else {
            // critically damped; over-damped springs are not configured
            x0 * (-omega * t).exp() * (1.0 + omega * t)
        }
    }

    /// Time until the displacement envelope stays below `rest_delta`
    pub fn settle_time(&self, x0: f64, rest_delta: f64) -> Duration {
        let amplitude = x0.abs();
        if amplitude <= rest_delta {
            return Duration::ZERO;
        }

        let decay = self.decay();
        let omega = self.natural();
        let secs = if decay < omega {
            let damped = (omega * omega - decay * decay).sqrt();
            let envelope = amplitude * (1.0 + (decay / damped).powi(2)).sqrt();
            (envelope / rest_delta).ln() / decay
        } else {
            // (1 + ωt)e^(-ωt) ≤ 2e^(-ωt/2)
            (2.0 * amplitude / rest_delta).ln() * 2.0 / omega
        };

        Duration::from_millis((secs * 1000.0).ceil() as u64)
    }
}

/// Timeline of one stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePlan {
    pub index: usize,
    /// Degrees turned to reach the stop
    pub rotation_deg: f64,
    pub forward: Duration,
    pub hold: Duration,
    pub spring_back: Duration,
}

impl StrokePlan {
    pub fn for_symbol(symbol: &Symbol, timing: &StrokeTiming) -> Self {
        Self::for_index(symbol.index(), timing)
    }

    pub fn for_index(index: usize, timing: &StrokeTiming) -> Self {
        let rotation_deg = rotation_to_stop(index);
        Self {
            index,
            rotation_deg,
            forward: Duration::from_millis(timing.forward_ms),
            hold: Duration::from_millis(timing.hold_ms),
            spring_back: Spring::default().settle_time(rotation_deg, SPRING_REST_DELTA),
        }
    }

    /// When the symbol is dialed
    pub fn time_to_stop(&self) -> Duration {
        self.forward
    }

    /// From leaving the stop to rest
    pub fn time_to_release(&self) -> Duration {
        self.hold + self.spring_back
    }

    pub fn total(&self) -> Duration {
        self.forward + self.hold + self.spring_back
    }

    /// Dial rotation (degrees) at `elapsed` since the stroke began
    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        if elapsed < self.forward {
            let progress = elapsed.as_secs_f64() / self.forward.as_secs_f64();
            return self.rotation_deg * cubic_bezier_ease(progress, STROKE_EASE);
        }
        if elapsed < self.forward + self.hold {
            return self.rotation_deg;
        }
        if elapsed >= self.total() {
            return 0.0;
        }
        let t = (elapsed - self.forward - self.hold).as_secs_f64();
        Spring::default().displacement(self.rotation_deg, t)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_angles() {
        assert_eq!(slot_angle(0), -45.0);
        assert_eq!(slot_angle(8), -285.0);
        assert_eq!(rotation_to_stop(0), 105.0);
        assert_eq!(rotation_to_stop(8), 345.0);
    }

    #[test]
    fn test_ease_endpoints_and_shape() {
        assert_eq!(cubic_bezier_ease(0.0, STROKE_EASE), 0.0);
        assert_eq!(cubic_bezier_ease(1.0, STROKE_EASE), 1.0);
        // heavy start, slow landing
        assert!(cubic_bezier_ease(0.5, STROKE_EASE) > 0.9);
    }

    #[test]
    fn test_linear_ease_is_identity() {
        let linear = [0.25, 0.25, 0.75, 0.75];
        for x in [0.1, 0.3, 0.5, 0.9] {
            assert!((cubic_bezier_ease(x, linear) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_spring_settles() {
        let spring = Spring::default();
        let settle = spring.settle_time(345.0, SPRING_REST_DELTA);
        assert!(settle > Duration::from_secs(1));
        assert!(settle < Duration::from_secs(5));
        assert!(spring.displacement(345.0, settle.as_secs_f64()).abs() < SPRING_REST_DELTA);
        assert_eq!(spring.settle_time(0.0, SPRING_REST_DELTA), Duration::ZERO);
    }

    #[test]
    fn test_stroke_timeline() {
        let plan = StrokePlan::for_index(3, &StrokeTiming::default());
        assert_eq!(plan.angle_at(Duration::ZERO), 0.0);
        assert_eq!(plan.angle_at(plan.forward), plan.rotation_deg);
        assert_eq!(
            plan.angle_at(plan.forward + plan.hold / 2),
            plan.rotation_deg
        );
        assert_eq!(plan.angle_at(plan.total()), 0.0);

        let mid_return = plan.angle_at(plan.forward + plan.hold + Duration::from_millis(200));
        assert!(mid_return < plan.rotation_deg);
    }

    #[test]
    fn test_farther_slots_take_longer_to_return() {
        let timing = StrokeTiming::default();
        let near = StrokePlan::for_index(0, &timing);
        let far = StrokePlan::for_index(8, &timing);
        assert!(far.spring_back >= near.spring_back);
        assert_eq!(near.time_to_stop(), far.time_to_stop());
    }
}
