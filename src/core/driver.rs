//! Dial Driver: runs stroke and settle timings on tokio
//!
//! The controller stays synchronous; the driver only calls into it at
//! stroke-reached-stop, stroke-released and settle-elapsed, and publishes a
//! `DialOutput` after each call.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::{broadcast, Mutex};
use tokio::time::sleep;
use tracing::debug;

use crate::config::DialConfig;
use crate::core::{DialController, StrokePlan};
use crate::error::DialError;
use crate::types::{DialOutput, PendingEvaluation, ReasonCode, StrokeTicket, Symbol};

const UPDATE_CAPACITY: usize = 64;

/// A stroke the driver has started
#[derive(Debug, Clone, Copy)]
pub struct StartedStroke {
    pub ticket: StrokeTicket,
    pub plan: StrokePlan,
}

/// Async front of one dial session
#[derive(Debug)]
pub struct DialDriver<R = StdRng> {
    controller: Arc<Mutex<DialController<R>>>,
    config: DialConfig,
    updates: broadcast::Sender<DialOutput>,
}

impl<R> Clone for DialDriver<R> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            config: self.config.clone(),
            updates: self.updates.clone(),
        }
    }
}

impl DialDriver<StdRng> {
    pub fn from_config(config: DialConfig) -> Result<Self, DialError> {
        DialController::from_config(config).map(Self::new)
    }
}

impl<R: Rng + Send + 'static> DialDriver<R> {
    pub fn new(controller: DialController<R>) -> Self {
        let config = controller.config().clone();
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            controller: Arc::new(Mutex::new(controller)),
            config,
            updates,
        }
    }

    /// Live snapshots, one per transition
    pub fn subscribe(&self) -> broadcast::Receiver<DialOutput> {
        self.updates.subscribe()
    }

    fn publish(&self, output: DialOutput) {
        // no subscribers is fine
        let _ = self.updates.send(output);
    }

    /// Start a stroke for `symbol`.
    ///
    /// Returns at once; the symbol is dialed when the stroke reaches the stop.
    pub async fn dial(&self, symbol: &'static Symbol) -> Result<StartedStroke, ReasonCode> {
        let ticket = {
            let mut controller = self.controller.lock().await;
            let ticket = controller.begin_stroke(symbol)?;
            self.publish(controller.output(ReasonCode::D003_STROKE_STARTED));
            ticket
        };

        let plan = StrokePlan::for_symbol(symbol, &self.config.stroke);
        let driver = self.clone();
        tokio::spawn(async move {
            driver.run_stroke(ticket, plan).await;
        });

        Ok(StartedStroke { ticket, plan })
    }

    async fn run_stroke(&self, ticket: StrokeTicket, plan: StrokePlan) {
        sleep(plan.time_to_stop()).await;

        let pending = {
            let mut controller = self.controller.lock().await;
            let outcome = controller.stroke_reached_stop(ticket);
            if outcome.reason == ReasonCode::D003_STROKE_STALE {
                debug!(stroke = ticket.id, "stroke reached stop after reset");
            } else {
                self.publish(controller.output(outcome.reason));
            }
            outcome.pending
        };

        if let Some(pending) = pending {
            let driver = self.clone();
            tokio::spawn(async move {
                driver.run_settle(pending).await;
            });
        }

        sleep(plan.time_to_release()).await;

        let mut controller = self.controller.lock().await;
        let reason = controller.release_stroke(ticket);
        if reason == ReasonCode::D003_STROKE_RELEASED {
            self.publish(controller.output(reason));
        } else {
            debug!(stroke = ticket.id, "stroke outlived its session");
        }
    }

    async fn run_settle(&self, pending: PendingEvaluation) {
        sleep(self.config.settle_delay()).await;

        let mut controller = self.controller.lock().await;
        let outcome = controller.settle(pending);
        if outcome.reason == ReasonCode::D004_RESULT_APPLIED {
            self.publish(controller.output(outcome.reason));
        }
    }

    /// Hang up immediately; in-flight strokes and evaluations go stale
    pub async fn reset(&self) -> DialOutput {
        let mut controller = self.controller.lock().await;
        let reason = controller.reset();
        let output = controller.output(reason);
        self.publish(output.clone());
        output
    }

    pub async fn snapshot(&self) -> DialOutput {
        self.controller.lock().await.current_output()
    }

    pub fn config(&self) -> &DialConfig {
        &self.config
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DialPhase, CATALOG};
    use rand::SeedableRng;
    use std::time::Duration;

    fn driver(p: f64) -> DialDriver {
        let config = DialConfig {
            early_finalize_probability: p,
            ..DialConfig::default()
        };
        DialDriver::new(DialController::with_rng(config, StdRng::seed_from_u64(1)).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_symbol_lands_at_stop() {
        let d = driver(0.0);
        let started = d.dial(&CATALOG[0]).await.unwrap();

        assert!(d.snapshot().await.glyphs.is_empty());
        assert!(d.snapshot().await.input_locked);

        sleep(started.plan.time_to_stop() + Duration::from_millis(1)).await;
        let output = d.snapshot().await;
        assert_eq!(output.glyphs, vec![CATALOG[0].glyph.to_string()]);
        assert!(output.input_locked);

        sleep(started.plan.time_to_release()).await;
        assert!(!d.snapshot().await.input_locked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_dial_refused_mid_stroke() {
        let d = driver(0.0);
        d.dial(&CATALOG[0]).await.unwrap();
        let refused = d.dial(&CATALOG[1]).await.unwrap_err();
        assert_eq!(refused, ReasonCode::D001_REJECTED_STROKE_BUSY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_are_published() {
        let d = driver(0.0);
        let mut rx = d.subscribe();
        d.dial(&CATALOG[4]).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().reason, ReasonCode::D003_STROKE_STARTED);
        assert_eq!(rx.recv().await.unwrap().reason, ReasonCode::D002_CONTINUE_DIALING);
        assert_eq!(rx.recv().await.unwrap().reason, ReasonCode::D003_STROKE_RELEASED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_mid_settle_discards_answer() {
        let d = driver(1.0);
        for symbol in &CATALOG[0..2] {
            let started = d.dial(symbol).await.unwrap();
            sleep(started.plan.total() + Duration::from_millis(1)).await;
        }
        let started = d.dial(&CATALOG[2]).await.unwrap();
        sleep(started.plan.time_to_stop() + Duration::from_millis(1)).await;
        assert_eq!(d.snapshot().await.phase, DialPhase::Connecting);

        d.reset().await;
        sleep(d.config().settle_delay() * 2).await;

        let output = d.snapshot().await;
        assert_eq!(output.phase, DialPhase::Idle);
        assert!(output.glyphs.is_empty());
        assert_eq!(output.response, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_stroke_publishes_nothing() {
        let d = driver(0.0);
        let mut rx = d.subscribe();
        let started = d.dial(&CATALOG[6]).await.unwrap();
        sleep(started.plan.time_to_stop() / 2).await;
        d.reset().await;

        sleep(started.plan.total() + Duration::from_millis(1)).await;
        let mut reasons = Vec::new();
        while let Ok(update) = rx.try_recv() {
            reasons.push(update.reason);
        }
        assert_eq!(
            reasons,
            vec![ReasonCode::D003_STROKE_STARTED, ReasonCode::D005_RESET]
        );
    }
}
