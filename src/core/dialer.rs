//! Dial Controller: synchronous state machine behind the dial
//!
//! Transitions:
//! - begin_stroke: refused while a stroke moves or the line is locked/answered/full
//! - stroke_reached_stop → submit: append, then cap / early roll / continue
//! - finalize: lock, issue a PendingEvaluation for the current epoch
//! - settle: apply the answer only if the epoch is unchanged
//! - reset: new epoch, empty session, stroke slot freed
//!
//! No timers live here; the driver calls in at stop, release and settle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::DialConfig;
use crate::core::ResponseEvaluator;
use crate::error::DialError;
use crate::types::{
    DialOutput, DialPhase, DialSession, PendingEvaluation, ReasonCode, StrokeTicket, Symbol,
};

/// Result of offering a symbol to the session
#[derive(Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub accepted: bool,
    /// Rejection reason, or the termination decision when accepted
    pub reason: ReasonCode,
    /// Issued when this submission closed the line
    pub pending: Option<PendingEvaluation>,
    pub entry_count: usize,
}

impl SubmitOutcome {
    fn rejected(reason: ReasonCode, entry_count: usize) -> Self {
        Self {
            accepted: false,
            reason,
            pending: None,
            entry_count,
        }
    }
}

/// Result of presenting a pending evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleOutcome {
    pub reason: ReasonCode,
    /// The stored answer, None when the ticket was stale
    pub response: Option<String>,
}

/// Dial state machine
#[derive(Debug)]
pub struct DialController<R = StdRng> {
    config: DialConfig,
    session: DialSession,
    /// Bumped by reset; tickets from older epochs are stale
    epoch: u64,
    stroke: Option<StrokeTicket>,
    /// Current stroke already reached the stop
    stroke_dialed: bool,
    next_stroke_id: u64,
    evaluator: ResponseEvaluator,
    rng: R,
    /// Accepted symbols over the controller's lifetime
    dial_count: u64,
}

impl DialController<StdRng> {
    /// Controller seeded from `config.seed`, or from entropy
    pub fn from_config(config: DialConfig) -> Result<Self, DialError> {
        let rng = config.rng();
        Self::with_rng(config, rng)
    }
}

impl Default for DialController<StdRng> {
    fn default() -> Self {
        Self::build(DialConfig::default(), StdRng::from_entropy())
    }
}

impl<R: Rng> DialController<R> {
    /// Controller drawing early hang-ups and answers from `rng`.
    ///
    /// Fails on a config `DialConfig::validate` rejects.
    pub fn with_rng(config: DialConfig, rng: R) -> Result<Self, DialError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: DialConfig, rng: R) -> Self {
        Self {
            config,
            session: DialSession::new(),
            epoch: 0,
            stroke: None,
            stroke_dialed: false,
            next_stroke_id: 0,
            evaluator: ResponseEvaluator::new(),
            rng,
            dial_count: 0,
        }
    }

    /// Why a symbol would be refused right now, ignoring strokes
    fn session_gate(&self) -> Result<(), ReasonCode> {
        if self.session.is_finalized() {
            return Err(ReasonCode::D001_REJECTED_FINALIZED);
        }
        if self.session.is_locked() {
            return Err(ReasonCode::D001_REJECTED_LOCKED);
        }
        if self.session.len() >= self.config.max_entries {
            return Err(ReasonCode::D001_REJECTED_FULL);
        }
        Ok(())
    }

    /// Check whether new input can be taken (policy check only)
    pub fn can_dial(&self) -> Result<(), ReasonCode> {
        self.session_gate()?;
        if self.stroke.is_some() {
            return Err(ReasonCode::D001_REJECTED_STROKE_BUSY);
        }
        Ok(())
    }

    pub fn input_locked(&self) -> bool {
        self.can_dial().is_err()
    }

    /// Offer a symbol directly, without a stroke.
    ///
    /// A no-op (reported, not an error) while locked, answered, full or while
    /// a stroke is moving.
    pub fn submit(&mut self, symbol: &'static Symbol) -> SubmitOutcome {
        if let Err(reason) = self.can_dial() {
            debug!(glyph = symbol.glyph, reason = reason.code(), "submit refused");
            return SubmitOutcome::rejected(reason, self.session.len());
        }
        self.accept(symbol)
    }

    fn accept(&mut self, symbol: &'static Symbol) -> SubmitOutcome {
        if let Err(reason) = self.session_gate() {
            debug!(glyph = symbol.glyph, reason = reason.code(), "submit refused");
            return SubmitOutcome::rejected(reason, self.session.len());
        }

        self.session.push(symbol);
        self.dial_count += 1;
        let reason = self.termination();
        let entry_count = self.session.len();

        debug!(
            glyph = symbol.glyph,
            entries = entry_count,
            decision = reason.code(),
            "symbol accepted"
        );

        let pending = match reason {
            ReasonCode::D002_FINALIZE_AT_CAP | ReasonCode::D002_FINALIZE_EARLY => {
                Some(self.begin_finalize())
            }
            _ => None,
        };

        SubmitOutcome {
            accepted: true,
            reason,
            pending,
            entry_count,
        }
    }

    /// Cap first, then one Bernoulli roll per accepted symbol
    fn termination(&mut self) -> ReasonCode {
        let len = self.session.len();
        if len >= self.config.max_entries {
            ReasonCode::D002_FINALIZE_AT_CAP
        } else if len >= self.config.min_early_finalize
            && self.rng.gen_bool(self.config.early_finalize_probability)
        {
            ReasonCode::D002_FINALIZE_EARLY
        } else {
            ReasonCode::D002_CONTINUE_DIALING
        }
    }

    fn begin_finalize(&mut self) -> PendingEvaluation {
        self.session.lock();
        info!(
            epoch = self.epoch,
            entries = self.session.len(),
            "line closed, connecting"
        );
        PendingEvaluation {
            epoch: self.epoch,
            entry_count: self.session.len(),
        }
    }

    /// Claim the stroke slot for a symbol; input stays locked until release
    pub fn begin_stroke(&mut self, symbol: &'static Symbol) -> Result<StrokeTicket, ReasonCode> {
        self.can_dial()?;

        self.next_stroke_id += 1;
        let ticket = StrokeTicket {
            id: self.next_stroke_id,
            epoch: self.epoch,
            symbol,
        };
        self.stroke = Some(ticket);
        self.stroke_dialed = false;
        debug!(stroke = ticket.id, glyph = symbol.glyph, "stroke started");
        Ok(ticket)
    }

    fn is_current_stroke(&self, ticket: &StrokeTicket) -> bool {
        ticket.epoch == self.epoch && self.stroke.as_ref() == Some(ticket)
    }

    /// The dial hit the finger stop: the stroke's symbol is dialed now
    pub fn stroke_reached_stop(&mut self, ticket: StrokeTicket) -> SubmitOutcome {
        if !self.is_current_stroke(&ticket) || self.stroke_dialed {
            debug!(stroke = ticket.id, "stale stroke reached stop");
            return SubmitOutcome::rejected(ReasonCode::D003_STROKE_STALE, self.session.len());
        }
        self.stroke_dialed = true;
        self.accept(ticket.symbol)
    }

    /// The dial is back at rest: free the stroke slot
    pub fn release_stroke(&mut self, ticket: StrokeTicket) -> ReasonCode {
        if !self.is_current_stroke(&ticket) {
            return ReasonCode::D003_STROKE_STALE;
        }
        self.stroke = None;
        debug!(stroke = ticket.id, "stroke released");
        ReasonCode::D003_STROKE_RELEASED
    }

    /// Settle delay elapsed: evaluate the full line unless the session was reset
    pub fn settle(&mut self, pending: PendingEvaluation) -> SettleOutcome {
        if pending.epoch != self.epoch || !self.session.is_locked() || self.session.is_finalized()
        {
            info!(
                ticket_epoch = pending.epoch,
                epoch = self.epoch,
                "stale evaluation discarded"
            );
            return SettleOutcome {
                reason: ReasonCode::D004_RESULT_STALE,
                response: None,
            };
        }

        let glyphs = self.session.glyphs();
        let evaluation = self.evaluator.evaluate(&glyphs, &mut self.rng);
        info!(
            epoch = self.epoch,
            category = ?evaluation.category,
            score = evaluation.tally.score,
            chaotic = evaluation.tally.chaotic_count,
            "answer ready"
        );
        self.session.finalize(evaluation.message.clone());

        SettleOutcome {
            reason: ReasonCode::D004_RESULT_APPLIED,
            response: Some(evaluation.message),
        }
    }

    /// Hang up: discard everything, whatever is in flight
    pub fn reset(&mut self) -> ReasonCode {
        self.epoch += 1;
        self.session = DialSession::new();
        self.stroke = None;
        self.stroke_dialed = false;
        info!(epoch = self.epoch, "hung up");
        ReasonCode::D005_RESET
    }

    pub fn session(&self) -> &DialSession {
        &self.session
    }

    pub fn phase(&self) -> DialPhase {
        self.session.phase()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn config(&self) -> &DialConfig {
        &self.config
    }

    pub fn stroke_in_flight(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn dial_count(&self) -> u64 {
        self.dial_count
    }

    /// Snapshot tagged with `reason`
    pub fn output(&self, reason: ReasonCode) -> DialOutput {
        DialOutput::new(
            self.epoch,
            self.session.phase(),
            self.session.glyphs().into_iter().map(String::from).collect(),
            self.input_locked(),
            self.session.is_idle(),
            self.session.response().map(String::from),
            reason,
        )
    }

    /// Get current output without updating
    pub fn current_output(&self) -> DialOutput {
        self.output(ReasonCode::D005_STATE_MAINTAINED)
    }
}

// =============================================================================
// TESTS
// =============================================================================
