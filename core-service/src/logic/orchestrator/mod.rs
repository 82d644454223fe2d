//! Orchestrator Module - Proctoring Session State Machine
//!
//! Drives one candidate through
//! `Registration -> BaselineCollection -> Instructions -> LiveTest -> Results`.
//!
//! # Architecture
//! - `transition.rs`: legal `(operation, phase)` pairs and their targets
//! - `error.rs`: `OrchestratorError` and its coarse `ErrorKind`
//!
//! # Failure Strategy
//! A failed service call leaves the phase where it was and writes the error
//! into the status message. Every transition can be retried.
//!
//! # Concurrency
//! One operation in flight per session. A second request while the first is
//! awaiting the service is rejected with `Busy`. Locks are never held across
//! an `.await`.

pub mod error;
pub mod transition;

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::logic::analysis::{AnalysisBackend, AnalysisError};
use crate::logic::report::{self, ReportView};
use crate::logic::session::{BaselineRecord, CandidateProfile, SessionPhase, SessionState};

pub use error::{ErrorKind, OrchestratorError};
pub use transition::Operation;

/// Read-only projection for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub phase: SessionPhase,
    pub status_message: String,
    pub busy: bool,
    pub candidate_name: Option<String>,
    pub baseline: BaselineRecord,
    pub has_report: bool,
}

/// Clears the busy flag however the operation exits.
///
/// If the operation is dropped mid-call the in-flight status message is
/// replaced by the one shown before it started.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a RwLock<SessionState>,
    restore: Option<String>,
}

impl BusyGuard<'_> {
    /// The service answered; keep whatever status the operation writes next
    fn settle(&mut self) {
        self.restore = None;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            log::warn!("Operation abandoned mid-call, restoring status");
            self.state.write().set_status(previous);
        }
        self.flag.store(false, Ordering::Release);
    }
}

pub struct SessionOrchestrator<C> {
    client: C,
    state: RwLock<SessionState>,
    busy: AtomicBool,
}

impl<C: AnalysisBackend> SessionOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: RwLock::new(SessionState::new()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ========================================================================
    // OBSERVERS
    // ========================================================================

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.state.read();
        SessionStatus {
            phase: state.phase,
            status_message: state.status_message.clone(),
            busy: self.is_busy(),
            candidate_name: state.candidate_name().map(str::to_string),
            baseline: state.baseline.clone(),
            has_report: state.report.is_some(),
        }
    }

    pub fn report(&self) -> ReportView {
        report::assemble(&self.state.read())
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Store the candidate, then start baseline collection.
    ///
    /// If the baseline call fails the profile stays stored and the session
    /// stays in `Registration`; retry with [`Self::begin_baseline`].
    pub async fn register(&self, profile: CandidateProfile) -> Result<SessionPhase, OrchestratorError> {
        let guard = self.acquire()?;

        {
            let mut state = self.state.write();
            transition::check(state.phase, Operation::Register)?;
            if state.candidate.is_some() {
                return Err(OrchestratorError::InvalidTransition {
                    operation: Operation::Register,
                    phase: state.phase,
                });
            }
            if let Some(field) = profile.missing_field() {
                let message = format!("{} is required", field);
                log::info!("Registration rejected: {}", message);
                state.set_status(format!("Error: {}", message));
                return Err(OrchestratorError::Validation(message));
            }

            log::info!(
                "Candidate registered: {} <{}> for {} (exam {})",
                profile.name, profile.email, profile.test_type.id(), profile.exam_code
            );
            state.attach_candidate(profile);
        }

        self.start_baseline_with(guard).await
    }

    /// Ask the service to start baseline collection. No-op once started.
    pub async fn begin_baseline(&self) -> Result<SessionPhase, OrchestratorError> {
        let guard = self.acquire()?;
        self.start_baseline_with(guard).await
    }

    async fn start_baseline_with(&self, mut guard: BusyGuard<'_>) -> Result<SessionPhase, OrchestratorError> {
        let operation = Operation::BeginBaseline;
        let key = {
            let mut state = self.state.write();
            if state.baseline.started {
                log::debug!("Baseline already started, ignoring");
                return Ok(state.phase);
            }
            transition::check(state.phase, operation)?;
            if state.candidate.is_none() {
                return Err(OrchestratorError::InvalidTransition { operation, phase: state.phase });
            }
            Self::mark_busy(&mut state, &mut guard, operation)
        };

        let result = self.client.start_baseline(&key).await;
        guard.settle();
        match result {
            Ok(ack) => {
                let mut state = self.state.write();
                state.baseline.mark_started();
                state.set_status(format!(
                    "Baseline started: {}",
                    ack.message.as_deref().unwrap_or("Baseline collection started")
                ));
                state.advance_to(SessionPhase::BaselineCollection);
                Ok(state.phase)
            }
            Err(e) => Err(self.record_failure(operation, e)),
        }
    }

    pub async fn complete_baseline(&self) -> Result<SessionPhase, OrchestratorError> {
        let operation = Operation::CompleteBaseline;
        let mut guard = self.acquire()?;
        let key = self.prepare(&mut guard, operation)?;

        let result = self.client.stop_baseline(&key).await;
        guard.settle();
        match result {
            Ok(reply) => {
                let mut state = self.state.write();
                state.baseline.mark_stopped(reply.data_points.unwrap_or_default());
                let samples = state.baseline.sample_count;
                state.set_status(format!(
                    "Baseline stopped: {}. {} data points collected.",
                    reply.message.as_deref().unwrap_or("Baseline collection completed"),
                    samples
                ));
                log::info!("Baseline frozen with {} samples", samples);
                state.advance_to(SessionPhase::Instructions);
                Ok(state.phase)
            }
            Err(e) => Err(self.record_failure(operation, e)),
        }
    }

    pub async fn start_test(&self) -> Result<SessionPhase, OrchestratorError> {
        let operation = Operation::StartTest;
        let mut guard = self.acquire()?;
        let key = self.prepare(&mut guard, operation)?;

        let result = self.client.start_test(&key).await;
        guard.settle();
        match result {
            Ok(ack) => {
                let mut state = self.state.write();
                state.set_status(format!(
                    "Test started: {}",
                    ack.message.as_deref().unwrap_or("Test started")
                ));
                state.advance_to(SessionPhase::LiveTest);
                Ok(state.phase)
            }
            Err(e) => Err(self.record_failure(operation, e)),
        }
    }

    /// End the test and store whatever report the service returns.
    ///
    /// A report without a suspicion level still completes the session.
    pub async fn end_test(&self) -> Result<SessionPhase, OrchestratorError> {
        let operation = Operation::EndTest;
        let mut guard = self.acquire()?;
        let key = self.prepare(&mut guard, operation)?;

        let result = self.client.end_test(&key).await;
        guard.settle();
        match result {
            Ok(report) => {
                let mut state = self.state.write();
                let status = match report.suspicion_level {
                    Some(level) => format!("Test completed. Suspicion level: {:.1}/10", level),
                    None => {
                        log::warn!("Analysis returned no suspicion level, report is degraded");
                        "Test completed. Results received.".to_string()
                    }
                };
                log::info!(
                    "Test ended: {} behaviors flagged, verdict {:?}",
                    report.behaviors.len(),
                    report.verdict
                );
                state.report = Some(report);
                state.completed_at = Some(Utc::now());
                state.set_status(status);
                state.advance_to(SessionPhase::Results);
                Ok(state.phase)
            }
            Err(e) => Err(self.record_failure(operation, e)),
        }
    }

    /// Discard everything and return to `Registration`
    pub fn reset(&self) -> Result<SessionPhase, OrchestratorError> {
        let _guard = self.acquire()?;
        let mut state = self.state.write();
        if *state != SessionState::default() {
            log::info!("Session reset from {}", state.phase);
        }
        *state = SessionState::new();
        Ok(state.phase)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn acquire(&self) -> Result<BusyGuard<'_>, OrchestratorError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard {
                flag: &self.busy,
                state: &self.state,
                restore: None,
            })
            .map_err(|_| {
                log::warn!("Rejected request: previous operation still in flight");
                OrchestratorError::Busy
            })
    }

    /// Check the transition table, show the busy message, return the request key
    fn prepare(&self, guard: &mut BusyGuard<'_>, operation: Operation) -> Result<String, OrchestratorError> {
        let mut state = self.state.write();
        transition::check(state.phase, operation)?;
        Ok(Self::mark_busy(&mut state, guard, operation))
    }

    fn mark_busy(state: &mut SessionState, guard: &mut BusyGuard<'_>, operation: Operation) -> String {
        if let Some(message) = operation.busy_message() {
            guard.restore = Some(std::mem::replace(&mut state.status_message, message.to_string()));
        }
        state.idempotency_key(operation.as_str())
    }

    fn record_failure(&self, operation: Operation, source: AnalysisError) -> OrchestratorError {
        log::warn!("{} failed: {}", operation, source);
        self.state.write().set_status(format!("Error: {}", source));
        OrchestratorError::Service { operation, source }
    }
}
