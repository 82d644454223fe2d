use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::types::{BaselineRecord, CandidateProfile, SessionPhase, SuspicionReport};

/// Everything known about one candidate's exam attempt.
///
/// Only the orchestrator mutates this; renderers get clones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub candidate: Option<CandidateProfile>,
    pub phase: SessionPhase,
    pub baseline: BaselineRecord,
    pub report: Option<SuspicionReport>,
    pub status_message: String,

    /// Assigned at registration, prefixes every idempotency key
    pub session_key: Option<Uuid>,
    pub registered_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next phase. Only the immediate successor is accepted.
    pub fn advance_to(&mut self, phase: SessionPhase) -> bool {
        if self.phase.next() != Some(phase) {
            log::error!("Refusing phase change {} -> {}", self.phase, phase);
            return false;
        }
        log::info!("Session phase {} -> {}", self.phase, phase);
        self.phase = phase;
        true
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn candidate_name(&self) -> Option<&str> {
        self.candidate.as_ref().map(|c| c.name.as_str())
    }

    /// Store the profile and hand out a fresh session key
    pub(crate) fn attach_candidate(&mut self, profile: CandidateProfile) -> Uuid {
        let key = Uuid::new_v4();
        self.candidate = Some(profile);
        self.session_key = Some(key);
        self.registered_at = Some(Utc::now());
        key
    }

    /// Idempotency key for one kind of request within this session
    pub fn idempotency_key(&self, operation: &str) -> String {
        match self.session_key {
            Some(key) => format!("{}-{}", key, operation),
            None => format!("unregistered-{}", operation),
        }
    }
}
