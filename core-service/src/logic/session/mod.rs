//! Session Module - Candidate Attempt Data Model
//!
//! Pure state for one candidate's exam attempt. No I/O happens here.
//!
//! # Architecture
//! - `types.rs`: `SessionPhase`, `CandidateProfile`, `BaselineRecord`, `SuspicionReport`
//! - `state.rs`: `SessionState` aggregate

pub mod types;
pub mod state;
#[cfg(test)]
mod tests;

pub use types::{
    Behavior, BaselineRecord, CandidateProfile, Credential, SessionPhase, SuspicionReport,
    TestType, UnknownTestType,
};
pub use state::SessionState;
