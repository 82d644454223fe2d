//! Proctor Core - Proctoring Session Orchestrator
//!
//! Sequences a candidate through registration, baseline calibration,
//! instructions, the monitored test and the final report, coordinating with
//! an external behavior-analysis service over HTTP.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::analysis::{AnalysisBackend, AnalysisConfig, AnalysisError, HttpAnalysisClient};
pub use logic::orchestrator::{ErrorKind, Operation, OrchestratorError, SessionOrchestrator, SessionStatus};
pub use logic::report::{assemble, ReportView, SeverityBand};
pub use logic::session::{CandidateProfile, SessionPhase, SessionState, SuspicionReport, TestType};
