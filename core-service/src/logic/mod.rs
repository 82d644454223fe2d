//! Logic Module - Business Logic & Engines
//!
//! - `session/` - Candidate attempt data model
//! - `analysis/` - Behavior-analysis service client
//! - `orchestrator/` - Session state machine
//! - `report/` - Results view model

pub mod session;
pub mod analysis;
pub mod orchestrator;
pub mod report;
