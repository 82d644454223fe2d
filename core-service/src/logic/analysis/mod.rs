//! Analysis Module - Behavior Analysis Service Boundary
//!
//! This module handles:
//! - The `AnalysisBackend` contract used by the orchestrator
//! - The HTTP implementation (start/stop baseline, start/end test)
//! - Decoding and range checks for service replies

pub mod client;
pub mod error;
pub mod types;

pub use client::{AnalysisBackend, AnalysisConfig, HttpAnalysisClient};
pub use error::AnalysisError;
pub use types::{Acknowledgement, StopBaselineResponse};
