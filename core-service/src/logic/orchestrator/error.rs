use serde::Serialize;
use thiserror::Error;

use super::transition::Operation;
use crate::logic::analysis::AnalysisError;
use crate::logic::session::SessionPhase;

/// Coarse error category for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InvalidTransition,
    Busy,
    Unreachable,
    BadResponse,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    Validation(String),

    #[error("cannot {operation} while in {phase}")]
    InvalidTransition {
        operation: Operation,
        phase: SessionPhase,
    },

    #[error("another request is still in progress")]
    Busy,

    #[error("{operation} failed: {source}")]
    Service {
        operation: Operation,
        #[source]
        source: AnalysisError,
    },
}

impl OrchestratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestratorError::Validation(_) => ErrorKind::Validation,
            OrchestratorError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            OrchestratorError::Busy => ErrorKind::Busy,
            OrchestratorError::Service { source: AnalysisError::Unreachable(_), .. } => ErrorKind::Unreachable,
            OrchestratorError::Service { source: AnalysisError::BadResponse(_), .. } => ErrorKind::BadResponse,
        }
    }

    /// Operation that failed at the service, if any
    pub fn failed_operation(&self) -> Option<Operation> {
        match self {
            OrchestratorError::Service { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
