//! Transition table.
//!
//! Which operation may run in which phase, and where it leads. The
//! orchestrator consults this before touching the analysis service.

use std::fmt;

use serde::Serialize;

use super::error::OrchestratorError;
use crate::logic::session::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Register,
    BeginBaseline,
    CompleteBaseline,
    StartTest,
    EndTest,
    Reset,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Register,
        Operation::BeginBaseline,
        Operation::CompleteBaseline,
        Operation::StartTest,
        Operation::EndTest,
        Operation::Reset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::BeginBaseline => "start_baseline",
            Operation::CompleteBaseline => "stop_baseline",
            Operation::StartTest => "start_test",
            Operation::EndTest => "end_test",
            Operation::Reset => "reset",
        }
    }

    /// Status shown while the service call is in flight
    pub fn busy_message(self) -> Option<&'static str> {
        match self {
            Operation::BeginBaseline => Some("Starting baseline collection..."),
            Operation::CompleteBaseline => Some("Stopping baseline collection..."),
            Operation::StartTest => Some("Starting test..."),
            Operation::EndTest => Some("Ending test and analyzing results..."),
            Operation::Register | Operation::Reset => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase reached when `operation` succeeds from `phase`, `None` if illegal.
///
/// `Register` is a compound step whose success lands in `BaselineCollection`.
pub fn target(phase: SessionPhase, operation: Operation) -> Option<SessionPhase> {
    use Operation::*;
    use SessionPhase::*;

    match (operation, phase) {
        (Reset, _) => Some(Registration),
        (Register, Registration) => Some(BaselineCollection),
        (BeginBaseline, Registration) => Some(BaselineCollection),
        (CompleteBaseline, BaselineCollection) => Some(Instructions),
        (StartTest, Instructions) => Some(LiveTest),
        (EndTest, LiveTest) => Some(Results),
        _ => None,
    }
}

pub fn check(phase: SessionPhase, operation: Operation) -> Result<SessionPhase, OrchestratorError> {
    target(phase, operation).ok_or(OrchestratorError::InvalidTransition { operation, phase })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASES: [SessionPhase; 5] = [
        SessionPhase::Registration,
        SessionPhase::BaselineCollection,
        SessionPhase::Instructions,
        SessionPhase::LiveTest,
        SessionPhase::Results,
    ];

    #[test]
    fn test_every_non_reset_edge_is_a_single_forward_step() {
        for op in Operation::ALL {
            if op == Operation::Reset {
                continue;
            }
            for phase in PHASES {
                if let Some(to) = target(phase, op) {
                    assert_eq!(phase.next(), Some(to), "{} from {}", op, phase);
                }
            }
        }
    }

    #[test]
    fn test_reset_is_legal_everywhere() {
        for phase in PHASES {
            assert_eq!(target(phase, Operation::Reset), Some(SessionPhase::Registration));
        }
    }

    #[test]
    fn test_results_is_terminal() {
        for op in Operation::ALL {
            if op != Operation::Reset {
                assert_eq!(target(SessionPhase::Results, op), None);
            }
        }
    }

    #[test]
    fn test_check_reports_operation_and_phase() {
        match check(SessionPhase::Instructions, Operation::EndTest) {
            Err(OrchestratorError::InvalidTransition { operation, phase }) => {
                assert_eq!(operation, Operation::EndTest);
                assert_eq!(phase, SessionPhase::Instructions);
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
        assert_eq!(
            check(SessionPhase::Instructions, Operation::StartTest).unwrap(),
            SessionPhase::LiveTest
        );
    }
}
