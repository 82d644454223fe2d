use super::types::{BaselineRecord, CandidateProfile, SessionPhase, TestType};
use super::state::SessionState;

fn alice() -> CandidateProfile {
    CandidateProfile::new("Alice", "a@x.com", "pw", TestType::Algorithms, "EX1")
}

#[test]
fn test_new_state_is_registration_and_empty() {
    let s = SessionState::new();
    assert_eq!(s.phase, SessionPhase::Registration);
    assert!(s.candidate.is_none());
    assert!(s.report.is_none());
    assert!(s.session_key.is_none());
    assert_eq!(s.baseline, BaselineRecord::default());
    assert_eq!(s, SessionState::default());
}

#[test]
fn test_phase_order() {
    let mut phase = SessionPhase::Registration;
    let mut seen = vec![phase];
    while let Some(next) = phase.next() {
        seen.push(next);
        phase = next;
    }
    assert_eq!(
        seen,
        vec![
            SessionPhase::Registration,
            SessionPhase::BaselineCollection,
            SessionPhase::Instructions,
            SessionPhase::LiveTest,
            SessionPhase::Results,
        ]
    );
    assert!(SessionPhase::Results.is_terminal());
}

#[test]
fn test_advance_rejects_skips_and_backward_moves() {
    let mut s = SessionState::new();
    assert!(!s.advance_to(SessionPhase::Instructions));
    assert_eq!(s.phase, SessionPhase::Registration);

    assert!(s.advance_to(SessionPhase::BaselineCollection));
    assert!(!s.advance_to(SessionPhase::Registration));
    assert!(!s.advance_to(SessionPhase::BaselineCollection));
    assert_eq!(s.phase, SessionPhase::BaselineCollection);
}

#[test]
fn test_test_type_parsing() {
    assert_eq!("algorithms-test".parse::<TestType>().unwrap(), TestType::Algorithms);
    assert_eq!("Frontend".parse::<TestType>().unwrap(), TestType::Frontend);
    assert_eq!(" backend-test ".parse::<TestType>().unwrap(), TestType::Backend);
    assert!("".parse::<TestType>().is_err());
    assert!("devops".parse::<TestType>().is_err());
}

#[test]
fn test_missing_field_detection() {
    assert_eq!(alice().missing_field(), None);

    let mut p = alice();
    p.email = "   ".to_string();
    assert_eq!(p.missing_field(), Some("email"));

    let p = CandidateProfile::new("Alice", "a@x.com", "", TestType::Backend, "EX1");
    assert_eq!(p.missing_field(), Some("password"));

    let p = CandidateProfile::new("Alice", "a@x.com", "pw", TestType::Backend, "");
    assert_eq!(p.missing_field(), Some("exam code"));
}

#[test]
fn test_password_never_leaks() {
    let p = alice();
    let debug = format!("{:?}", p);
    assert!(!debug.contains("\"pw\""));
    assert!(debug.contains("Credential(***)"));

    let json = serde_json::to_value(&p).unwrap();
    assert!(json.get("password").is_none());
    assert_eq!(json["test_type"], "algorithms-test");
}

#[test]
fn test_baseline_frozen_once_stopped() {
    let mut b = BaselineRecord::default();
    b.mark_started();
    b.mark_stopped(42);
    b.mark_stopped(7);
    assert!(b.started && b.stopped);
    assert_eq!(b.sample_count, 42);
}

#[test]
fn test_idempotency_key_is_stable_per_session() {
    let mut s = SessionState::new();
    assert_eq!(s.idempotency_key("stop_baseline"), "unregistered-stop_baseline");

    let key = s.attach_candidate(alice());
    assert_eq!(s.idempotency_key("stop_baseline"), format!("{}-stop_baseline", key));
    assert_eq!(s.idempotency_key("stop_baseline"), s.idempotency_key("stop_baseline"));
    assert_ne!(s.idempotency_key("stop_baseline"), s.idempotency_key("end_test"));
    assert_eq!(s.candidate_name(), Some("Alice"));
}
