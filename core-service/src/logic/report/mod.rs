//! Report Module - Final Candidate Report
//!
//! Builds the results-screen view model from a session snapshot.
//! Classification only; the service's score is never altered.

use std::fmt;

use serde::Serialize;

use crate::logic::session::{Behavior, SessionState};

const LOW_UPPER: f64 = 3.0;
const HIGH_LOWER: f64 = 7.0;
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    /// Service sent no level. Never shown as `Low`.
    Unknown,
}

impl SeverityBand {
    pub fn classify(level: Option<f64>) -> Self {
        match level {
            None => SeverityBand::Unknown,
            Some(l) if l < LOW_UPPER => SeverityBand::Low,
            Some(l) if l < HIGH_LOWER => SeverityBand::Medium,
            Some(_) => SeverityBand::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Low => "low",
            SeverityBand::Medium => "medium",
            SeverityBand::High => "high",
            SeverityBand::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub candidate_name: Option<String>,
    pub exam_code: Option<String>,
    pub test_type: Option<String>,
    pub baseline_samples: u64,

    pub suspicion_level: Option<f64>,
    pub suspicion_display: String,
    /// Width of the score bar, 0-100
    pub suspicion_percent: Option<f64>,
    pub severity: SeverityBand,

    /// In the order the service reported them
    pub behaviors: Vec<Behavior>,
    pub time_spent_minutes: f64,
    pub code_correctness: String,
    pub code_efficiency: String,
    pub verdict: Option<String>,
    pub conclusion: Option<String>,
}

/// Build the report view. Pure; works for any phase.
pub fn assemble(state: &SessionState) -> ReportView {
    let candidate = state.candidate.as_ref();
    let report = state.report.as_ref();
    let level = report.and_then(|r| r.suspicion_level);

    ReportView {
        candidate_name: candidate.map(|c| c.name.clone()),
        exam_code: candidate.map(|c| c.exam_code.clone()),
        test_type: candidate.map(|c| c.test_type.label().to_string()),
        baseline_samples: state.baseline.sample_count,

        suspicion_level: level,
        suspicion_display: match level {
            Some(l) => format!("{:.1}/10", l),
            None => "unknown".to_string(),
        },
        suspicion_percent: level.map(|l| l * 10.0),
        severity: SeverityBand::classify(level),

        behaviors: report.map(|r| r.behaviors.clone()).unwrap_or_default(),
        time_spent_minutes: report.map(|r| r.time_spent_minutes).unwrap_or(0.0),
        code_correctness: report
            .and_then(|r| r.code_correctness.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        code_efficiency: report
            .and_then(|r| r.code_efficiency.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        verdict: report.and_then(|r| r.verdict.clone()),
        conclusion: report.and_then(|r| r.conclusion.clone()),
    }
}

/// Plain-text rendering for terminals
impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Results")?;
        if let Some(name) = &self.candidate_name {
            writeln!(f, "Candidate: {}", name)?;
        }
        if let Some(test_type) = &self.test_type {
            writeln!(f, "Test: {}", test_type)?;
        }
        writeln!(f, "Suspicion Level: {} ({})", self.suspicion_display, self.severity.as_str())?;
        writeln!(f, "Detected Behaviors:")?;
        if self.behaviors.is_empty() {
            writeln!(f, "  - No suspicious behaviors detected")?;
        }
        for b in &self.behaviors {
            writeln!(f, "  - {} (Score: {:.1})", b.description, b.score)?;
        }
        writeln!(f, "Time Spent: {} minutes", self.time_spent_minutes)?;
        writeln!(f, "Code Correctness: {}", self.code_correctness)?;
        writeln!(f, "Code Efficiency: {}", self.code_efficiency)?;
        if let Some(conclusion) = &self.conclusion {
            writeln!(f, "Conclusion: {}", conclusion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::session::{CandidateProfile, SessionPhase, SuspicionReport, TestType};

    fn finished_state(report: SuspicionReport) -> SessionState {
        let mut state = SessionState::new();
        state.candidate = Some(CandidateProfile::new("Alice", "a@x.com", "pw", TestType::Algorithms, "EX1"));
        state.phase = SessionPhase::Results;
        state.report = Some(report);
        state
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(SeverityBand::classify(Some(0.0)), SeverityBand::Low);
        assert_eq!(SeverityBand::classify(Some(2.99)), SeverityBand::Low);
        assert_eq!(SeverityBand::classify(Some(3.0)), SeverityBand::Medium);
        assert_eq!(SeverityBand::classify(Some(6.99)), SeverityBand::Medium);
        assert_eq!(SeverityBand::classify(Some(7.0)), SeverityBand::High);
        assert_eq!(SeverityBand::classify(Some(10.0)), SeverityBand::High);
        assert_eq!(SeverityBand::classify(None), SeverityBand::Unknown);
    }

    #[test]
    fn test_high_report_keeps_behaviors_in_order() {
        let mut report = SuspicionReport::empty();
        report.suspicion_level = Some(8.4);
        report.time_spent_minutes = 55.0;
        report.behaviors = vec![
            Behavior { description: "tab switch".into(), score: 2.0 },
            Behavior { description: "copy paste".into(), score: 6.0 },
            Behavior { description: "long pause".into(), score: 1.0 },
        ];
        let state = finished_state(report);

        let view = assemble(&state);
        assert_eq!(view.severity, SeverityBand::High);
        assert_eq!(view.suspicion_level, Some(8.4));
        assert_eq!(view.suspicion_display, "8.4/10");
        assert_eq!(view.suspicion_percent, Some(84.0));
        let order: Vec<_> = view.behaviors.iter().map(|b| b.description.as_str()).collect();
        assert_eq!(order, ["tab switch", "copy paste", "long pause"]);
        assert_eq!(view.behaviors[0].score, 2.0);
        assert_eq!(view.time_spent_minutes, 55.0);
        assert_eq!(view.test_type.as_deref(), Some("Data Structures & Algorithms"));
    }

    #[test]
    fn test_unknown_level_is_not_low() {
        let view = assemble(&finished_state(SuspicionReport::empty()));
        assert_eq!(view.severity, SeverityBand::Unknown);
        assert_ne!(view.severity, SeverityBand::Low);
        assert_eq!(view.suspicion_level, None);
        assert_eq!(view.suspicion_percent, None);
        assert_eq!(view.suspicion_display, "unknown");
        assert!(view.behaviors.is_empty());
        assert_eq!(view.code_correctness, "N/A");
        assert_eq!(view.code_efficiency, "N/A");
    }

    #[test]
    fn test_assemble_does_not_mutate_state() {
        let mut report = SuspicionReport::empty();
        report.suspicion_level = Some(3.3);
        let state = finished_state(report);
        let before = state.clone();
        let _ = assemble(&state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_assemble_before_results() {
        let view = assemble(&SessionState::new());
        assert_eq!(view.severity, SeverityBand::Unknown);
        assert_eq!(view.candidate_name, None);
        assert_eq!(view.time_spent_minutes, 0.0);
    }

    #[test]
    fn test_text_rendering() {
        let text = assemble(&finished_state(SuspicionReport::empty())).to_string();
        assert!(text.contains("Suspicion Level: unknown (unknown)"));
        assert!(text.contains("No suspicious behaviors detected"));
        assert!(text.contains("Code Correctness: N/A"));

        let mut report = SuspicionReport::empty();
        report.suspicion_level = Some(1.25);
        report.behaviors = vec![Behavior { description: "tab switch".into(), score: 2.0 }];
        let text = assemble(&finished_state(report)).to_string();
        assert!(text.contains("Suspicion Level: 1.2/10 (low)") || text.contains("Suspicion Level: 1.3/10 (low)"));
        assert!(text.contains("tab switch (Score: 2.0)"));
        assert!(!text.contains("No suspicious behaviors detected"));
    }
}
