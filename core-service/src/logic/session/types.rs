use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// SESSION PHASE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Registration,
    BaselineCollection,
    Instructions,
    LiveTest,
    Results,
}

impl SessionPhase {
    /// The phase that follows this one, `None` for the terminal phase
    pub fn next(self) -> Option<SessionPhase> {
        match self {
            SessionPhase::Registration => Some(SessionPhase::BaselineCollection),
            SessionPhase::BaselineCollection => Some(SessionPhase::Instructions),
            SessionPhase::Instructions => Some(SessionPhase::LiveTest),
            SessionPhase::LiveTest => Some(SessionPhase::Results),
            SessionPhase::Results => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SessionPhase::Results
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Registration => "registration",
            SessionPhase::BaselineCollection => "baseline_collection",
            SessionPhase::Instructions => "instructions",
            SessionPhase::LiveTest => "live_test",
            SessionPhase::Results => "results",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CANDIDATE PROFILE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    #[serde(rename = "algorithms-test")]
    Algorithms,
    #[serde(rename = "frontend-test")]
    Frontend,
    #[serde(rename = "backend-test")]
    Backend,
}

impl TestType {
    pub fn id(&self) -> &'static str {
        match self {
            TestType::Algorithms => "algorithms-test",
            TestType::Frontend => "frontend-test",
            TestType::Backend => "backend-test",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestType::Algorithms => "Data Structures & Algorithms",
            TestType::Frontend => "Frontend Development",
            TestType::Backend => "Backend Development",
        }
    }
}

/// Error returned when a test type string is not one of the known ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTestType(pub String);

impl fmt::Display for UnknownTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown test type '{}'", self.0)
    }
}

impl std::error::Error for UnknownTestType {}

impl FromStr for TestType {
    type Err = UnknownTestType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.trim_end_matches("-test") {
            "algorithms" => Ok(TestType::Algorithms),
            "frontend" => Ok(TestType::Frontend),
            "backend" => Ok(TestType::Backend),
            _ => Err(UnknownTestType(s.to_string())),
        }
    }
}

/// Opaque password credential. Never printed, never serialized.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Credential,
    pub test_type: TestType,
    pub exam_code: String,
}

impl CandidateProfile {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        test_type: TestType,
        exam_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Credential::new(password),
            test_type,
            exam_code: exam_code.into(),
        }
    }

    /// First required field that is empty or whitespace-only
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else if self.password.is_empty() {
            Some("password")
        } else if self.exam_code.trim().is_empty() {
            Some("exam code")
        } else {
            None
        }
    }
}

// ============================================================================
// BASELINE RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaselineRecord {
    pub started: bool,
    pub stopped: bool,
    pub sample_count: u64,
}

impl BaselineRecord {
    pub fn mark_started(&mut self) {
        if !self.stopped {
            self.started = true;
        }
    }

    /// Freeze the record with the service's sample count
    pub fn mark_stopped(&mut self, sample_count: u64) {
        if self.stopped {
            return;
        }
        self.sample_count = sample_count;
        self.stopped = true;
    }
}

// ============================================================================
// SUSPICION REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub description: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspicionReport {
    /// 0.0 - 10.0, `None` when the service did not report one
    pub suspicion_level: Option<f64>,
    pub behaviors: Vec<Behavior>,
    pub time_spent_minutes: f64,
    pub code_correctness: Option<String>,
    pub code_efficiency: Option<String>,

    // Extra context returned by the analysis service
    pub verdict: Option<String>,
    pub conclusion: Option<String>,
    pub service_message: Option<String>,
    pub record_id: Option<i64>,
    pub received_at: DateTime<Utc>,
}

impl SuspicionReport {
    /// Report with nothing but defaults (unknown level, no behaviors)
    pub fn empty() -> Self {
        Self {
            suspicion_level: None,
            behaviors: Vec::new(),
            time_spent_minutes: 0.0,
            code_correctness: None,
            code_efficiency: None,
            verdict: None,
            conclusion: None,
            service_message: None,
            record_id: None,
            received_at: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.suspicion_level.is_none()
    }
}
