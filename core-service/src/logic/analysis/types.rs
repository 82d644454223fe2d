//! Wire types for the analysis service.
//!
//! Every field is optional on the wire. Missing or `null` fields fall back
//! to defaults instead of failing the decode.

use serde::Deserialize;

use super::error::AnalysisError;
use crate::logic::session::{Behavior, SuspicionReport};

const MAX_SUSPICION_LEVEL: f64 = 10.0;

/// Plain `{status, message}` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StopBaselineResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub data_points: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BehaviorPayload {
    pub description: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndTestResponse {
    pub status: Option<String>,
    pub suspicion_level: Option<f64>,
    pub behaviors: Option<Vec<BehaviorPayload>>,
    pub time_spent: Option<f64>,
    pub code_correctness: Option<String>,
    pub code_efficiency: Option<String>,
    pub result: Option<String>,
    pub conclusion: Option<String>,
    pub message: Option<String>,
    pub db_record_id: Option<i64>,
}

/// Body shape of a non-2xx reply
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Services report soft failures as `{"status": "error", "message": ...}` with a 200
pub(crate) fn check_status(status: Option<&str>, message: &str) -> Result<(), AnalysisError> {
    match status {
        Some(s) if s.eq_ignore_ascii_case("error") => Err(AnalysisError::BadResponse(format!(
            "service rejected request: {}",
            if message.is_empty() { "no reason given" } else { message }
        ))),
        _ => Ok(()),
    }
}

impl EndTestResponse {
    /// Validate ranges and build the session report
    pub fn into_report(self) -> Result<SuspicionReport, AnalysisError> {
        check_status(self.status.as_deref(), self.message.as_deref().unwrap_or_default())?;

        if let Some(level) = self.suspicion_level {
            if !level.is_finite() || !(0.0..=MAX_SUSPICION_LEVEL).contains(&level) {
                return Err(AnalysisError::BadResponse(format!(
                    "suspicion_level {} outside 0-{}",
                    level, MAX_SUSPICION_LEVEL
                )));
            }
        }

        let time_spent = self.time_spent.unwrap_or(0.0);
        if !time_spent.is_finite() || time_spent < 0.0 {
            return Err(AnalysisError::BadResponse(format!("time_spent {} is negative", time_spent)));
        }

        let behaviors = self
            .behaviors
            .unwrap_or_default()
            .into_iter()
            .map(|b| {
                let score = b.score.unwrap_or(0.0);
                if !score.is_finite() || score < 0.0 {
                    return Err(AnalysisError::BadResponse(format!(
                        "behavior score {} is negative",
                        score
                    )));
                }
                Ok(Behavior {
                    description: b
                        .description
                        .unwrap_or_else(|| "unspecified behavior".to_string()),
                    score,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = SuspicionReport::empty();
        report.suspicion_level = self.suspicion_level;
        report.behaviors = behaviors;
        report.time_spent_minutes = time_spent;
        report.code_correctness = self.code_correctness;
        report.code_efficiency = self.code_efficiency;
        report.verdict = self.result;
        report.conclusion = self.conclusion;
        report.service_message = self.message;
        report.record_id = self.db_record_id;
        Ok(report)
    }
}
