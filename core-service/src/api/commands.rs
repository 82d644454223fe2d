//! Session Commands - API for terminal frontends
//!
//! One text command per line in, one JSON projection out. Renderers only
//! observe what the orchestrator reports back.

use std::str::FromStr;

use clap::error::ErrorKind as ClapErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use crate::logic::analysis::AnalysisBackend;
use crate::logic::orchestrator::{ErrorKind, SessionOrchestrator};
use crate::logic::report::ReportView;
use crate::logic::session::{CandidateProfile, Credential, SessionPhase, TestType};

// ============================================================================
// GRAMMAR
// ============================================================================

/// One line typed at the session prompt
#[derive(Parser, Debug)]
#[command(name = "proctor")]
#[command(no_binary_name = true, disable_version_flag = true)]
#[command(after_help = "Use double quotes for values with spaces, e.g. register \"Alice Smith\" ...")]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Register the candidate and start baseline collection
    Register {
        name: String,
        email: String,
        password: Credential,
        /// algorithms, frontend or backend (the -test suffix is optional)
        test_type: TestType,
        exam_code: String,
    },

    /// Retry starting baseline collection
    BeginBaseline,

    /// Finish baseline collection
    StopBaseline,

    /// Start the live test
    StartTest,

    /// End the test and fetch the analysis
    EndTest,

    /// Discard the session
    Reset,

    /// Show the current phase and status
    Status,

    /// Show the final report
    Report {
        #[arg(value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
    },

    /// Leave the session prompt
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Text,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("{}", .0.to_string().trim_end())]
    Syntax(#[from] clap::Error),
}

impl CommandError {
    /// `help` comes back from clap as an error carrying the help text
    pub fn is_help(&self) -> bool {
        matches!(
            self,
            CommandError::Syntax(e) if matches!(
                e.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            )
        )
    }

    fn kind(&self) -> Option<ErrorKind> {
        match self {
            CommandError::Syntax(e)
                if matches!(e.kind(), ClapErrorKind::ValueValidation | ClapErrorKind::InvalidValue) =>
            {
                Some(ErrorKind::Validation)
            }
            _ => None,
        }
    }
}

pub fn usage() -> String {
    CommandLine::command().render_help().to_string()
}

/// Split on whitespace; double quotes group words and may produce empty values
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() {
            return Err(CommandError::Empty);
        }
        Ok(CommandLine::try_parse_from(tokens)?.command)
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Projection printed after every command
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub ok: bool,
    pub phase: SessionPhase,
    pub status: String,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportView>,
}

impl CommandOutput {
    fn snapshot<C: AnalysisBackend>(orch: &SessionOrchestrator<C>) -> Self {
        let status = orch.status();
        Self {
            ok: true,
            phase: status.phase,
            status: status.status_message,
            busy: status.busy,
            error: None,
            error_kind: None,
            report: None,
        }
    }

    /// Output for a line that never reached the orchestrator
    pub fn rejected<C: AnalysisBackend>(orch: &SessionOrchestrator<C>, err: &CommandError) -> Self {
        Self {
            ok: false,
            error: Some(err.to_string()),
            error_kind: err.kind(),
            ..Self::snapshot(orch)
        }
    }
}

/// Run one command against the session
pub async fn execute<C: AnalysisBackend>(orch: &SessionOrchestrator<C>, command: Command) -> CommandOutput {
    let result = match command {
        Command::Register { name, email, password, test_type, exam_code } => {
            let profile = CandidateProfile { name, email, password, test_type, exam_code };
            orch.register(profile).await
        }
        Command::BeginBaseline => orch.begin_baseline().await,
        Command::StopBaseline => orch.complete_baseline().await,
        Command::StartTest => orch.start_test().await,
        Command::EndTest => orch.end_test().await,
        Command::Reset => orch.reset(),
        Command::Status | Command::Quit => Ok(orch.phase()),
        Command::Report { .. } => {
            let mut out = CommandOutput::snapshot(orch);
            out.report = Some(orch.report());
            return out;
        }
    };

    let mut out = CommandOutput::snapshot(orch);
    match result {
        Ok(phase) if phase == SessionPhase::Results => out.report = Some(orch.report()),
        Ok(_) => {}
        Err(e) => {
            out.ok = false;
            out.error_kind = Some(e.kind());
            out.error = Some(e.to_string());
        }
    }
    out
}
