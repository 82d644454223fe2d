//! API Module
//!
//! Structure:
//! - commands.rs: text command surface used by the `proctor-session` binary
//!
//! Usage:
//! - `api::commands::execute(&orchestrator, command)` - run one command

pub mod commands;

pub use commands::{execute, Command, CommandError, CommandOutput, ReportFormat};
