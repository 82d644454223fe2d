//! Proctor Session - terminal driver for one candidate session

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use proctor_core::api::commands::{self, Command, CommandOutput, ReportFormat};
use proctor_core::constants;
use proctor_core::{AnalysisConfig, HttpAnalysisClient, SessionOrchestrator};

#[derive(Parser)]
#[command(name = "proctor-session")]
#[command(about = "Drive one proctored exam session from stdin")]
#[command(version)]
struct Cli {
    /// Analysis service base URL (overrides PROCTOR_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds (overrides PROCTOR_API_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

fn emit(output: &CommandOutput) {
    match serde_json::to_string(output) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode output: {}", e),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let defaults = AnalysisConfig::default();
    let config = AnalysisConfig::new(
        cli.api_url.unwrap_or(defaults.base_url),
        cli.timeout.map(Duration::from_secs).unwrap_or(defaults.timeout),
    );
    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);
    log::info!("  Analysis service: {}", config.base_url);
    log::info!("  Request timeout: {:?}", config.timeout);

    let client = match HttpAnalysisClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let orchestrator = SessionOrchestrator::new(client);

    eprintln!("{}", commands::usage());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Report { format: ReportFormat::Text }) => print!("{}", orchestrator.report()),
            Ok(command) => emit(&commands::execute(&orchestrator, command).await),
            Err(e) if e.is_help() => eprintln!("{}", e),
            Err(e) => emit(&CommandOutput::rejected(&orchestrator, &e)),
        }
    }

    log::info!("Session closed in phase {}", orchestrator.phase());
}
