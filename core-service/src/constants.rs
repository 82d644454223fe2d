//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default analysis service, only edit this file.

/// Default analysis service base URL
///
/// This is the fallback URL when no environment variable is set.
/// Paths such as `/start_baseline` are appended to it.
pub const DEFAULT_ANALYSIS_URL: &str = "http://localhost:5000/api";

/// Default request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Header carrying the per-transition idempotency key
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Proctor Session";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get analysis service URL from environment or use default
pub fn get_analysis_url() -> String {
    std::env::var("PROCTOR_API_URL")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_ANALYSIS_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_request_timeout_secs() -> u64 {
    std::env::var("PROCTOR_API_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
}
