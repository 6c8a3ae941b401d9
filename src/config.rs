//! Environment-based configuration for the orchestrator CLI.

use std::env;

/// Default fleet endpoints, matching the ports `maestro serve` binds.
pub const DEFAULT_ENDPOINTS: [&str; 4] = [
    "http://localhost:9201",
    "http://localhost:9202",
    "http://localhost:9203",
    "http://localhost:9204",
];

/// Orchestrator settings read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Agent endpoints to discover, in priority order
    pub agent_endpoints: Vec<String>,
    /// Recipient for email delivery steps; absent means those steps skip
    pub report_recipient: Option<String>,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `MAESTRO_AGENT_ENDPOINTS` is a comma-separated endpoint list;
    /// `REPORT_RECIPIENT_EMAIL` enables email steps.
    #[must_use]
    pub fn from_env() -> Self {
        let agent_endpoints = env::var("MAESTRO_AGENT_ENDPOINTS")
            .ok()
            .map(|raw| parse_endpoints(&raw))
            .filter(|endpoints| !endpoints.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINTS.iter().map(ToString::to_string).collect());

        let report_recipient = env::var("REPORT_RECIPIENT_EMAIL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self {
            agent_endpoints,
            report_recipient,
        }
    }
}

/// Split a comma-separated endpoint list, trimming whitespace and dropping
/// empty entries.
#[must_use]
pub fn parse_endpoints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
