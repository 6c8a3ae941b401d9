//! The demo agent fleet: research, writer, reviewer, reporter.
//!
//! Each agent is an ordinary [`maestro_core::Agent`] with Gemini-backed
//! capability handlers, except the reporter whose save/send capabilities
//! are local filesystem operations.

mod reporter;
mod research;
mod reviewer;
mod writer;

pub use reporter::reporter_agent;
pub use research::research_agent;
pub use reviewer::reviewer_agent;
pub use writer::writer_agent;

use maestro_core::error::{Error, Result};
use serde_json::Value;

/// Extract a required string parameter or fail the capability.
fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Capability(format!("missing '{key}' parameter")))
}

/// Extract an optional string parameter with a default.
fn str_or<'a>(params: &'a Value, key: &str, default: &'a str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or(default)
}
