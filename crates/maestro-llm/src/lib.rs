//! Maestro LLM - Text-generation backend abstraction
//!
//! This crate provides the generative-reasoning delegate used by the
//! orchestrator's task planner and by the demo agents:
//! - [`TextGenerator`]: the backend trait (prompt in, text out)
//! - [`GeminiClient`]: Google Gemini implementation over reqwest
//!
//! Backends are explicit client objects constructed with their credential;
//! there is no lazily-initialized process-global handle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod gemini;

pub use error::{Error, Result};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL};

/// A text-generation backend: an opaque function from a system/user prompt
/// pair to generated text. May fail or be unavailable; callers decide how to
/// degrade.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name (for logging)
    fn name(&self) -> &str;

    /// Generate text for a system prompt and a user prompt.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}
