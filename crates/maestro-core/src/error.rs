//! Error types for maestro-core

use thiserror::Error;

/// Core orchestration error type
#[derive(Debug, Error)]
pub enum Error {
    /// An agent's manifest could not be fetched or parsed.
    ///
    /// Registration failures are logged and skipped during batch
    /// registration; they never abort the batch.
    #[error("registration failed for {endpoint}: {message}")]
    Registration {
        /// Normalized agent endpoint
        endpoint: String,
        /// Underlying failure
        message: String,
    },

    /// No registered agent advertises one or more capabilities required by
    /// the plan. Raised before any step executes.
    #[error("no agent found for required capabilities: {}", capabilities.join(", "))]
    MissingCapabilities {
        /// All missing capability names, in plan order
        capabilities: Vec<String>,
    },

    /// A step's remote invocation failed; the run aborts immediately.
    #[error("step {step} ({capability}) failed on {endpoint}: {message}")]
    StepInvocation {
        /// 1-based step index
        step: usize,
        /// Capability being invoked
        capability: String,
        /// Agent endpoint that served the step
        endpoint: String,
        /// Remote or transport error message
        message: String,
    },

    /// The remote agent returned a JSON-RPC error payload.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// A capability was invoked on an agent that does not provide it.
    #[error("capability not found: {0}")]
    CapabilityNotFound(String),

    /// A capability handler failed.
    #[error("capability error: {0}")]
    Capability(String),

    /// A plan failed structural validation.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// Text-generation backend error
    #[error("llm error: {0}")]
    Llm(#[from] maestro_llm::Error),

    /// Network/transport error
    #[error("network error: {0}")]
    Network(String),

    /// Internal error (serialization, server setup, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
