//! Agent registry - manifest discovery and capability invocation
//!
//! The registry owns the single HTTP client for a discovery/orchestration
//! session. It fetches agent cards from the well-known path, keeps one
//! record per normalized endpoint in registration order, and performs
//! JSON-RPC capability invocations against registered (or any) endpoints.
//! The client is released when the registry is dropped, on every exit path.

use crate::error::{Error, Result};
use crate::protocol::{AgentCard, CapabilityDecl, RpcRequest, RpcResponse, AGENT_CARD_PATH, RPC_PATH};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default timeout for manifest fetches and capability invocations.
///
/// Generous because capabilities are typically backed by slow generative
/// text backends.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A registered agent: its normalized endpoint, the parsed card fields, and
/// the raw card document. Immutable once stored; re-registration replaces
/// the record wholesale (no partial merge), keeping its registration slot.
#[derive(Debug, Clone)]
pub struct AgentRecord {
    /// Normalized endpoint (trailing slash stripped); unique registry key
    pub endpoint: String,
    /// Display name from the card
    pub name: String,
    /// Description from the card
    pub description: String,
    /// Advertised capabilities, card order
    pub capabilities: Vec<CapabilityDecl>,
    /// The raw card document, passed through opaquely
    pub manifest: Value,
}

impl AgentRecord {
    /// Build a record from a normalized endpoint and a raw card document.
    pub fn from_card(endpoint: impl Into<String>, manifest: Value) -> Result<Self> {
        let card: AgentCard = serde_json::from_value(manifest.clone())
            .map_err(|e| Error::Internal(format!("malformed agent card: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            name: card.name,
            description: card.description,
            capabilities: card.capabilities,
            manifest,
        })
    }

    /// Whether the agent advertises a capability.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.name == name)
    }

    /// Advertised capability names, card order.
    #[must_use]
    pub fn capability_names(&self) -> Vec<&str> {
        self.capabilities.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Strip the trailing slash so an endpoint has exactly one registry key.
#[must_use]
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// The in-memory collection of known agents.
pub struct AgentRegistry {
    client: reqwest::Client,
    agents: Vec<AgentRecord>,
}

impl AgentRegistry {
    /// Create a registry with the default invocation timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a registry with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self {
            client,
            agents: Vec::new(),
        })
    }

    /// Fetch the card at `<endpoint>/.well-known/agent.json` and store (or
    /// overwrite) the record for that endpoint.
    ///
    /// A failure is returned to the caller but is not fatal to a batch:
    /// [`register_many`](Self::register_many) logs and skips it. Single
    /// attempt, no retry; call again to retry.
    #[instrument(skip(self))]
    pub async fn register(&mut self, endpoint: &str) -> Result<AgentRecord> {
        let endpoint = normalize_endpoint(endpoint);
        let url = format!("{endpoint}{AGENT_CARD_PATH}");

        let response = self.client.get(&url).send().await.map_err(|e| {
            Error::Registration {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Registration {
                endpoint,
                message: format!("HTTP {status}"),
            });
        }

        let manifest: Value = response.json().await.map_err(|e| Error::Registration {
            endpoint: endpoint.clone(),
            message: format!("unparsable card: {e}"),
        })?;

        let record =
            AgentRecord::from_card(endpoint.clone(), manifest).map_err(|e| Error::Registration {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        // Overwrite in place so the registration-order tie-break stays
        // stable across re-registration.
        match self.agents.iter_mut().find(|a| a.endpoint == endpoint) {
            Some(existing) => *existing = record.clone(),
            None => self.agents.push(record.clone()),
        }

        info!(
            endpoint = %record.endpoint,
            name = %record.name,
            capabilities = ?record.capability_names(),
            "Registered agent"
        );
        Ok(record)
    }

    /// Register several endpoints, one at a time, returning only the
    /// successes in input order. Individual failures are logged as warnings
    /// and skipped.
    pub async fn register_many(&mut self, endpoints: &[String]) -> Vec<AgentRecord> {
        let mut registered = Vec::new();
        for endpoint in endpoints {
            match self.register(endpoint).await {
                Ok(record) => registered.push(record),
                Err(e) => warn!(endpoint = %endpoint, error = %e, "Failed to register agent"),
            }
        }
        registered
    }

    /// All known agents, insertion order.
    #[must_use]
    pub fn list(&self) -> &[AgentRecord] {
        &self.agents
    }

    /// Look up an agent by normalized endpoint.
    #[must_use]
    pub fn get(&self, endpoint: &str) -> Option<&AgentRecord> {
        let endpoint = normalize_endpoint(endpoint);
        self.agents.iter().find(|a| a.endpoint == endpoint)
    }

    /// Number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Invoke a capability on an agent via JSON-RPC 2.0.
    ///
    /// A populated `error` field in the response is a remote failure.
    #[instrument(skip(self, params))]
    pub async fn invoke(&self, endpoint: &str, capability: &str, params: Value) -> Result<Value> {
        let endpoint = normalize_endpoint(endpoint);
        let url = format!("{endpoint}{RPC_PATH}");
        let request = RpcRequest::new(capability, params);

        debug!(endpoint = %endpoint, capability = %capability, "Invoking capability");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("HTTP {status} from {url}")));
        }

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("unparsable rpc response: {e}")))?;

        if let Some(error) = response.error {
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }
}
