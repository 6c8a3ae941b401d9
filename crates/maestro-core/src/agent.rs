//! Agent - explicit capability table
//!
//! An agent is a named set of capabilities, each a typed async handler over
//! JSON parameters. The table is built once by [`AgentBuilder`] and queried
//! through a narrow interface (`capabilities()` / `invoke()`), so the
//! capability set is statically inspectable with no runtime attribute scanning.

use crate::error::{Error, Result};
use crate::protocol::{AgentCard, CapabilityDecl, PROTOCOL_VERSION};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// A capability implementation: named arguments in, JSON value out.
#[async_trait::async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Execute the capability with the given named arguments.
    async fn handle(&self, params: Value) -> Result<Value>;
}

/// Blanket adapter so plain async closures can serve as handlers.
struct FnHandler<F>(F);

#[async_trait::async_trait]
impl<F, Fut> CapabilityHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Value>> + Send,
{
    async fn handle(&self, params: Value) -> Result<Value> {
        (self.0)(params).await
    }
}

/// A registered capability: its declaration plus its handler.
struct Capability {
    decl: CapabilityDecl,
    handler: Arc<dyn CapabilityHandler>,
}

/// A task-performing agent with an explicit capability table.
pub struct Agent {
    id: String,
    name: String,
    description: String,
    version: String,
    provider_name: String,
    provider_email: String,
    capabilities: Vec<Capability>,
}

impl Agent {
    /// Start building an agent.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> AgentBuilder {
        AgentBuilder {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            version: "1.0".to_string(),
            provider_name: "Maestro".to_string(),
            provider_email: "agents@example.com".to_string(),
            capabilities: Vec::new(),
        }
    }

    /// Agent identifier (used in logs and the health endpoint).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The advertised capability declarations, in registration order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<CapabilityDecl> {
        self.capabilities.iter().map(|c| c.decl.clone()).collect()
    }

    /// Whether the agent provides a capability.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.decl.name == name)
    }

    /// Invoke a capability by name with named arguments.
    pub async fn invoke(&self, name: &str, params: Value) -> Result<Value> {
        let capability = self
            .capabilities
            .iter()
            .find(|c| c.decl.name == name)
            .ok_or_else(|| Error::CapabilityNotFound(name.to_string()))?;
        debug!(agent = %self.id, capability = %name, "Invoking capability");
        capability.handler.handle(params).await
    }

    /// Build the agent card document, advertising `url` as the base URL.
    #[must_use]
    pub fn card(&self, url: &str) -> Value {
        let skills: Vec<Value> = self
            .capabilities
            .iter()
            .map(|c| {
                json!({
                    "name": c.decl.name,
                    "description": c.decl.description,
                })
            })
            .collect();

        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "name": self.name,
            "description": self.description,
            "version": self.version,
            "provider": {
                "name": self.provider_name,
                "contactEmail": self.provider_email,
            },
            "url": url,
            "capabilities": {
                "streaming": false,
                "push": false,
            },
            "defaultInputModes": ["text"],
            "defaultOutputModes": ["text"],
            "skills": skills,
        })
    }

    /// Parse the card into the orchestrator-facing shape (used in tests).
    pub fn parsed_card(&self, url: &str) -> Result<AgentCard> {
        serde_json::from_value(self.card(url)).map_err(|e| Error::Internal(e.to_string()))
    }
}

/// Builder for [`Agent`]. Capabilities keep registration order.
pub struct AgentBuilder {
    id: String,
    name: String,
    description: String,
    version: String,
    provider_name: String,
    provider_email: String,
    capabilities: Vec<Capability>,
}

impl AgentBuilder {
    /// Set the advertised version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the provider advertised on the card.
    #[must_use]
    pub fn provider(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self.provider_email = email.into();
        self
    }

    /// Register a capability backed by a handler object.
    #[must_use]
    pub fn capability_handler(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CapabilityHandler>,
    ) -> Self {
        self.capabilities.push(Capability {
            decl: CapabilityDecl::new(name, description),
            handler,
        });
        self
    }

    /// Register a capability backed by an async closure.
    #[must_use]
    pub fn capability<F, Fut>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        self.capability_handler(name, description, Arc::new(FnHandler(handler)))
    }

    /// Finish building the agent.
    #[must_use]
    pub fn build(self) -> Agent {
        Agent {
            id: self.id,
            name: self.name,
            description: self.description,
            version: self.version,
            provider_name: self.provider_name,
            provider_email: self.provider_email,
            capabilities: self.capabilities,
        }
    }
}

#[cfg(test)]
mod tests;
