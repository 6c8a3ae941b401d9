//! Agent HTTP server
//!
//! Exposes an [`Agent`](crate::agent::Agent) over the standard surface:
//! - `GET /.well-known/agent.json`: the agent card
//! - `POST /rpc`: JSON-RPC 2.0 capability invocation
//! - `GET /health`: liveness probe
//! - `GET /`: service info
//!
//! The transport delivers manifests and RPC responses bit-exact; everything
//! above it (selection, planning, execution) lives in the orchestrator.

use crate::agent::Agent;
use crate::error::{Error, Result};
use crate::protocol::{
    RpcRequest, RpcResponse, AGENT_CARD_PATH, JSONRPC_VERSION, RPC_INTERNAL_ERROR,
    RPC_INVALID_REQUEST, RPC_METHOD_NOT_FOUND, RPC_PATH,
};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

struct ServerState {
    agent: Arc<Agent>,
    url: String,
}

/// A bound, not-yet-running agent server.
pub struct AgentServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl AgentServer {
    /// Bind an agent to an address. Use port 0 to let the OS pick a free
    /// port (the advertised card URL reflects the actual port).
    pub async fn bind(agent: Arc<Agent>, addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal(format!("bind {addr} failed: {e}")))?;
        let local = listener
            .local_addr()
            .map_err(|e| Error::Internal(e.to_string()))?;
        let url = format!("http://{}:{}", local.ip(), local.port());
        Ok(Self {
            listener,
            state: Arc::new(ServerState { agent, url }),
        })
    }

    /// The base URL the server advertises on its card.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.state.url
    }

    /// The bound socket address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| Error::Internal(e.to_string()))
    }

    /// Serve until the process terminates (or the task is dropped).
    pub async fn serve(self) -> Result<()> {
        let app = Router::new()
            .route(AGENT_CARD_PATH, get(agent_card))
            .route(RPC_PATH, post(rpc))
            .route("/health", get(health))
            .route("/", get(service_info))
            .with_state(self.state.clone());

        info!(
            agent = %self.state.agent.id(),
            url = %self.state.url,
            "Agent server listening"
        );

        axum::serve(self.listener, app)
            .await
            .map_err(|e| Error::Internal(format!("server error: {e}")))
    }
}

async fn agent_card(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(state.agent.card(&state.url))
}

async fn rpc(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    let id = request.id.clone();

    if request.jsonrpc != JSONRPC_VERSION {
        return Json(RpcResponse::failure(
            RPC_INVALID_REQUEST,
            "Invalid Request: jsonrpc must be '2.0'",
            id,
        ));
    }

    let Some(method) = request.method.filter(|m| !m.is_empty()) else {
        return Json(RpcResponse::failure(
            RPC_INVALID_REQUEST,
            "Invalid Request: method is required",
            id,
        ));
    };

    if !state.agent.has_capability(&method) {
        return Json(RpcResponse::failure(
            RPC_METHOD_NOT_FOUND,
            format!("Method not found: '{method}'"),
            id,
        ));
    }

    match state.agent.invoke(&method, request.params).await {
        Ok(result) => Json(RpcResponse::success(result, id)),
        Err(e) => {
            warn!(agent = %state.agent.id(), capability = %method, error = %e, "Capability failed");
            Json(RpcResponse::failure(
                RPC_INTERNAL_ERROR,
                format!("Internal error: {e}"),
                id,
            ))
        }
    }
}

async fn health(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "agent": state.agent.id(),
    }))
}

async fn service_info(State(state): State<Arc<ServerState>>) -> Json<Value> {
    let skills: Vec<String> = state
        .agent
        .capabilities()
        .into_iter()
        .map(|c| c.name)
        .collect();
    Json(json!({
        "name": state.agent.name(),
        "agent_card": AGENT_CARD_PATH,
        "rpc_endpoint": RPC_PATH,
        "skills": skills,
    }))
}
